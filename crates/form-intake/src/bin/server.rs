//! Intake server binary
//!
//! Run with: cargo run -p form-intake --bin form-intake-server [config.toml]
//!
//! The config path may also be given through `INTAKE_CONFIG`.

use std::path::PathBuf;

use form_intake::{config::IntakeConfig, server::IntakeServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_intake=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                       Form Intake                         ║
║          Submissions, Uploads and Zip Archives            ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("INTAKE_CONFIG").ok())
        .map(PathBuf::from);
    let config = IntakeConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    if let Some(path) = &config_path {
        tracing::info!("  - Config file: {}", path.display());
    }
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());
    tracing::info!("  - Database: {}", config.storage.database_path.display());
    tracing::info!(
        "  - Max upload size: {} MB",
        config.server.max_upload_size / (1024 * 1024)
    );

    // Create and start server
    let server = IntakeServer::new(config).await?;

    println!("\nServer starting...");
    println!("  Form: http://{}/", server.address());
    println!("  Dashboard: http://{}/admin", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/submit                   - Submit the form");
    println!("  GET  /api/submissions              - List submissions");
    println!("  GET  /api/submissions/:id/archive  - Zip of one submission");
    println!("  GET  /api/download?file=<name>     - Download a stored file");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
