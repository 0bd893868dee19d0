//! Admin CLI for a running intake server
//!
//! Run with: cargo run -p form-intake --features cli --bin intake-admin -- list

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use form_intake::{build_archive, FileSource, IntakeClient};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "intake-admin")]
#[command(about = "List form submissions and download their files", long_about = None)]
struct Cli {
    /// Base URL of the intake server
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all submissions in creation order
    List,

    /// Fetch every file of a submission and write them as one zip
    Download {
        /// Submission id
        id: i64,

        /// Directory to write the archive into
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
}

/// Ticks a progress bar for every file fetched through the client
struct ProgressSource<'a> {
    client: &'a IntakeClient,
    progress: ProgressBar,
}

#[async_trait]
impl FileSource for ProgressSource<'_> {
    async fn fetch(&self, filename: &str) -> form_intake::Result<Vec<u8>> {
        let bytes = self.client.download_file(filename).await?;
        self.progress.set_message(filename.to_string());
        self.progress.inc(1);
        Ok(bytes)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_intake=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = IntakeClient::new(&cli.url)?;

    match cli.command {
        Commands::List => list(&client).await?,
        Commands::Download { id, out } => download(&client, id, out).await?,
    }

    Ok(())
}

async fn list(client: &IntakeClient) -> anyhow::Result<()> {
    let submissions = client.list_submissions().await?;

    if submissions.is_empty() {
        println!("No submissions yet");
        return Ok(());
    }

    println!(
        "{:>5}  {:<24} {:<28} {:<16} {:>5} {:>6}  {}",
        "ID", "NAME", "EMAIL", "PHONE", "DOCS", "IMAGES", "SUBMITTED"
    );
    for s in &submissions {
        println!(
            "{:>5}  {:<24} {:<28} {:<16} {:>5} {:>6}  {}",
            s.id,
            s.name,
            s.email,
            s.phone,
            s.documents.len(),
            s.images.len(),
            s.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("\n{} submissions", submissions.len());

    Ok(())
}

async fn download(client: &IntakeClient, id: i64, out: PathBuf) -> anyhow::Result<()> {
    let submission = client.get_submission(id).await?;

    let progress = ProgressBar::new(submission.file_count() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let source = ProgressSource {
        client,
        progress: progress.clone(),
    };

    let archive = match build_archive(&submission, &source).await {
        Ok(archive) => archive,
        Err(e) => {
            progress.abandon_with_message("failed");
            anyhow::bail!("Download failed: {}", e);
        }
    };
    progress.finish_with_message("done");

    tokio::fs::create_dir_all(&out).await?;
    let path = out.join(&archive.filename);
    tokio::fs::write(&path, &archive.bytes).await?;

    println!(
        "Downloaded {}'s files successfully! ({} files -> {})",
        submission.name,
        archive.file_count,
        path.display()
    );

    Ok(())
}
