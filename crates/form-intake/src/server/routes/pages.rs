//! HTML pages

use axum::{extract::State, response::Html};

use crate::error::Result;
use crate::server::state::AppState;
use crate::ui;

/// GET / - Intake form
pub async fn form_page(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_form(state.config().ui.banner_timeout_ms))
}

/// GET /admin - Submissions dashboard
pub async fn dashboard_page(State(state): State<AppState>) -> Result<Html<String>> {
    let submissions = state.store().list_submissions().await?;
    Ok(Html(ui::render_dashboard(
        &submissions,
        state.config().ui.banner_timeout_ms,
    )))
}
