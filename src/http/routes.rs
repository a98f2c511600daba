//! Application routes.

use axum::{extract::State, response::Html, routing::get, Router};
use tera::Context;

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::views::{Locals, View};

/// Page routes served behind the middleware stack.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home))
}

async fn home(State(state): State<AppState>, locals: Locals) -> Result<Html<String>, AppError> {
    let html = state.views.page(&locals, View::Home, Context::new()).await?;
    Ok(Html(html))
}

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::not_found()
}
