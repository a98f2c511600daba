//! Per-request values shared by every rendered page.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tera::Context;
use tower_sessions::Session;

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::security::{CsrfToken, CSRF_FORM_FIELD};
use crate::views::flash::Flash;

/// Session key holding the signed-in user, if any.
pub const USER_KEY: &str = "user";

/// Values every template can rely on.
#[derive(Clone)]
pub struct Locals {
    pub base_url: String,
    pub csrf_token: Option<String>,
    pub user: Option<Value>,
    pub session: Option<Session>,
}

impl Locals {
    /// Locals for a request that never passed through [`set_locals`].
    pub fn bare(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            csrf_token: None,
            user: None,
            session: None,
        }
    }

    pub(crate) fn context(&self, flash: Option<&Flash>) -> Context {
        let mut context = Context::new();
        context.insert("base_url", &self.base_url);
        context.insert("csrf_token", &self.csrf_token);
        context.insert("csrf_field", CSRF_FORM_FIELD);
        context.insert("user", &self.user);
        context.insert("flash", &flash);
        context
    }
}

/// Middleware collecting the locals before routing.
pub async fn set_locals(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let csrf_token = request
        .extensions()
        .get::<CsrfToken>()
        .map(|token| token.as_str().to_owned());

    let user = match &session {
        Some(session) => session.get::<Value>(USER_KEY).await.unwrap_or_else(|error| {
            tracing::warn!(%error, "Failed to load user from session");
            None
        }),
        None => None,
    };

    request.extensions_mut().insert(Locals {
        base_url: state.config.server.base_url.clone(),
        csrf_token,
        user,
        session,
    });

    next.run(request).await
}

impl<S> FromRequestParts<S> for Locals
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::internal("view locals missing; route not wrapped by set_locals"))
    }
}
