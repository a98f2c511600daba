//! Request errors and their terminal handling.
//!
//! # Data Flow
//! ```text
//! handler or csrf validator returns Err(AppError)
//!     → IntoResponse stashes the error in the response extensions
//!     → handle_errors picks it up
//!     → classify() decides: flash + redirect, or render an error page
//! ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tera::Context;
use thiserror::Error;

use crate::config::Environment;
use crate::http::response::found;
use crate::http::server::AppState;
use crate::views::{Flash, Locals, View};

/// Message carried by a plain "page does not exist" error.
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// Where flash-carrying errors send the client.
pub const REDIRECT_TARGET: &str = "../";

/// An error that ends the current request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The client may not do this; shown as a flash on the previous page.
    #[error("{0}")]
    Forbidden(String),

    /// A missing page, or a missing resource with an explanation.
    #[error("{0}")]
    NotFound(String),

    /// Any other status with a message.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Unexpected failure inside the application.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// The generic not-found error that renders the 404 page.
    pub fn not_found() -> Self {
        Self::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Build an error from a status and message, picking the matching variant.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::INTERNAL_SERVER_ERROR => Self::Internal(message),
            status => Self::Status { status, message },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Status { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Internal(message)
            | Self::Status { message, .. } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Status { .. } => "status",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(error: tera::Error) -> Self {
        Self::Internal(format!("template error: {error}"))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(error: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {error}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Error details exposed to the development error page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub status: u16,
    pub kind: &'static str,
    pub message: String,
}

/// What the terminal handler does with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorAction {
    /// Store the flash and redirect to [`REDIRECT_TARGET`].
    FlashRedirect(Flash),
    /// Render an error page. `detail` is only set outside production.
    Render {
        status: StatusCode,
        view: View,
        detail: Option<ErrorDetail>,
    },
}

/// Decide how an error is presented.
pub fn classify(error: &AppError, environment: Environment) -> ErrorAction {
    // `Status` may be built directly with a status that has its own variant.
    let error = &AppError::from_status(error.status(), error.message());
    match error {
        AppError::Forbidden(message) => ErrorAction::FlashRedirect(Flash::danger(message.clone())),
        AppError::NotFound(message) if message == NOT_FOUND_MESSAGE => ErrorAction::Render {
            status: StatusCode::NOT_FOUND,
            view: View::NotFound,
            detail: None,
        },
        AppError::NotFound(message) => ErrorAction::FlashRedirect(Flash::danger(message.clone())),
        _ if environment.is_production() => ErrorAction::Render {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            view: View::ServerError,
            detail: None,
        },
        _ => ErrorAction::Render {
            status: error.status(),
            view: View::ErrorDetail,
            detail: Some(ErrorDetail {
                status: error.status().as_u16(),
                kind: error.kind(),
                message: error.message().to_string(),
            }),
        },
    }
}

/// Terminal middleware turning stashed [`AppError`]s into responses.
pub async fn handle_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let locals = request.extensions().get::<Locals>().cloned();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;
    let Some(error) = response.extensions_mut().remove::<AppError>() else {
        return response;
    };

    tracing::error!(
        %method,
        %path,
        status = error.status().as_u16(),
        kind = error.kind(),
        error = %error,
        "Request failed"
    );

    match classify(&error, state.config.server.environment) {
        ErrorAction::FlashRedirect(flash) => {
            match locals.as_ref().and_then(|locals| locals.session.as_ref()) {
                Some(session) => {
                    if let Err(error) = flash.store(session).await {
                        tracing::error!(%error, "Failed to store flash message");
                    }
                }
                None => tracing::warn!("No session available for flash message"),
            }
            found(REDIRECT_TARGET)
        }
        ErrorAction::Render {
            status,
            view,
            detail,
        } => {
            let locals =
                locals.unwrap_or_else(|| Locals::bare(state.config.server.base_url.clone()));
            let mut context = Context::new();
            if let Some(detail) = detail {
                context.insert("error", &detail);
            }

            match state.views.page(&locals, view, context).await {
                Ok(html) => (status, Html(html)).into_response(),
                Err(render_error) => {
                    tracing::error!(error = %render_error, view = view.template(), "Failed to render error page");
                    status.into_response()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_flashes_and_redirects() {
        let action = classify(&AppError::forbidden("nope"), Environment::Production);
        assert_eq!(action, ErrorAction::FlashRedirect(Flash::danger("nope")));
    }

    #[test]
    fn test_plain_not_found_renders_404() {
        for env in [Environment::Development, Environment::Production] {
            assert_eq!(
                classify(&AppError::not_found(), env),
                ErrorAction::Render {
                    status: StatusCode::NOT_FOUND,
                    view: View::NotFound,
                    detail: None,
                }
            );
        }
    }

    #[test]
    fn test_explained_not_found_flashes() {
        let error = AppError::NotFound("Snippet does not exist".into());
        assert_eq!(
            classify(&error, Environment::Development),
            ErrorAction::FlashRedirect(Flash::danger("Snippet does not exist"))
        );
    }

    #[test]
    fn test_production_hides_details() {
        let action = classify(&AppError::internal("db exploded"), Environment::Production);
        assert_eq!(
            action,
            ErrorAction::Render {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                view: View::ServerError,
                detail: None,
            }
        );

        let teapot = AppError::from_status(StatusCode::IM_A_TEAPOT, "short and stout");
        assert!(matches!(
            classify(&teapot, Environment::Production),
            ErrorAction::Render { status: StatusCode::INTERNAL_SERVER_ERROR, detail: None, .. }
        ));
    }

    #[test]
    fn test_development_shows_details_with_original_status() {
        let error = AppError::from_status(StatusCode::BAD_REQUEST, "bad input");
        assert_eq!(
            classify(&error, Environment::Development),
            ErrorAction::Render {
                status: StatusCode::BAD_REQUEST,
                view: View::ErrorDetail,
                detail: Some(ErrorDetail {
                    status: 400,
                    kind: "status",
                    message: "bad input".into(),
                }),
            }
        );
    }

    #[test]
    fn test_from_status_picks_variant() {
        assert_eq!(
            AppError::from_status(StatusCode::FORBIDDEN, "x"),
            AppError::Forbidden("x".into())
        );
        assert_eq!(
            AppError::from_status(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            AppError::not_found()
        );
        assert_eq!(AppError::from_status(StatusCode::CONFLICT, "x").status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_status_variant_classified_by_its_status() {
        let forbidden = AppError::Status {
            status: StatusCode::FORBIDDEN,
            message: "nope".into(),
        };
        assert_eq!(
            classify(&forbidden, Environment::Development),
            ErrorAction::FlashRedirect(Flash::danger("nope"))
        );

        let missing = AppError::Status {
            status: StatusCode::NOT_FOUND,
            message: NOT_FOUND_MESSAGE.into(),
        };
        assert_eq!(
            classify(&missing, Environment::Production),
            ErrorAction::Render {
                status: StatusCode::NOT_FOUND,
                view: View::NotFound,
                detail: None,
            }
        );

        let crashed = AppError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".into(),
        };
        assert!(matches!(
            classify(&crashed, Environment::Development),
            ErrorAction::Render { detail: Some(ErrorDetail { kind: "internal", .. }), .. }
        ));
    }

    #[test]
    fn test_into_response_stashes_error() {
        let response = AppError::forbidden("nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.extensions().get::<AppError>(),
            Some(&AppError::forbidden("nope"))
        );
    }
}
