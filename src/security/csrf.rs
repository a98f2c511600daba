//! Double-submit CSRF protection.
//!
//! # Responsibilities
//! - Issue a fresh random token on every request and set it as the `XSRF-TOKEN` cookie
//! - Expose the token to views through the request extensions
//! - On POST/PUT/DELETE, compare the submitted token with the cookie-held one
//!
//! # Design Decisions
//! - Tokens are 32 bytes from the OS CSPRNG, hex encoded
//! - Comparison is constant-time byte equality
//! - Tokens never appear in log output
//! - Without a submitted token the cookie value is used as the candidate unless
//!   `csrf.require_submitted_token` is set
//! - A `_csrf` field sent more than once is rejected
//! - Oversized or unreadable bodies end as an [`AppError`] for the error handler

use std::error::Error as StdError;
use std::fmt;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cookie::{Cookie, SameSite};
use http_body_util::LengthLimitError;
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;

use crate::config::AppConfig;
use crate::http::AppError;

/// Cookie holding the issued token.
pub const CSRF_COOKIE_NAME: &str = "XSRF-TOKEN";

/// Form field carrying the submitted token.
pub const CSRF_FORM_FIELD: &str = "_csrf";

/// Header carrying the submitted token for non-form requests.
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-xsrf-token");

const TOKEN_BYTES: usize = 32;
const REJECTION_BODY: &str = "Invalid CSRF token";

/// A freshly issued CSRF token, available to handlers and views.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a token from the OS random source.
    ///
    /// Panics if the OS cannot supply randomness; the request cannot proceed without it.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}

/// CSRF middleware settings derived from the application config.
#[derive(Debug, Clone)]
pub struct CsrfSettings {
    /// Mark the token cookie `Secure`.
    pub secure_cookie: bool,
    /// Disable the fallback to the cookie value when nothing was submitted.
    pub require_submitted_token: bool,
    /// Upper bound when buffering a body to read the form field.
    pub max_body_bytes: usize,
}

impl CsrfSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            secure_cookie: config.is_production(),
            require_submitted_token: config.csrf.require_submitted_token,
            max_body_bytes: config.limits.max_body_bytes,
        }
    }
}

/// The `_csrf` entries found in a urlencoded body.
#[derive(Debug, PartialEq, Eq)]
enum FormToken {
    Missing,
    Single(String),
    /// The field was sent more than once; never a valid submission.
    Repeated,
}

/// Build the `Set-Cookie` value for an issued token.
pub fn token_cookie(token: &CsrfToken, secure: bool) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE_NAME, token.as_str().to_owned()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .path("/")
        .build()
}

/// Only mutating methods are checked.
pub fn requires_token(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

/// Read a cookie value from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_owned())
}

/// Pick the candidate token: form field, then header, then (optionally) the cookie itself.
/// Empty values count as absent.
pub fn submitted_token(
    form: Option<String>,
    header: Option<String>,
    cookie: Option<&str>,
    require_submitted: bool,
) -> Option<String> {
    [form, header]
        .into_iter()
        .flatten()
        .find(|token| !token.is_empty())
        .or_else(|| {
            if require_submitted {
                None
            } else {
                cookie.map(str::to_owned)
            }
        })
}

/// Exact byte equality in constant time. Missing or empty tokens never match.
pub fn tokens_match(candidate: Option<&str>, cookie: Option<&str>) -> bool {
    match (candidate, cookie) {
        (Some(candidate), Some(cookie)) if !candidate.is_empty() => {
            candidate.as_bytes().ct_eq(cookie.as_bytes()).into()
        }
        _ => false,
    }
}

fn is_form_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

fn form_token(body: &[u8]) -> FormToken {
    let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) else {
        return FormToken::Missing;
    };

    let mut values = pairs
        .into_iter()
        .filter(|(name, _)| name == CSRF_FORM_FIELD)
        .map(|(_, value)| value);
    match (values.next(), values.next()) {
        (None, _) => FormToken::Missing,
        (Some(value), None) => FormToken::Single(value),
        (Some(_), Some(_)) => FormToken::Repeated,
    }
}

fn exceeds_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(error) = source {
        if error.is::<LengthLimitError>() {
            return true;
        }
        source = error.source();
    }
    false
}

fn reject(parts: &Parts) -> Response {
    tracing::warn!(
        method = %parts.method,
        path = %parts.uri.path(),
        "CSRF token validation failed"
    );
    (StatusCode::NOT_FOUND, REJECTION_BODY).into_response()
}

/// Middleware issuing a new token on every request.
pub async fn issue_token(
    State(settings): State<CsrfSettings>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = CsrfToken::generate();
    let cookie = token_cookie(&token, settings.secure_cookie);
    request.extensions_mut().insert(token);

    let mut response = next.run(request).await;
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(error) => tracing::error!(%error, "Failed to encode CSRF cookie"),
    }
    response
}

/// Middleware rejecting mutating requests whose token does not match the cookie.
pub async fn validate_token(
    State(settings): State<CsrfSettings>,
    request: Request,
    next: Next,
) -> Response {
    if !requires_token(request.method()) {
        return next.run(request).await;
    }

    let cookie = read_cookie(request.headers(), CSRF_COOKIE_NAME);
    let header = request
        .headers()
        .get(&CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let is_form = is_form_body(request.headers());

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, settings.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(error) if exceeds_limit(&error) => {
            return AppError::from_status(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request entity too large",
            )
            .into_response();
        }
        Err(error) => {
            return AppError::from_status(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {error}"),
            )
            .into_response();
        }
    };

    let form = match is_form.then(|| form_token(&bytes)) {
        Some(FormToken::Repeated) => return reject(&parts),
        Some(FormToken::Single(value)) => Some(value),
        Some(FormToken::Missing) | None => None,
    };
    let candidate = submitted_token(
        form,
        header,
        cookie.as_deref(),
        settings.require_submitted_token,
    );

    if !tokens_match(candidate.as_deref(), cookie.as_deref()) {
        return reject(&parts);
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
