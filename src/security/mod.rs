//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (security headers stamped on the way out)
//!     → csrf.rs issue_token (new token cookie, token exposed to views)
//!     → csrf.rs validate_token (POST/PUT/DELETE only)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Headers apply to every response, including rejections and error pages
//! - Fail closed: a missing or mismatched token ends the request

pub mod csrf;
pub mod headers;

pub use csrf::{CsrfSettings, CsrfToken, CSRF_COOKIE_NAME, CSRF_FORM_FIELD, CSRF_HEADER};
pub use headers::SecurityHeaderPolicy;
