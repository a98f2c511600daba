//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans from tower-http's TraceLayer, tagged with the request ID
//!
//! Consumers:
//!     → stdout (JSON in production, pretty in development)
//! ```

pub mod logging;
