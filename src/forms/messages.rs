//! Rewrites raw schema-validation errors into field-specific messages.
//!
//! Raw messages look like
//! ``User validation failed: username: Path `username` (`x`) is shorter than the minimum allowed length (3).``
//! and may carry several `Path` segments, one per failing field.

use crate::forms::{Field, ValidationSchema};

const SEGMENT_MARKER: &str = "Path";
const PREAMBLE_MARKER: &str = "validation";

/// Violation kinds a segment can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    TooLong,
    TooShort,
    MissingDigit,
}

impl Violation {
    fn classify(field: Field, segment: &str) -> Self {
        if segment.contains("maximum") {
            Violation::TooLong
        } else if field == Field::Password && segment.contains("invalid") {
            Violation::MissingDigit
        } else {
            Violation::TooShort
        }
    }
}

/// Format a raw validation error using the bounds from `schema`.
///
/// Segments mentioning no known field are kept verbatim, so text that has
/// already been formatted passes through unchanged.
pub fn format_validation_message(message: &str, schema: &ValidationSchema) -> String {
    message
        .split(SEGMENT_MARKER)
        .filter(|segment| !segment.contains(PREAMBLE_MARKER))
        .map(|segment| format_segment(segment, schema))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_segment(segment: &str, schema: &ValidationSchema) -> String {
    let Some(field) = Field::ALL
        .into_iter()
        .find(|field| segment.contains(field.key()))
    else {
        return segment.to_string();
    };

    let bounds = schema.bounds(field);
    match Violation::classify(field, segment) {
        Violation::TooLong => format!(
            "{}: is longer than the maximum allowed length ({}).",
            field.label(),
            bounds.max_length
        ),
        Violation::TooShort => format!(
            "{}: is shorter than the minimum allowed length ({}).",
            field.label(),
            bounds.min_length
        ),
        Violation::MissingDigit => format!("{}: Requires atleast 1 digit", field.label()),
    }
}
