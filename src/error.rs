//! Error types shared by every render path.

use thiserror::Error;

/// Errors raised while validating input or rendering a template.
#[derive(Debug, Error)]
pub enum Error {
    /// A non-conditional placeholder had no value and redaction was off.
    #[error("Missing required personalization: {}", .0.join(", "))]
    MissingPersonalisation(Vec<String>),

    /// A subject line referenced placeholders that had no value.
    #[error("Missing required subject personalization: {}", .0.join(", "))]
    MissingSubjectPersonalisation(Vec<String>),

    /// A conditional-only accessor was called on a plain placeholder.
    #[error("Placeholder({body}) not conditional")]
    NotConditional {
        /// Body of the offending placeholder.
        body: String,
    },

    /// The template record was not an object or lacked a required field.
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// The personalisation was not a mapping.
    #[error("Values must be a mapping")]
    MalformedValues,

    /// A letter image template was built with unusable arguments.
    #[error("Invalid letter image: {0}")]
    InvalidLetterImage(String),

    /// A renderer failed to write its output.
    #[error("Rendering failed")]
    Fmt(#[from] std::fmt::Error),

    /// Template or personalisation JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;
