//! Error types for parsing upstream vocabulary codes.

/// Errors raised when an upstream string cannot be mapped onto a typed value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty after trimming.
    #[error("empty {0} value")]
    Empty(&'static str),
    /// The input is not a recognized code for the given vocabulary.
    #[error("unrecognized {kind} '{value}'")]
    Unrecognized { kind: &'static str, value: String },
}
