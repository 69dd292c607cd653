//! Centralized error types for emlshell.

use thiserror::Error;

/// All errors produced by the emlshell library.
///
/// Only [`EmlError::MissingSeparator`] ever reaches a caller of the
/// top-level parse functions. Everything else is absorbed inside the
/// pipeline and reflected by absence (a dropped part, a defaulted
/// field) plus a diagnostic entry.
#[derive(Error, Debug)]
pub enum EmlError {
    /// The input has no blank line between the header block and the body.
    #[error("invalid message format: no header/body separator found")]
    MissingSeparator,

    /// A base64 payload could not be decoded.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Convenience alias for `Result<T, EmlError>`.
pub type Result<T> = std::result::Result<T, EmlError>;
