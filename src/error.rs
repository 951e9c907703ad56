//! Error types for thread processing.

use std::io;

use thiserror::Error;

/// Failures a caller can observe.
///
/// Malformed upstream data never ends up here: unknown parents fall back to
/// the opening post and unknown media formats get an `unknown` extension.
/// Only the absence of anything to render is surfaced.
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("no valid data found")]
    NoData,

    #[error("could not find embedded post data in page")]
    MissingPostData,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
