//! Error types for the pdfdrop library.
//!
//! [`UploadError`] covers every way a submission can end without a result:
//!
//! * **Validation**: the selected file is not a PDF. Caught before any
//!   network traffic; the widget stays idle.
//! * **Transport**: the request never produced a usable response (connection
//!   failure, timeout, or a body that is not the expected JSON).
//! * **Application**: the service answered with an `error` field.
//!
//! [`UploadError::kind`] collapses the variants into those three buckets so
//! the widget can pick the right alert text without matching every variant.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfdrop library.
#[derive(Debug, Error)]
pub enum UploadError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The declared MIME type of the selected file is not `application/pdf`.
    #[error("Only PDF files are accepted, got '{mime}'")]
    NotAPdf { mime: String },

    /// The file to upload does not exist.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request could not be sent or the response could not be read.
    #[error("Upload to '{url}' failed: {reason}")]
    Transport { url: String, reason: String },

    /// The request did not complete within the configured timeout.
    #[error("Upload to '{url}' timed out after {secs}s\nIncrease --timeout.")]
    Timeout { url: String, secs: u64 },

    /// The response body was not the JSON document the service returns.
    #[error("Malformed response from '{url}': {reason}")]
    MalformedResponse { url: String, reason: String },

    // ── Application errors ────────────────────────────────────────────────
    /// The service processed the request and reported an error.
    #[error("Server rejected the upload: {message}")]
    Rejected { message: String },

    // ── Download errors ───────────────────────────────────────────────────
    /// Fetching the processed file failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Could not write the downloaded file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of an [`UploadError`], as seen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was made.
    Validation,
    /// The request failed or the response was unusable.
    Transport,
    /// The service answered with an error message.
    Application,
}

impl UploadError {
    /// Which of the three user-facing buckets this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::NotAPdf { .. }
            | UploadError::FileNotFound { .. }
            | UploadError::PermissionDenied { .. }
            | UploadError::InvalidConfig(_) => ErrorKind::Validation,
            UploadError::Rejected { .. } => ErrorKind::Application,
            UploadError::Transport { .. }
            | UploadError::Timeout { .. }
            | UploadError::MalformedResponse { .. }
            | UploadError::DownloadFailed { .. }
            | UploadError::OutputWriteFailed { .. } => ErrorKind::Transport,
        }
    }
}
