//! # pdfdrop
//!
//! Client for a PDF processing service: pick or drop a PDF, send it to the
//! service's `/upload` endpoint with two switches (OCR text layer, image
//! enhancement) and show either the processed file or the error.
//!
//! ## Flow Overview
//!
//! ```text
//! gesture (click / drop)
//!  │
//!  ├─ 1. Select    first file only, declared MIME type from the extension
//!  ├─ 2. Validate  exactly "application/pdf", else alert and stay idle
//!  ├─ 3. Pending   status region shown, drop zone hidden
//!  ├─ 4. Upload    multipart POST /upload: file, searchable, enhance
//!  └─ 5. Outcome   result region (filename + download link) or alert + idle
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfdrop::{HttpUploader, MemoryView, Messages, SelectedFile, UploadConfig, UploadWidget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UploadConfig::builder()
//!         .server_url("http://127.0.0.1:5555")
//!         .build()?;
//!     let messages = Messages::new(config.locale);
//!     let uploader = HttpUploader::new(config)?;
//!     let mut widget = UploadWidget::new(MemoryView::new(), uploader, messages);
//!
//!     let file = SelectedFile::from_path("scan.pdf").await?;
//!     widget.submit(file).await;
//!     println!("{:?}", widget.view().download_url);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfdrop` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod file;
pub mod messages;
pub mod transport;
pub mod view;
pub mod widget;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{UploadConfig, UploadConfigBuilder, UploadOptions, PDF_MIME, UPLOAD_PATH};
pub use error::{ErrorKind, UploadError};
pub use file::SelectedFile;
pub use messages::{Locale, Messages};
pub use transport::{parse_response, HttpUploader, UploadReceipt, Uploader};
pub use view::{MemoryView, Region, View, ViewState};
pub use widget::{Submission, UploadWidget, WidgetEvent};
