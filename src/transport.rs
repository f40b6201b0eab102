//! Network side of an upload: the multipart POST and its JSON answer.
//!
//! The service answers every request with a small JSON document, whatever
//! the HTTP status:
//!
//! ```text
//! { "success": true, "filename": "out.pdf", "download_url": "/download/out.pdf" }
//! { "error": "All pages were blank and removed." }
//! ```
//!
//! Status codes are therefore never inspected. Anything that is not one of
//! those two shapes counts as a transport failure.

use crate::config::{UploadConfig, UploadOptions};
use crate::error::UploadError;
use crate::file::SelectedFile;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// What the service returns for a successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Display name of the processed file.
    pub filename: String,
    /// Link to the processed file, usually relative to the server.
    pub download_url: String,
}

/// Sends one file to the processing service.
///
/// The widget is generic over this trait so tests can substitute a scripted
/// service for the real HTTP client.
pub trait Uploader {
    /// Submit `file` with `options` and wait for the service's verdict.
    fn upload(
        &self,
        file: SelectedFile,
        options: UploadOptions,
    ) -> impl Future<Output = Result<UploadReceipt, UploadError>> + Send;
}

/// [`Uploader`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    config: UploadConfig,
}

impl HttpUploader {
    pub fn new(config: UploadConfig) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| UploadError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Fetch the processed file behind `receipt` into `dir`.
    ///
    /// The file is stored under the receipt's display name; any directory
    /// components in that name are dropped.
    pub async fn download(
        &self,
        receipt: &UploadReceipt,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, UploadError> {
        let url = self.config.resolve(&receipt.download_url).ok_or_else(|| {
            UploadError::DownloadFailed {
                url: receipt.download_url.clone(),
                reason: "not a valid link".into(),
            }
        })?;
        info!("Downloading processed file from: {}", url);

        let fail = |reason: String| UploadError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;

        let name = Path::new(&receipt.filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "download.pdf".into());
        let path = dir.as_ref().join(name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| UploadError::OutputWriteFailed {
                path: path.clone(),
                source,
            })?;

        info!("Saved {} bytes to: {}", bytes.len(), path.display());
        Ok(path)
    }

    fn transport_error(&self, url: &Url, e: reqwest::Error) -> UploadError {
        match self.config.timeout_secs {
            Some(secs) if e.is_timeout() => UploadError::Timeout {
                url: url.to_string(),
                secs,
            },
            _ => UploadError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

impl Uploader for HttpUploader {
    async fn upload(
        &self,
        file: SelectedFile,
        options: UploadOptions,
    ) -> Result<UploadReceipt, UploadError> {
        let url = self.config.upload_url();
        let (name, mime, bytes) = file.into_parts();
        info!(
            "Uploading '{}' ({} bytes) to {} searchable={} enhance={}",
            name,
            bytes.len(),
            url,
            options.searchable,
            options.enhance
        );

        let part = Part::bytes(bytes)
            .file_name(name)
            .mime_str(&mime)
            .map_err(|e| UploadError::Transport {
                url: url.to_string(),
                reason: format!("invalid content type '{mime}': {e}"),
            })?;
        let form = options
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (key, value)| {
                form.text(key, value)
            });

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;
        debug!("Upload answered HTTP {} ({} bytes)", status, body.len());

        parse_response(url.as_str(), &body)
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Text of an `error` value the way the page would print it, or `None`
/// when the value is falsy (`null`, `false`, `0`, `""`).
fn error_text(value: serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Interpret the service's JSON answer.
///
/// A truthy `error` wins over everything else; non-string values are
/// rendered as JSON text. Otherwise both `filename` and `download_url` must
/// be present.
pub fn parse_response(url: &str, body: &str) -> Result<UploadReceipt, UploadError> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| UploadError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(message) = raw.error.and_then(error_text) {
        return Err(UploadError::Rejected { message });
    }

    match (raw.filename, raw.download_url) {
        (Some(filename), Some(download_url)) => Ok(UploadReceipt {
            filename,
            download_url,
        }),
        _ => Err(UploadError::MalformedResponse {
            url: url.to_string(),
            reason: "response has neither an error nor filename and download_url".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:5555/upload";

    #[test]
    fn parses_success() {
        let body = r#"{"success": true, "filename": "out.pdf", "download_url": "/dl/out.pdf"}"#;
        let receipt = parse_response(URL, body).unwrap();
        assert_eq!(receipt.filename, "out.pdf");
        assert_eq!(receipt.download_url, "/dl/out.pdf");
    }

    #[test]
    fn error_field_rejects() {
        let err = parse_response(URL, r#"{"error": "conversion failed"}"#).unwrap_err();
        match err {
            UploadError::Rejected { message } => assert_eq!(message, "conversion failed"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn error_wins_over_result_fields() {
        let body = r#"{"error": "boom", "filename": "out.pdf", "download_url": "/dl/out.pdf"}"#;
        assert!(matches!(
            parse_response(URL, body),
            Err(UploadError::Rejected { .. })
        ));
    }

    #[test]
    fn empty_error_is_ignored() {
        let body = r#"{"error": "", "filename": "out.pdf", "download_url": "/dl/out.pdf"}"#;
        assert!(parse_response(URL, body).is_ok());
    }

    #[test]
    fn non_string_error_is_stringified() {
        for (body, expected) in [
            (r#"{"error": true}"#, "true"),
            (r#"{"error": 413}"#, "413"),
            (r#"{"error": {"code": 7}}"#, r#"{"code":7}"#),
        ] {
            match parse_response(URL, body) {
                Err(UploadError::Rejected { message }) => assert_eq!(message, expected),
                other => panic!("{body}: expected Rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn falsy_error_values_are_ignored() {
        for error in ["null", "false", "0", "\"\""] {
            let body = format!(
                r#"{{"error": {error}, "filename": "out.pdf", "download_url": "/dl/out.pdf"}}"#
            );
            assert!(parse_response(URL, &body).is_ok(), "error = {error}");
        }
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_response(URL, "<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_response(URL, r#"{"filename": "out.pdf"}"#).unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse { .. }));
        let err = parse_response(URL, "[]").unwrap_err();
        assert!(matches!(err, UploadError::MalformedResponse { .. }));
    }

    #[test]
    fn preserves_unicode_verbatim() {
        let body = r#"{"filename": "請求書_2024-01-31.pdf", "download_url": "/download/請求書_2024-01-31.pdf"}"#;
        let receipt = parse_response(URL, body).unwrap();
        assert_eq!(receipt.filename, "請求書_2024-01-31.pdf");
        assert_eq!(receipt.download_url, "/download/請求書_2024-01-31.pdf");
    }
}
