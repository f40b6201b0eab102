//! The file a user picked or dropped.
//!
//! A [`SelectedFile`] carries only what a browser's `File` object exposes to
//! page scripts: a name, a *declared* MIME type and the bytes. The declared
//! type is derived from the file extension; the content itself is never
//! sniffed, so a `.pdf` full of text still passes the widget's type check and
//! it is up to the service to reject it.

use crate::config::PDF_MIME;
use crate::error::UploadError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A user-chosen file, held in memory for exactly one submission.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    /// Wrap bytes that already have a name and a declared type.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, declaring its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => UploadError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => UploadError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let mime = declared_mime(path);
        debug!("Selected '{}' ({}, {} bytes)", name, mime, bytes.len());

        Ok(Self { name, mime, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client-reported MIME type. Empty when the type is unknown.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Exact match on `application/pdf`; no parameters, no case folding.
    pub fn is_pdf(&self) -> bool {
        self.mime == PDF_MIME
    }

    pub(crate) fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.name, self.mime, self.bytes)
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// MIME type a browser would report for `path`: extension based, empty if
/// the extension is unknown.
pub fn declared_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or_default()
        .to_string()
}

/// Paths given on a command line or dropped from a file manager.
///
/// Only the first path is read, as only the first dropped file is ever
/// submitted. The rest are never opened, so a missing extra file is not an
/// error. Returns an empty selection for an empty slice.
pub async fn select_paths(paths: &[PathBuf]) -> Result<Vec<SelectedFile>, UploadError> {
    let Some(first) = paths.first() else {
        return Ok(Vec::new());
    };
    if paths.len() > 1 {
        debug!("Ignoring {} additional path(s)", paths.len() - 1);
    }
    Ok(vec![SelectedFile::from_path(first).await?])
}
