//! Configuration types for uploads.
//!
//! [`UploadConfig`] describes where and how to talk to the processing
//! service; [`UploadOptions`] carries the two per-submission switches the
//! service understands. Options are deliberately not part of the config: the
//! widget reads them from the view's checkboxes at every submission.

use crate::error::UploadError;
use crate::messages::Locale;
use reqwest::Url;

/// Fixed path of the upload endpoint on the processing service.
pub const UPLOAD_PATH: &str = "/upload";

/// Development address of the processing service.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5555";

/// The only MIME type the widget will submit.
pub const PDF_MIME: &str = "application/pdf";

/// Connection settings for the processing service.
///
/// Built via [`UploadConfig::builder()`] or using [`UploadConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfdrop::UploadConfig;
///
/// let config = UploadConfig::builder()
///     .server_url("http://localhost:5555")
///     .timeout_secs(120)
///     .build()
///     .unwrap();
/// assert_eq!(config.upload_url().as_str(), "http://localhost:5555/upload");
/// ```
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Base URL of the processing service. Default: `http://127.0.0.1:5555`.
    pub server_url: Url,

    /// Cap on the whole upload request, in seconds. Default: none.
    ///
    /// Without a cap a request that never settles keeps the widget pending.
    pub timeout_secs: Option<u64>,

    /// Language for alert texts. Default: [`Locale::Ja`].
    pub locale: Locale,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            timeout_secs: None,
            locale: Locale::default(),
            user_agent: concat!("pdfdrop/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
            server_url: None,
        }
    }

    /// Absolute URL of the upload endpoint.
    pub fn upload_url(&self) -> Url {
        self.resolve(UPLOAD_PATH)
            .unwrap_or_else(|| self.server_url.clone())
    }

    /// Resolve a (possibly relative) link returned by the service.
    pub fn resolve(&self, link: &str) -> Option<Url> {
        self.server_url.join(link).ok()
    }
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
    server_url: Option<String>,
}

impl UploadConfigBuilder {
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<UploadConfig, UploadError> {
        if let Some(raw) = self.server_url.take() {
            let url = Url::parse(raw.trim()).map_err(|e| {
                UploadError::InvalidConfig(format!("server URL '{raw}' is not valid: {e}"))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(UploadError::InvalidConfig(format!(
                    "server URL must be http or https, got '{}'",
                    url.scheme()
                )));
            }
            self.config.server_url = url;
        }
        if self.config.timeout_secs == Some(0) {
            return Err(UploadError::InvalidConfig("timeout must be ≥ 1 second".into()));
        }
        Ok(self.config)
    }
}

/// The two switches sent with every upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Run OCR and embed a searchable text layer (`searchable` field).
    pub searchable: bool,
    /// Clean up scanned images before OCR (`enhance` field).
    pub enhance: bool,
}

impl UploadOptions {
    pub fn new(searchable: bool, enhance: bool) -> Self {
        Self { searchable, enhance }
    }

    /// Multipart text fields, values rendered as `"true"` / `"false"`.
    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [
            ("searchable", self.searchable.to_string()),
            ("enhance", self.enhance.to_string()),
        ]
    }
}
