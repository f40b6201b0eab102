//! Localised alert texts.
//!
//! The widget's only feedback channel is a blocking alert, so every failure
//! path needs a message in the user's language. Japanese is the default
//! because it is the language of the service's own page.

use std::fmt;
use std::str::FromStr;

/// Language used for alert texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// Japanese.
    #[default]
    Ja,
    /// English.
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" | "japanese" => Ok(Locale::Ja),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected ja or en)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ja => f.write_str("ja"),
            Locale::En => f.write_str("en"),
        }
    }
}

/// Alert texts for one [`Locale`].
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Shown when the selected file is not declared as `application/pdf`.
    pub fn only_pdf(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "PDFファイルのみ対応しています。",
            Locale::En => "Only PDF files are supported.",
        }
    }

    /// Shown on transport failures and unreadable responses.
    pub fn upload_failed(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "アップロードに失敗しました。",
            Locale::En => "Upload failed.",
        }
    }

    /// Wraps the service's own error text.
    pub fn server_error(&self, detail: &str) -> String {
        match self.locale {
            Locale::Ja => format!("エラー: {detail}"),
            Locale::En => format!("Error: {detail}"),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
