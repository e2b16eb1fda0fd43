//! Locale override for legacy (application-driven) extraction.
//!
//! Spreadsheet applications parse and format numbers according to the
//! locale they run under. Legacy extraction pins a locale for the duration
//! of one call instead of changing anything process-wide: the embedded
//! driver uses it to render numeric cells, the headless driver passes it to
//! the child process environment only.

use std::fmt;

use serde::Deserialize;

/// A BCP 47 style locale tag such as `en-US` or `de-DE`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Locale {
    tag: String,
}

impl Locale {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        let tag = tag.into().trim().replace('_', "-");
        if tag.is_empty() {
            return Self::default();
        }
        Self { tag }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Language subtag, lower-cased (`en` for `en-US`)
    pub fn language(&self) -> String {
        self.tag
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Region subtag, upper-cased, if present
    pub fn region(&self) -> Option<String> {
        self.tag
            .split('-')
            .nth(1)
            .filter(|r| !r.is_empty())
            .map(|r| r.to_ascii_uppercase())
    }

    /// POSIX locale name for child process environments (`en_US.UTF-8`)
    pub fn posix_name(&self) -> String {
        match self.region() {
            Some(region) => format!("{}_{}.UTF-8", self.language(), region),
            None => format!("{}.UTF-8", self.language()),
        }
    }

    /// Decimal separator used when rendering numbers
    pub fn decimal_separator(&self) -> char {
        match self.language().as_str() {
            "en" | "ja" | "zh" | "ko" | "he" | "th" | "ga" | "mt" => '.',
            "de" | "fr" | "es" | "it" | "nl" | "pt" | "ru" | "pl" | "sv" | "da" | "nb" | "nn"
            | "fi" | "cs" | "tr" | "el" | "hu" | "ro" | "uk" | "id" => ',',
            _ => '.',
        }
    }

    /// Render a cell number the way the application would display it
    pub fn format_number(&self, value: f64) -> String {
        let rendered = value.to_string();
        match self.decimal_separator() {
            '.' => rendered,
            sep => rendered.replace('.', &sep.to_string()),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
        }
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
