//! Normalization of stored file references into fetchable URLs.
//!
//! | Input | Result |
//! |-------|--------|
//! | absent, blank or non-string | `""` (nothing to preview) |
//! | `http://…`, `https://…`, `/…` | unchanged |
//! | bare file name | `{upload_prefix}/{name}` |

use serde_json::Value;

use crate::error::{Error, Result};

/// Resolves file references against an upload directory prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    upload_prefix: String,
}

impl UrlResolver {
    /// Create a resolver for the given upload prefix.
    ///
    /// The prefix must be root-relative (`/…`) or an absolute http(s) URL,
    /// otherwise resolved URLs would not be stable under re-resolution.
    pub fn new(upload_prefix: impl Into<String>) -> Result<Self> {
        let prefix = upload_prefix.into();
        let trimmed = prefix.trim();

        if !is_absolute(trimmed) {
            return Err(Error::InvalidConfig {
                key: "preview.upload_prefix".to_string(),
                reason: format!("'{prefix}' must start with '/', 'http://' or 'https://'"),
            });
        }

        Ok(Self {
            upload_prefix: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// The upload prefix, without a trailing slash.
    #[must_use]
    pub fn upload_prefix(&self) -> &str {
        &self.upload_prefix
    }

    /// Resolve a possibly-absent file reference.
    ///
    /// Surrounding whitespace is ignored. An empty result means there is
    /// nothing to preview.
    #[must_use]
    pub fn resolve(&self, file_url: Option<&str>) -> String {
        let Some(file_url) = file_url.map(str::trim).filter(|u| !u.is_empty()) else {
            return String::new();
        };

        if is_absolute(file_url) {
            return file_url.to_string();
        }

        format!("{}/{file_url}", self.upload_prefix)
    }

    /// Resolve an untyped JSON value. Anything but a string resolves to `""`.
    #[must_use]
    pub fn resolve_value(&self, file_url: &Value) -> String {
        self.resolve(file_url.as_str())
    }
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self {
            upload_prefix: crate::DEFAULT_UPLOAD_PREFIX.to_string(),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')
}

/// Resolve against the default upload prefix.
#[must_use]
pub fn resolve_file_url(file_url: Option<&str>) -> String {
    UrlResolver::default().resolve(file_url)
}
