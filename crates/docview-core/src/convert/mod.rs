//! Office document conversion.
//!
//! Office formats cannot be shown natively, so they are sent to a conversion
//! endpoint that returns a markup fragment. The endpoint is an external
//! collaborator; this module only defines its wire contract and a client.
//!
//! ## Wire format
//!
//! ```text
//! POST <endpoint>
//! { "fileUrl": "/uploads/documents/resume.docx" }
//!
//! 200 OK
//! { "success": true, "content": { "htmlContent": "<p>…</p>" } }
//! { "success": false, "error": "unsupported document" }
//! ```

#[cfg(feature = "http")]
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[cfg(feature = "http")]
pub use http::HttpConverter;

/// Markup produced by converting an office document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// HTML fragment to inject into the preview container
    pub html_content: String,
}

impl ConversionResult {
    /// Wrap an HTML fragment.
    #[must_use]
    pub fn new(html_content: impl Into<String>) -> Self {
        Self {
            html_content: html_content.into(),
        }
    }
}

/// Request body sent to the conversion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Resolved URL of the document to convert
    pub file_url: String,
}

/// Response body returned by the conversion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionResponse {
    /// Whether conversion succeeded
    #[serde(default)]
    pub success: bool,
    /// Converted content, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ConversionResult>,
    /// Failure description, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResponse {
    /// Build a successful response.
    #[must_use]
    pub fn ok(html_content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: Some(ConversionResult::new(html_content)),
            error: None,
        }
    }

    /// Build a failed response.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
        }
    }

    /// Fold the response into a single result.
    pub fn into_result(self) -> Result<ConversionResult> {
        match (self.success, self.content) {
            (true, Some(content)) => Ok(content),
            (true, None) => Err(Error::InvalidResponse(
                "success reported without content".to_string(),
            )),
            (false, _) => Err(Error::ConversionFailed(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "conversion endpoint reported failure".to_string()),
            )),
        }
    }
}

/// Converts office documents into HTML fragments.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert the document at `file_url`.
    async fn convert(&self, file_url: &str) -> Result<ConversionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let req = ConversionRequest {
            file_url: "https://host/resume.docx".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"fileUrl":"https://host/resume.docx"}"#);
    }

    #[test]
    fn test_successful_response() {
        let resp: ConversionResponse =
            serde_json::from_str(r#"{"success":true,"content":{"htmlContent":"<p>hi</p>"}}"#)
                .unwrap();
        assert_eq!(resp.into_result().unwrap().html_content, "<p>hi</p>");
    }

    #[test]
    fn test_failed_response_carries_message() {
        let resp: ConversionResponse =
            serde_json::from_str(r#"{"success":false,"error":"password protected"}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, Error::ConversionFailed(ref m) if m == "password protected"));
    }

    #[test]
    fn test_failed_response_without_message() {
        let resp: ConversionResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, Error::ConversionFailed(_)));
    }

    #[test]
    fn test_success_without_content_is_invalid() {
        let resp: ConversionResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            resp.into_result(),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_missing_success_is_failure() {
        let resp: ConversionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_result().is_err());
    }
}
