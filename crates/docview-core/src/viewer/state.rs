//! Per-session viewer state and the phase derived from it.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::format::DocumentFormat;

/// A stored file reference supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReference {
    /// Stored location: absolute URL, root-relative path, or bare file name
    #[serde(default)]
    pub file_url: Option<String>,
    /// Original file name
    #[serde(default)]
    pub file_name: String,
    /// Declared MIME type
    #[serde(default)]
    pub file_type: String,
}

impl DocumentReference {
    /// Create a reference without a location.
    #[must_use]
    pub fn new(file_name: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            file_url: None,
            file_name: file_name.into(),
            file_type: file_type.into(),
        }
    }

    /// Set the stored location.
    #[must_use]
    pub fn with_url(mut self, file_url: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self
    }
}

/// Where a viewer error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerErrorKind {
    /// The host failed to load an image or PDF
    NativeLoad,
    /// The conversion request failed or was rejected
    Conversion,
}

/// Error shown in place of the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerError {
    /// Origin of the failure
    pub kind: ViewerErrorKind,
    /// Human-readable description
    pub message: String,
    /// Error code, when the failure maps to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// What the user can do about it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ViewerError {
    pub(crate) fn native_load(format: DocumentFormat, detail: &str) -> Self {
        let what = match format {
            DocumentFormat::Pdf => "PDF",
            _ => "image",
        };
        let detail = detail.trim();
        let message = if detail.is_empty() {
            format!("Failed to load {what}")
        } else {
            format!("Failed to load {what}: {detail}")
        };

        Self {
            kind: ViewerErrorKind::NativeLoad,
            message,
            code: None,
            hint: None,
        }
    }

    pub(crate) fn conversion(err: &Error) -> Self {
        Self {
            kind: ViewerErrorKind::Conversion,
            message: err.to_string(),
            code: err.code().map(String::from),
            hint: err.suggestion().map(String::from),
        }
    }
}

/// Loading and error flags of one preview session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    /// Waiting for the host to load a native element
    pub is_loading: bool,
    /// Failure shown instead of the preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ViewerError>,
}

impl ViewerState {
    /// Initial state for a freshly classified document.
    ///
    /// Only natively previewable formats start loading; every other format
    /// starts settled.
    #[must_use]
    pub const fn initial(format: DocumentFormat) -> Self {
        Self {
            is_loading: format.can_preview_natively(),
            error: None,
        }
    }
}

/// Lifecycle phase of a preview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewPhase {
    /// No resolvable location; nothing is rendered
    Empty,
    /// Native element mounted, waiting for its load signal
    NativeLoading,
    /// Native element loaded
    NativeLoaded,
    /// Native element failed to load
    NativeError,
    /// Conversion request in flight
    OfficeConverting,
    /// Converted markup available
    OfficeReady,
    /// Conversion failed
    OfficeFailed,
    /// No preview strategy for this format
    Unsupported,
    /// Session closed by the caller
    Closed,
}

impl PreviewPhase {
    /// Derive the phase for a document with a non-empty resolved URL.
    #[must_use]
    pub const fn derive(format: DocumentFormat, state: &ViewerState, has_conversion: bool) -> Self {
        match format {
            DocumentFormat::Image | DocumentFormat::Pdf => {
                if state.error.is_some() {
                    Self::NativeError
                } else if state.is_loading {
                    Self::NativeLoading
                } else {
                    Self::NativeLoaded
                }
            }
            DocumentFormat::Word | DocumentFormat::Excel | DocumentFormat::PowerPoint => {
                if state.error.is_some() {
                    Self::OfficeFailed
                } else if has_conversion {
                    Self::OfficeReady
                } else {
                    Self::OfficeConverting
                }
            }
            DocumentFormat::Unsupported => Self::Unsupported,
        }
    }

    /// Whether no further transition can happen without new input.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::NativeLoading | Self::OfficeConverting)
    }

    /// Whether a loading indicator is shown.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert!(ViewerState::initial(DocumentFormat::Image).is_loading);
        assert!(ViewerState::initial(DocumentFormat::Pdf).is_loading);
        assert!(!ViewerState::initial(DocumentFormat::Word).is_loading);
        assert!(!ViewerState::initial(DocumentFormat::Unsupported).is_loading);
    }

    #[test]
    fn test_phase_derivation() {
        let loading = ViewerState::initial(DocumentFormat::Image);
        assert_eq!(
            PreviewPhase::derive(DocumentFormat::Image, &loading, false),
            PreviewPhase::NativeLoading
        );

        let settled = ViewerState::initial(DocumentFormat::Word);
        assert_eq!(
            PreviewPhase::derive(DocumentFormat::Word, &settled, false),
            PreviewPhase::OfficeConverting
        );
        assert_eq!(
            PreviewPhase::derive(DocumentFormat::Excel, &settled, true),
            PreviewPhase::OfficeReady
        );

        let failed = ViewerState {
            is_loading: false,
            error: Some(ViewerError::conversion(&Error::ConversionFailed("x".into()))),
        };
        assert_eq!(
            PreviewPhase::derive(DocumentFormat::PowerPoint, &failed, false),
            PreviewPhase::OfficeFailed
        );
        assert_eq!(
            PreviewPhase::derive(DocumentFormat::Pdf, &failed, false),
            PreviewPhase::NativeError
        );
        assert_eq!(
            PreviewPhase::derive(DocumentFormat::Unsupported, &settled, false),
            PreviewPhase::Unsupported
        );
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!PreviewPhase::NativeLoading.is_terminal());
        assert!(!PreviewPhase::OfficeConverting.is_terminal());
        assert!(PreviewPhase::OfficeFailed.is_terminal());
        assert!(PreviewPhase::Unsupported.is_terminal());
        assert!(PreviewPhase::Empty.is_terminal());
    }

    #[test]
    fn test_native_error_messages() {
        let err = ViewerError::native_load(DocumentFormat::Pdf, "");
        assert_eq!(err.message, "Failed to load PDF");
        assert_eq!(err.kind, ViewerErrorKind::NativeLoad);

        let err = ViewerError::native_load(DocumentFormat::Image, "404 Not Found");
        assert_eq!(err.message, "Failed to load image: 404 Not Found");
    }

    #[test]
    fn test_conversion_error_keeps_code() {
        let err = ViewerError::conversion(&Error::Timeout(30));
        assert_eq!(err.code.as_deref(), Some("E004"));
        assert_eq!(err.kind, ViewerErrorKind::Conversion);
        assert!(err.hint.as_deref().unwrap().contains("converter.endpoint"));

        let err = ViewerError::conversion(&Error::Internal("converter task failed".into()));
        assert!(err.code.is_none());
        assert!(err.hint.is_none());
        assert_eq!(err.message, "internal error: converter task failed");
    }

    #[test]
    fn test_reference_deserializes_null_url() {
        let reference: DocumentReference =
            serde_json::from_str(r#"{"fileUrl":null,"fileName":"a.pdf","fileType":"application/pdf"}"#)
                .unwrap();
        assert!(reference.file_url.is_none());
        assert_eq!(reference.file_name, "a.pdf");
    }
}
