//! Render dispatch.
//!
//! [`dispatch`] is a pure function from the session inputs to exactly one
//! [`RenderBranch`], checked in this order:
//!
//! 1. empty resolved URL: nothing
//! 2. loading: spinner (the pending native element stays mounted)
//! 3. error: error panel with a download link
//! 4. by format: image, frame, office markup or converting, unsupported

mod html;

use serde::{Deserialize, Serialize};

use crate::convert::ConversionResult;
use crate::format::{DocumentFormat, OfficeKind};
use crate::viewer::ViewerState;

/// Element the host loads natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeKind {
    /// `<img>`
    Image,
    /// `<iframe>`
    Frame,
}

/// A native element and its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeElement {
    /// Element kind
    pub kind: NativeKind,
    /// Resolved source URL
    pub src: String,
}

/// What the preview displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "branch", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RenderBranch {
    /// Spinner over a native element that is still loading
    Loading {
        /// Element whose load/error signal ends the loading state
        #[serde(skip_serializing_if = "Option::is_none")]
        element: Option<NativeElement>,
    },
    /// Failure panel
    Error {
        /// Failure description
        message: String,
        /// Direct link to the original file
        download_url: String,
    },
    /// Native image
    Image {
        /// Resolved source URL
        src: String,
    },
    /// Embedded frame (PDF)
    Frame {
        /// Resolved source URL
        src: String,
    },
    /// Converted office markup
    OfficeMarkup {
        /// Office document kind
        kind: OfficeKind,
        /// HTML fragment to inject
        html: String,
    },
    /// Office conversion still pending
    Converting {
        /// Office document kind
        kind: OfficeKind,
    },
    /// No preview available
    Unsupported {
        /// Direct link to the original file
        download_url: String,
    },
}

impl RenderBranch {
    /// Short name of the branch, matching its serialized tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Error { .. } => "error",
            Self::Image { .. } => "image",
            Self::Frame { .. } => "frame",
            Self::OfficeMarkup { .. } => "office_markup",
            Self::Converting { .. } => "converting",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Whether the branch shows a pending indicator.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Loading { .. } | Self::Converting { .. })
    }

    /// Download link offered by the branch, if any.
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        match self {
            Self::Error { download_url, .. } | Self::Unsupported { download_url } => {
                Some(download_url)
            }
            _ => None,
        }
    }
}

fn native_element(format: DocumentFormat, resolved_url: &str) -> Option<NativeElement> {
    let kind = match format {
        DocumentFormat::Image => NativeKind::Image,
        DocumentFormat::Pdf => NativeKind::Frame,
        _ => return None,
    };
    Some(NativeElement {
        kind,
        src: resolved_url.to_string(),
    })
}

fn office_branch(kind: OfficeKind, conversion: Option<&ConversionResult>) -> RenderBranch {
    conversion.map_or(RenderBranch::Converting { kind }, |result| {
        RenderBranch::OfficeMarkup {
            kind,
            html: result.html_content.clone(),
        }
    })
}

/// Choose the render branch for the given inputs.
///
/// Returns `None` when there is nothing to preview.
#[must_use]
pub fn dispatch(
    format: DocumentFormat,
    state: &ViewerState,
    conversion: Option<&ConversionResult>,
    resolved_url: &str,
) -> Option<RenderBranch> {
    if resolved_url.is_empty() {
        return None;
    }

    if state.is_loading {
        return Some(RenderBranch::Loading {
            element: native_element(format, resolved_url),
        });
    }

    if let Some(error) = &state.error {
        return Some(RenderBranch::Error {
            message: error.message.clone(),
            download_url: resolved_url.to_string(),
        });
    }

    let branch = match format {
        DocumentFormat::Image => RenderBranch::Image {
            src: resolved_url.to_string(),
        },
        DocumentFormat::Pdf => RenderBranch::Frame {
            src: resolved_url.to_string(),
        },
        DocumentFormat::Word => office_branch(OfficeKind::Word, conversion),
        DocumentFormat::Excel => office_branch(OfficeKind::Excel, conversion),
        DocumentFormat::PowerPoint => office_branch(OfficeKind::PowerPoint, conversion),
        DocumentFormat::Unsupported => RenderBranch::Unsupported {
            download_url: resolved_url.to_string(),
        },
    };

    tracing::trace!(branch = branch.name(), %format, "dispatched render branch");
    Some(branch)
}
