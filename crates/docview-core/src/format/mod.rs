//! Document format classification.
//!
//! Maps a declared MIME type and a file name to a single [`DocumentFormat`]:
//!
//! | Format | MIME types | Extension fallback |
//! |--------|------------|--------------------|
//! | Image | `image/*` | guessed |
//! | Pdf | `application/pdf` | guessed |
//! | Word | OOXML wordprocessing, `application/msword` | `.doc`, `.docx` |
//! | Excel | OOXML spreadsheet, `application/vnd.ms-excel` | `.xls`, `.xlsx` |
//! | PowerPoint | OOXML presentation, `application/vnd.ms-powerpoint` | `.ppt`, `.pptx` |
//! | Unsupported | anything else | - |
//!
//! The extension is only consulted when the MIME type is empty or generic
//! (`application/octet-stream` and friends).

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MIME_PPTX: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
const MIME_DOC: &str = "application/msword";
const MIME_XLS: &str = "application/vnd.ms-excel";
const MIME_PPT: &str = "application/vnd.ms-powerpoint";

/// MIME types that say nothing about the content.
const GENERIC_MIME_TYPES: &[&str] = &[
    "",
    "application/octet-stream",
    "binary/octet-stream",
    "application/unknown",
    "application/x-download",
    "application/force-download",
];

/// Category of a document, deciding how it can be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Raster or vector image, shown with a native image element
    Image,
    /// PDF, shown in an embedded frame
    Pdf,
    /// Word-processing document
    Word,
    /// Spreadsheet
    Excel,
    /// Presentation
    PowerPoint,
    /// Anything without a preview strategy
    Unsupported,
}

impl DocumentFormat {
    /// Whether the host can display this format without conversion.
    #[must_use]
    pub const fn can_preview_natively(self) -> bool {
        matches!(self, Self::Image | Self::Pdf)
    }

    /// Whether this format needs server-side conversion to markup.
    #[must_use]
    pub const fn is_office_document(self) -> bool {
        matches!(self, Self::Word | Self::Excel | Self::PowerPoint)
    }

    /// The office kind of this format, if any.
    #[must_use]
    pub const fn office_kind(self) -> Option<OfficeKind> {
        match self {
            Self::Word => Some(OfficeKind::Word),
            Self::Excel => Some(OfficeKind::Excel),
            Self::PowerPoint => Some(OfficeKind::PowerPoint),
            _ => None,
        }
    }

    /// Boolean view of this format.
    #[must_use]
    pub const fn flags(self) -> FormatFlags {
        FormatFlags {
            is_image: matches!(self, Self::Image),
            is_pdf: matches!(self, Self::Pdf),
            is_word: matches!(self, Self::Word),
            is_excel: matches!(self, Self::Excel),
            is_power_point: matches!(self, Self::PowerPoint),
            is_office_document: self.is_office_document(),
            can_preview_natively: self.can_preview_natively(),
        }
    }

    /// Short lowercase name, as used in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Excel => "excel",
            Self::PowerPoint => "power_point",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Office document kinds that require conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeKind {
    /// Word-processing document
    Word,
    /// Spreadsheet
    Excel,
    /// Presentation
    PowerPoint,
}

impl OfficeKind {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Word => "Word document",
            Self::Excel => "Excel spreadsheet",
            Self::PowerPoint => "PowerPoint presentation",
        }
    }
}

/// Boolean flags derived from a [`DocumentFormat`].
///
/// At most one of the five base flags is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct FormatFlags {
    /// `image/*`
    pub is_image: bool,
    /// PDF
    pub is_pdf: bool,
    /// Word document
    pub is_word: bool,
    /// Excel spreadsheet
    pub is_excel: bool,
    /// PowerPoint presentation
    pub is_power_point: bool,
    /// Any of Word, Excel or PowerPoint
    pub is_office_document: bool,
    /// Image or PDF
    pub can_preview_natively: bool,
}

/// Classify a document from its declared MIME type and file name.
///
/// Never fails: unknown combinations yield [`DocumentFormat::Unsupported`].
#[must_use]
pub fn classify(mime_type: &str, file_name: &str) -> DocumentFormat {
    let mime = normalize_mime(mime_type);

    let format = if is_generic_mime(&mime) {
        classify_extension(file_name)
    } else {
        classify_mime(&mime)
    };

    tracing::debug!(mime = %mime, file_name, %format, "classified document");
    format
}

fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_generic_mime(mime: &str) -> bool {
    GENERIC_MIME_TYPES.contains(&mime)
}

fn classify_mime(mime: &str) -> DocumentFormat {
    if mime.starts_with("image/") {
        return DocumentFormat::Image;
    }

    match mime {
        MIME_PDF => DocumentFormat::Pdf,
        MIME_DOCX | MIME_DOC => DocumentFormat::Word,
        MIME_XLSX | MIME_XLS => DocumentFormat::Excel,
        MIME_PPTX | MIME_PPT => DocumentFormat::PowerPoint,
        _ => DocumentFormat::Unsupported,
    }
}

fn classify_extension(file_name: &str) -> DocumentFormat {
    let path = Path::new(file_name.trim());
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("doc" | "docx") => DocumentFormat::Word,
        Some("xls" | "xlsx") => DocumentFormat::Excel,
        Some("ppt" | "pptx") => DocumentFormat::PowerPoint,
        Some(_) => mime_guess::from_path(path)
            .first()
            .map_or(DocumentFormat::Unsupported, |guessed| {
                classify_mime(guessed.essence_str())
            }),
        None => DocumentFormat::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_extensions_with_generic_mime() {
        let cases = [
            ("contract.docx", DocumentFormat::Word),
            ("legacy.DOC", DocumentFormat::Word),
            ("rota.xlsx", DocumentFormat::Excel),
            ("rates.xls", DocumentFormat::Excel),
            ("induction.pptx", DocumentFormat::PowerPoint),
            ("old-deck.ppt", DocumentFormat::PowerPoint),
        ];

        for (name, expected) in cases {
            for mime in ["", "application/octet-stream"] {
                let format = classify(mime, name);
                assert_eq!(format, expected, "{name} with {mime:?}");
                assert!(format.flags().is_office_document);
                assert!(!format.flags().can_preview_natively);
            }
        }
    }

    #[test]
    fn test_image_mime_types() {
        for mime in ["image/png", "image/jpeg", "image/svg+xml", "IMAGE/GIF"] {
            let flags = classify(mime, "whatever.bin").flags();
            assert!(flags.is_image, "{mime}");
            assert!(flags.can_preview_natively);
            assert!(!flags.is_office_document);
        }
    }

    #[test]
    fn test_pdf_mime_type() {
        let flags = classify("application/pdf", "dbs-certificate").flags();
        assert!(flags.is_pdf);
        assert!(flags.can_preview_natively);
        assert!(!flags.is_image);
    }

    #[test]
    fn test_mime_parameters_are_ignored() {
        assert_eq!(
            classify("application/pdf; charset=binary", "a"),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_office_mime_types() {
        assert_eq!(classify(MIME_DOCX, "x"), DocumentFormat::Word);
        assert_eq!(classify(MIME_DOC, "x"), DocumentFormat::Word);
        assert_eq!(classify(MIME_XLSX, "x"), DocumentFormat::Excel);
        assert_eq!(classify(MIME_XLS, "x"), DocumentFormat::Excel);
        assert_eq!(classify(MIME_PPTX, "x"), DocumentFormat::PowerPoint);
        assert_eq!(classify(MIME_PPT, "x"), DocumentFormat::PowerPoint);
    }

    #[test]
    fn test_specific_mime_takes_precedence_over_extension() {
        assert_eq!(
            classify("application/zip", "payslip.docx"),
            DocumentFormat::Unsupported
        );
        assert_eq!(classify("image/png", "scan.pdf"), DocumentFormat::Image);
    }

    #[test]
    fn test_guessed_native_extensions() {
        assert_eq!(classify("", "passport.PNG"), DocumentFormat::Image);
        assert_eq!(
            classify("application/octet-stream", "training.pdf"),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_unsupported_yields_no_flags() {
        let format = classify("application/zip", "archive.zip");
        assert_eq!(format, DocumentFormat::Unsupported);
        assert_eq!(format.flags(), FormatFlags::default());

        assert_eq!(classify("", "README"), DocumentFormat::Unsupported);
        assert_eq!(classify("", ""), DocumentFormat::Unsupported);
        assert_eq!(classify("text/csv", "shifts.csv"), DocumentFormat::Unsupported);
    }

    #[test]
    fn test_at_most_one_base_flag() {
        for format in [
            DocumentFormat::Image,
            DocumentFormat::Pdf,
            DocumentFormat::Word,
            DocumentFormat::Excel,
            DocumentFormat::PowerPoint,
            DocumentFormat::Unsupported,
        ] {
            let f = format.flags();
            let set = [f.is_image, f.is_pdf, f.is_word, f.is_excel, f.is_power_point]
                .iter()
                .filter(|b| **b)
                .count();
            assert!(set <= 1, "{format}");
        }
    }

    #[test]
    fn test_flags_serialize_camel_case() {
        let json = serde_json::to_string(&DocumentFormat::Word.flags()).unwrap();
        assert!(json.contains("\"isWord\":true"));
        assert!(json.contains("\"isOfficeDocument\":true"));
        assert!(json.contains("\"canPreviewNatively\":false"));
    }
}
