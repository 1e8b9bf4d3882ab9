//! HTML fragments for render branches.

use std::fmt::Write;

use super::{NativeElement, NativeKind, RenderBranch};

impl RenderBranch {
    /// Render the branch as an HTML fragment.
    ///
    /// `file_name` is used for alt text, frame titles and download names.
    /// Converted office markup is injected as-is.
    #[must_use]
    pub fn to_html(&self, file_name: &str) -> String {
        let name = escape(file_name);
        let mut out = String::new();

        match self {
            Self::Loading { element } => {
                out.push_str(
                    r#"<div class="docview-loading" role="status"><span class="docview-spinner"></span><p>Loading preview…</p></div>"#,
                );
                if let Some(element) = element {
                    out.push_str(&native_html(element, &name, true));
                }
            }
            Self::Error {
                message,
                download_url,
            } => {
                let _ = write!(
                    out,
                    r#"<div class="docview-error" role="alert"><p>{}</p>{}</div>"#,
                    escape(message),
                    download_link(download_url, &name),
                );
            }
            Self::Image { src } => {
                out.push_str(&native_html(
                    &NativeElement {
                        kind: NativeKind::Image,
                        src: src.clone(),
                    },
                    &name,
                    false,
                ));
            }
            Self::Frame { src } => {
                out.push_str(&native_html(
                    &NativeElement {
                        kind: NativeKind::Frame,
                        src: src.clone(),
                    },
                    &name,
                    false,
                ));
            }
            Self::OfficeMarkup { kind, html } => {
                let _ = write!(
                    out,
                    r#"<div class="docview-office" data-kind="{}" aria-label="{}">{html}</div>"#,
                    escape(kind.label()),
                    name,
                );
            }
            Self::Converting { kind } => {
                let _ = write!(
                    out,
                    r#"<div class="docview-converting" role="status"><span class="docview-spinner"></span><p>Converting {}…</p></div>"#,
                    escape(kind.label()),
                );
            }
            Self::Unsupported { download_url } => {
                let _ = write!(
                    out,
                    r#"<div class="docview-unsupported"><p>Preview not available for {name}</p>{}</div>"#,
                    download_link(download_url, &name),
                );
            }
        }

        out
    }
}

fn native_html(element: &NativeElement, name: &str, hidden: bool) -> String {
    let hidden = if hidden { " hidden" } else { "" };
    let src = escape(&element.src);
    match element.kind {
        NativeKind::Image => format!(
            r#"<img class="docview-image" src="{src}" alt="{name}" data-docview-signal="native"{hidden}>"#
        ),
        NativeKind::Frame => format!(
            r#"<iframe class="docview-frame" src="{src}" title="{name}" data-docview-signal="native"{hidden}></iframe>"#
        ),
    }
}

fn download_link(url: &str, name: &str) -> String {
    format!(
        r#"<a class="docview-download" href="{}" download="{name}">Download {name}</a>"#,
        escape(url)
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
