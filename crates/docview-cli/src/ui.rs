//! UI utilities for Docview CLI.

use std::time::Duration;

use docview_core::format::FormatFlags;
use docview_core::viewer::PreviewPhase;

/// Parse a duration string like "5m", "30s", or "1h".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(num_str) = s.strip_suffix('m') {
        let num: u64 = num_str.parse().ok()?;
        Some(Duration::from_secs(num.checked_mul(60)?))
    } else if let Some(num_str) = s.strip_suffix('s') {
        let num: u64 = num_str.parse().ok()?;
        Some(Duration::from_secs(num))
    } else if let Some(num_str) = s.strip_suffix('h') {
        let num: u64 = num_str.parse().ok()?;
        Some(Duration::from_secs(num.checked_mul(3600)?))
    } else {
        None
    }
}

/// Human-readable label for a preview phase.
pub const fn phase_label(phase: PreviewPhase) -> &'static str {
    match phase {
        PreviewPhase::Empty => "nothing to preview",
        PreviewPhase::NativeLoading => "shown natively (host loads the file)",
        PreviewPhase::NativeLoaded => "shown natively",
        PreviewPhase::NativeError => "native load failed",
        PreviewPhase::OfficeConverting => "converting…",
        PreviewPhase::OfficeReady => "converted",
        PreviewPhase::OfficeFailed => "conversion failed",
        PreviewPhase::Unsupported => "preview not available, download only",
        PreviewPhase::Closed => "closed",
    }
}

/// Names of the flags that are set, comma-separated.
pub fn format_flags(flags: &FormatFlags) -> String {
    let named = [
        ("image", flags.is_image),
        ("pdf", flags.is_pdf),
        ("word", flags.is_word),
        ("excel", flags.is_excel),
        ("powerpoint", flags.is_power_point),
        ("office", flags.is_office_document),
        ("native", flags.can_preview_natively),
    ];

    let set: Vec<&str> = named
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();

    if set.is_empty() {
        "none".to_string()
    } else {
        set.join(", ")
    }
}

/// Print an aligned `label: value` line.
pub fn print_field(label: &str, value: &str) {
    println!("  {:<14} {}", format!("{label}:"), value);
}
