//! Preview command implementation.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use docview_core::config::Config;
use docview_core::convert::HttpConverter;
use docview_core::viewer::{DocumentReference, PreviewPhase, PreviewSession};

use super::PreviewArgs;
use crate::ui::{format_flags, parse_duration, phase_label, print_field};

/// Run the preview command.
pub async fn run(args: PreviewArgs) -> Result<()> {
    let config = super::load_config();
    let resolver = super::resolver(&config, args.prefix.as_deref())
        .context("Invalid upload prefix")?;
    let converter = build_converter(&config, &args)?;

    let mut reference = DocumentReference::new(args.file_name.clone(), args.file_type.clone());
    if let Some(url) = &args.url {
        reference = reference.with_url(url.clone());
    }

    let mut session = PreviewSession::open(reference, Arc::new(converter), resolver);

    if session.is_converting() && !args.json && !args.html {
        println!();
        println!("Converting {}...", args.file_name);
    }

    let settled = tokio::select! {
        phase = session.settle() => Some(phase),
        _ = tokio::signal::ctrl_c() => None,
    };
    let Some(phase) = settled else {
        session.close();
        bail!("Preview cancelled");
    };

    let snapshot = session.snapshot();
    let html = snapshot
        .render
        .as_ref()
        .map(|branch| branch.to_html(&snapshot.file_name));

    if let (Some(path), Some(html)) = (&args.output, &html) {
        std::fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if args.json {
        let mut output = serde_json::to_value(&snapshot)?;
        output["html"] = serde_json::json!(html);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.html {
        if let Some(html) = &html {
            println!("{html}");
        }
        return Ok(());
    }

    println!();
    print_field("File", &snapshot.file_name);
    print_field("Format", snapshot.format.as_str());
    print_field("Flags", &format_flags(&snapshot.flags));
    print_field("URL", &snapshot.resolved_url);
    print_field("Status", phase_label(phase));
    if let Some(branch) = &snapshot.render {
        print_field("Render", branch.name());
        if let Some(url) = branch.download_url() {
            print_field("Download", url);
        }
    }
    if let Some(path) = &args.output {
        print_field("Written to", &path.display().to_string());
    }
    println!();

    if phase == PreviewPhase::OfficeFailed {
        if let Some(error) = &snapshot.state.error {
            if let Some(hint) = &error.hint {
                eprintln!("Suggestion:");
                for line in hint.lines() {
                    eprintln!("  {line}");
                }
                eprintln!();
            }
            bail!("{}", error.message);
        }
    }

    Ok(())
}

fn build_converter(config: &Config, args: &PreviewArgs) -> Result<HttpConverter> {
    let mut converter = config.converter.clone();

    if let Some(endpoint) = &args.endpoint {
        converter.endpoint.clone_from(endpoint);
    }
    if let Some(timeout) = &args.timeout {
        converter.timeout = parse_duration(timeout)
            .context("Invalid timeout format. Use formats like '10s', '1m'")?;
    }

    HttpConverter::from_config(&converter).context("Invalid converter configuration")
}
