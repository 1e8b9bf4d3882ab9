//! Inspect command implementation.

use anyhow::{Context, Result};

use docview_core::format::classify;

use super::InspectArgs;
use crate::ui::{format_flags, print_field};

/// Run the inspect command.
pub async fn run(args: InspectArgs) -> Result<()> {
    let config = super::load_config();
    let resolver = super::resolver(&config, args.prefix.as_deref())
        .context("Invalid upload prefix")?;

    let format = classify(&args.file_type, &args.file_name);
    let resolved_url = resolver.resolve(args.url.as_deref());
    let flags = format.flags();

    if args.json {
        let output = serde_json::json!({
            "fileName": args.file_name,
            "fileType": args.file_type,
            "format": format,
            "flags": flags,
            "resolvedUrl": resolved_url,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    print_field("File", &args.file_name);
    if !args.file_type.is_empty() {
        print_field("MIME type", &args.file_type);
    }
    print_field("Format", format.as_str());
    print_field("Flags", &format_flags(&flags));
    if resolved_url.is_empty() {
        print_field("URL", "(none, nothing to preview)");
    } else {
        print_field("URL", &resolved_url);
    }
    println!();

    Ok(())
}
