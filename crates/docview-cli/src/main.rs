//! Docview CLI - Multi-format document preview
//!
//! Docview decides how a stored document is previewed: natively, through a
//! conversion endpoint, or as a download.
//!
//! ## Quick Start
//!
//! ```bash
//! # Classify a file and resolve its URL
//! docview inspect resume.docx
//!
//! # Convert an office document and print the HTML fragment
//! docview preview resume.docx --url resume.docx --html
//!
//! # Serve the preview API
//! docview serve --uploads ./uploads
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

use anyhow::Result;
use clap::Parser;

mod commands;
pub mod ui;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(args) => commands::inspect::run(args).await,
        Command::Preview(args) => commands::preview::run(args).await,
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Config(args) => commands::config::run(args).await,
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,docview=info,docview_core=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
