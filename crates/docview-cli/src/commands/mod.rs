//! CLI command definitions and handlers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Load configuration with graceful fallback to defaults.
///
/// If the config file doesn't exist or can't be parsed, it falls back to defaults.
pub fn load_config() -> docview_core::config::Config {
    match docview_core::config::Config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Using default configuration: {err}");
            docview_core::config::Config::default()
        }
    }
}

pub mod config;
pub mod inspect;
pub mod preview;
pub mod serve;

/// Docview - Multi-format document preview
#[derive(Parser)]
#[command(name = "docview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Classify a document and resolve its URL
    Inspect(InspectArgs),

    /// Run a full preview, converting office documents
    Preview(PreviewArgs),

    /// Start the preview web API
    Serve(ServeArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the inspect command
#[derive(Parser)]
pub struct InspectArgs {
    /// File name used for extension-based classification
    pub file_name: String,

    /// Declared MIME type
    #[arg(short = 't', long = "type", default_value = "")]
    pub file_type: String,

    /// Stored file reference (bare name, root-relative path or URL)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Override the upload prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the preview command
#[derive(Parser)]
pub struct PreviewArgs {
    /// File name used for extension-based classification
    pub file_name: String,

    /// Declared MIME type
    #[arg(short = 't', long = "type", default_value = "")]
    pub file_type: String,

    /// Stored file reference (bare name, root-relative path or URL)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Override the upload prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Override the conversion endpoint
    #[arg(long, env = "DOCVIEW_CONVERTER")]
    pub endpoint: Option<String>,

    /// Conversion timeout (e.g., 10s, 1m)
    #[arg(long)]
    pub timeout: Option<String>,

    /// Print the HTML fragment instead of a summary
    #[arg(long, conflicts_with = "json")]
    pub html: bool,

    /// Write the HTML fragment to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the serve command
#[derive(Parser)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen on all interfaces instead of localhost
    #[arg(long)]
    pub public: bool,

    /// Directory served under the upload prefix
    #[arg(long)]
    pub uploads: Option<PathBuf>,

    /// Override the upload prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Override the conversion endpoint
    #[arg(long, env = "DOCVIEW_CONVERTER")]
    pub endpoint: Option<String>,
}

/// Arguments for the config command
#[derive(Parser)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Show all configuration
    Show,

    /// List all available configuration keys
    List,

    /// Show the configuration file path
    Path,

    /// Reset to defaults
    Reset,
}

/// Build the URL resolver from config, honoring a `--prefix` override.
pub fn resolver(
    config: &docview_core::config::Config,
    prefix: Option<&str>,
) -> docview_core::Result<docview_core::resolve::UrlResolver> {
    match prefix {
        Some(prefix) => docview_core::resolve::UrlResolver::new(prefix),
        None => config.preview.resolver(),
    }
}
