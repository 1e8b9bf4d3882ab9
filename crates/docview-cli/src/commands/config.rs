//! Config command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use docview_core::config::Config;

use super::{ConfigAction, ConfigArgs};
use crate::ui::parse_duration;

/// Every settable key, with a short description.
const KEYS: &[(&str, &str)] = &[
    ("preview.upload_prefix", "Prefix prepended to bare file names"),
    ("converter.endpoint", "Conversion endpoint URL"),
    ("converter.timeout", "Conversion request timeout (e.g., 30s, 2m)"),
    ("web.port", "Web server port"),
    ("web.localhost_only", "Bind the web server to localhost only"),
    ("web.uploads_dir", "Directory served under the upload prefix (empty to unset)"),
];

/// Run the config command.
pub async fn run(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = Config::load().context("Failed to load configuration")?;
            let content = toml_pretty(&config)?;
            println!("{content}");
        }
        ConfigAction::Get { key } => {
            let config = Config::load().context("Failed to load configuration")?;
            println!("{}", get_value(&config, &key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().context("Failed to load configuration")?;
            set_value(&mut config, &key, &value)?;
            config.validate().context("Refusing to save invalid configuration")?;
            config.save().context("Failed to save configuration")?;
            println!("Set {key} = {}", get_value(&config, &key)?);
        }
        ConfigAction::List => {
            println!();
            for (key, description) in KEYS {
                println!("  {key:<24} {description}");
            }
            println!();
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
        }
        ConfigAction::Reset => {
            Config::default()
                .save()
                .context("Failed to save configuration")?;
            println!("Configuration reset to defaults.");
        }
    }

    Ok(())
}

fn toml_pretty(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}

/// Read a single configuration value as text.
pub fn get_value(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "preview.upload_prefix" => config.preview.upload_prefix.clone(),
        "converter.endpoint" => config.converter.endpoint.clone(),
        "converter.timeout" => format!("{}s", config.converter.timeout.as_secs()),
        "web.port" => config.web.port.to_string(),
        "web.localhost_only" => config.web.localhost_only.to_string(),
        "web.uploads_dir" => config
            .web
            .uploads_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        _ => bail!("Unknown configuration key: {key}. Run 'docview config list' for valid keys."),
    };
    Ok(value)
}

/// Parse and assign a single configuration value.
pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "preview.upload_prefix" => config.preview.upload_prefix = value.trim().to_string(),
        "converter.endpoint" => config.converter.endpoint = value.trim().to_string(),
        "converter.timeout" => {
            config.converter.timeout = parse_duration(value)
                .context("Invalid duration format. Use formats like '30s', '2m'")?;
        }
        "web.port" => {
            config.web.port = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid port: {value}"))?;
        }
        "web.localhost_only" => config.web.localhost_only = parse_bool(value)?,
        "web.uploads_dir" => {
            let value = value.trim();
            config.web.uploads_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        _ => bail!("Unknown configuration key: {key}. Run 'docview config list' for valid keys."),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => bail!("Invalid boolean: {value}. Use true or false."),
    }
}
