//! Serve command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};

use docview_core::convert::HttpConverter;
use docview_core::web::{WebServer, WebServerConfig};

use super::ServeArgs;

/// Run the serve command.
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config();

    if let Some(endpoint) = args.endpoint {
        config.converter.endpoint = endpoint;
    }

    let resolver = super::resolver(&config, args.prefix.as_deref())
        .context("Invalid upload prefix")?;
    let converter =
        HttpConverter::from_config(&config.converter).context("Invalid converter configuration")?;

    let mut server_config = WebServerConfig::from(&config.web);
    if let Some(port) = args.port {
        server_config.port = port;
    }
    if args.public {
        server_config.localhost_only = false;
    }
    if let Some(uploads) = args.uploads {
        server_config.uploads_dir = Some(uploads);
    }

    if let Some(dir) = &server_config.uploads_dir {
        if !dir.is_dir() {
            anyhow::bail!("Uploads directory not found: {}", dir.display());
        }
    }

    let endpoint = converter.endpoint().to_string();
    let prefix = resolver.upload_prefix().to_string();
    let server = WebServer::new(server_config, Arc::new(converter), resolver);

    println!();
    println!("Docview preview API");
    println!();
    for addr in server.addresses() {
        println!("  {addr}");
    }
    println!();
    println!("  Converter:      {endpoint}");
    if let Some(dir) = &server.config().uploads_dir {
        println!("  Uploads:        {} -> {}", prefix, dir.display());
    }
    println!();
    println!("Press Ctrl+C to stop.");

    server
        .start(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested");
        })
        .await
        .context("Web server failed")?;

    Ok(())
}
