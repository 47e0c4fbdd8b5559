//! `serve` command.

use anyhow::{Context, Result};
use scan_server::ServerConfig;
use tracing::info;

use crate::ServeArgs;

/// Runs the HTTP service on a multi-threaded runtime until Ctrl-C.
pub fn run(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        images: args.images,
        client_dir: args.client_dir,
        cache_bytes: args.cache_mb.saturating_mul(1024 * 1024),
    };
    info!(
        images = %config.images.display(),
        client = %config.client_dir.display(),
        cache_mb = config.cache_bytes / (1024 * 1024),
        "starting stackscan"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let addr = config.bind_addr();
    runtime
        .block_on(scan_server::serve(config))
        .with_context(|| format!("Server on {addr} failed"))
}
