//! Server configuration.

use std::path::PathBuf;

use scan_io::cache::DEFAULT_CACHE_SIZE;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Server settings, filled from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding the `.tif` stacks and `reference/`.
    pub images: PathBuf,
    /// Directory of the built client, served for every other path.
    pub client_dir: PathBuf,
    /// Decode cache budget in bytes; 0 disables the cache.
    pub cache_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            images: PathBuf::from("img"),
            client_dir: PathBuf::from("build"),
            cache_bytes: DEFAULT_CACHE_SIZE,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
