//! Shared handler state.

use std::path::PathBuf;
use std::sync::Arc;

use scan_io::{Catalog, DecodeCache};

/// State cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Stack directory.
    pub catalog: Arc<Catalog>,
    /// Decoded stacks shared across requests.
    pub cache: Arc<DecodeCache>,
}

impl AppState {
    /// State over `images` with a decode cache of `cache_bytes`.
    pub fn new(images: impl Into<PathBuf>, cache_bytes: usize) -> Self {
        Self {
            catalog: Arc::new(Catalog::new(images)),
            cache: Arc::new(DecodeCache::new(cache_bytes)),
        }
    }
}
