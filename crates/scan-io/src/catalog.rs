//! Stack catalog: the directory of `.tif` stacks and its reference assets.
//!
//! ```text
//! img/
//!   0.tif, 1.tif, ...        stacks
//!   reference/
//!     0.jpg, 1.jpg, ...      downsampled previews, same stems
//!     overlay.png            label mask
//!   downsample/              optional reduced stacks
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use scan_core::{CatalogSummary, validate_stack_name};
use tracing::{debug, trace};

use crate::error::{IoError, IoResult};
use crate::stack::{self, DecodedStack};

/// Extension of stack files.
pub const STACK_EXTENSION: &str = "tif";

/// Subdirectory holding reference previews and the overlay mask.
pub const REFERENCE_DIR: &str = "reference";

/// Subdirectory for downsampled stacks.
pub const DOWNSAMPLE_DIR: &str = "downsample";

/// Label mask file name inside [`REFERENCE_DIR`].
pub const OVERLAY_FILE: &str = "overlay.png";

/// Directory of stacks.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    /// Catalog rooted at `root`. The directory is not touched until queried.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stack directory.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stack names (file stems of `*.tif`), sorted.
    pub fn list(&self) -> IoResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == STACK_EXTENSION))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .filter(|name| match validate_stack_name(name) {
                Ok(()) => true,
                Err(e) => {
                    debug!(name = %name, error = %e, "catalog::list skipping");
                    false
                }
            })
            .collect();
        names.sort();
        trace!(root = %self.root.display(), count = names.len(), "catalog::list");
        Ok(names)
    }

    /// Path of a stack, after rejecting names that could leave the directory.
    pub fn path_of(&self, name: &str) -> IoResult<PathBuf> {
        validate_stack_name(name).map_err(|e| IoError::InvalidName(e.to_string()))?;
        Ok(self.root.join(format!("{name}.{STACK_EXTENSION}")))
    }

    /// Listing plus metadata of the first stack.
    ///
    /// # Errors
    ///
    /// [`IoError::NotFound`] when the directory holds no stacks.
    pub fn summary(&self) -> IoResult<CatalogSummary> {
        let files = self.list()?;
        let first = files
            .first()
            .ok_or_else(|| IoError::NotFound(self.root.display().to_string()))?;
        let info = stack::read_header(self.path_of(first)?, first)?;
        debug!(
            stacks = files.len(),
            width = info.width,
            height = info.height,
            bits = info.bits_per_sample,
            "catalog summary"
        );
        Ok(CatalogSummary {
            bits_per_sample: info.bits_per_sample,
            files,
            height: info.height,
            width: info.width,
        })
    }

    /// Decodes a stack by name, bypassing any cache.
    pub fn decode(&self, name: &str) -> IoResult<DecodedStack> {
        stack::read(self.path_of(name)?, name)
    }

    /// Reference preview directory.
    pub fn reference_dir(&self) -> PathBuf {
        self.root.join(REFERENCE_DIR)
    }

    /// Reference preview of a stack.
    pub fn reference_path(&self, name: &str) -> PathBuf {
        self.reference_dir().join(format!("{name}.jpg"))
    }

    /// Label overlay mask.
    pub fn overlay_path(&self) -> PathBuf {
        self.reference_dir().join(OVERLAY_FILE)
    }

    /// Downsampled stack directory.
    pub fn downsample_dir(&self) -> PathBuf {
        self.root.join(DOWNSAMPLE_DIR)
    }
}
