//! CLI command implementations

pub mod filter;
pub mod reference;
pub mod sample;
pub mod serve;

use anyhow::{Result, bail};
use scan_io::Catalog;
use std::path::Path;

/// Opens a stack directory, failing early if it does not exist.
pub fn open_catalog(images: &Path) -> Result<Catalog> {
    if !images.is_dir() {
        bail!("Stack directory not found: {}", images.display());
    }
    Ok(Catalog::new(images))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_catalog(&dir.path().join("nope")).is_err());
        assert!(open_catalog(dir.path()).is_ok());
    }
}
