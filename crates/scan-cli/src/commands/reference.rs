//! `reference` and `downsample` commands.

use anyhow::{Context, Result};
use scan_io::reference::{write_downsampled, write_previews};

use crate::ResizeArgs;

/// Writes `reference/<stem>.jpg` for every stack.
pub fn run_reference(args: ResizeArgs) -> Result<()> {
    let catalog = super::open_catalog(&args.images)?;
    let written = write_previews(&catalog, args.width).context("Failed to write reference previews")?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Writes 8-bit copies of every stack into `downsample/`.
pub fn run_downsample(args: ResizeArgs) -> Result<()> {
    let catalog = super::open_catalog(&args.images)?;
    let written = write_downsampled(&catalog, args.width).context("Failed to downsample stacks")?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
