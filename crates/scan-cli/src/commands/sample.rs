//! `sample` command.

use anyhow::{Context, Result};
use scan_io::Catalog;
use scan_io::sample::{SampleOptions, generate};

use crate::SampleArgs;

/// Writes demo stacks plus the overlay mask.
pub fn run(args: SampleArgs) -> Result<()> {
    let catalog = Catalog::new(&args.images);
    let options = SampleOptions {
        count: args.count,
        width: args.width,
        height: args.height,
        seed: args.seed,
        ..SampleOptions::default()
    };
    let report = generate(&catalog, &options)
        .with_context(|| format!("Failed to write samples to {}", args.images.display()))?;

    for path in &report.stacks {
        println!("{}", path.display());
    }
    println!("{}", report.overlay.display());
    println!("seed: {}", report.seed);
    Ok(())
}
