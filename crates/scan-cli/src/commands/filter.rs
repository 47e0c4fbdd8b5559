//! `filter` command: one threshold query without the HTTP layer.

use anyhow::{Context, Result};
use scan_core::filter::filter;
use scan_core::{Band, FilterResult};
use std::time::Instant;
use tracing::debug;

use crate::FilterArgs;

/// Decodes the stack, runs the band filter and prints the outcome.
pub fn run(args: FilterArgs, verbose: bool) -> Result<()> {
    let catalog = super::open_catalog(&args.images)?;
    let band = Band::around(args.pixel_weight, args.distance);

    let started = Instant::now();
    let stack = catalog
        .decode(&args.name)
        .with_context(|| format!("Failed to load stack: {}", args.name))?;
    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "decoded");

    let result = filter(&stack.info, &stack.buffer, band);

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{json}");
    } else {
        print_text(&args.name, band, &result, verbose);
    }
    Ok(())
}

fn print_text(name: &str, band: Band, result: &FilterResult, verbose: bool) {
    println!("{name}");
    println!("  Resolution: {}x{}", result.width, result.height);
    println!("  Depth:      {} bit", result.bits_per_sample);
    println!("  Band:       [{}, {}]", band.min, band.max);
    println!("  Matched:    {}", result.offsets.len());
    if result.truncated {
        println!("  Truncated:  yes (first {} kept)", result.offsets.len());
    }
    if verbose {
        if let (Some(first), Some(last)) = (result.offsets.first(), result.offsets.last()) {
            println!("  Offsets:    {first} .. {last}");
        }
        if let (Some(x), Some(y)) = (result.x_resolution, result.y_resolution) {
            println!("  DPI:        {x} x {y} (unit {})", result.resolution_unit);
        }
    }
}
