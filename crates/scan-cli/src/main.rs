//! stackscan - threshold scanning of TIFF stacks
//!
//! Serves the scanner's HTTP API and provides offline tools for the stack
//! directory it reads.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "stackscan")]
#[command(author, version, about = "Threshold scanning of TIFF stacks")]
#[command(long_about = "
Finds every pixel of a TIFF stack whose intensity falls inside a band and
serves the results to the scatter viewer.

Examples:
  stackscan serve                             # API on :5000, stacks from ./img
  stackscan serve --port 8080 --images data   # Custom port and directory
  stackscan filter 0 --pixel-weight 204 --distance 20
  stackscan filter 0 -p 204 -d 20 --json      # Full JSON result
  stackscan sample --seed 7                   # Three demo stacks + overlay
  stackscan reference                         # reference/<stem>.jpg previews
  stackscan downsample --width 1000           # 8-bit copies in downsample/
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to daily-rolling files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Number of threads for resampling (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    #[command(visible_alias = "s")]
    Serve(ServeArgs),

    /// Run one threshold query locally
    #[command(visible_alias = "f")]
    Filter(FilterArgs),

    /// Write sample stacks and the label overlay
    Sample(SampleArgs),

    /// Write JPEG reference previews
    Reference(ResizeArgs),

    /// Write 8-bit downsampled stacks
    Downsample(ResizeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = scan_server::config::DEFAULT_PORT)]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Stack directory
    #[arg(long, env = "IMAGE_DIR", default_value = "img")]
    images: PathBuf,

    /// Built client served for all other paths
    #[arg(long, default_value = "build")]
    client_dir: PathBuf,

    /// Decode cache budget in MB (0 = disabled)
    #[arg(long, default_value = "256")]
    cache_mb: usize,
}

#[derive(Args)]
struct FilterArgs {
    /// Stack name (file stem)
    name: String,

    /// Band center
    #[arg(short = 'p', long, allow_hyphen_values = true)]
    pixel_weight: f64,

    /// Band half-width
    #[arg(short, long, allow_hyphen_values = true)]
    distance: f64,

    /// Stack directory
    #[arg(long, env = "IMAGE_DIR", default_value = "img")]
    images: PathBuf,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SampleArgs {
    /// Output directory
    #[arg(long, default_value = "img")]
    images: PathBuf,

    /// Number of stacks
    #[arg(short = 'n', long, default_value = "3")]
    count: usize,

    /// Frame width
    #[arg(long, default_value = "1000")]
    width: u32,

    /// Frame height
    #[arg(long, default_value = "1500")]
    height: u32,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ResizeArgs {
    /// Stack directory
    #[arg(long, env = "IMAGE_DIR", default_value = "img")]
    images: PathBuf,

    /// Output width (height keeps the aspect ratio)
    #[arg(short, long, default_value_t = scan_io::reference::RESIZE_WIDTH)]
    width: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_dir.as_deref())?;

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Filter(args) => commands::filter::run(args, cli.verbose),
        Commands::Sample(args) => commands::sample::run(args),
        Commands::Reference(args) => commands::reference::run_reference(args),
        Commands::Downsample(args) => commands::reference::run_downsample(args),
    }
}
