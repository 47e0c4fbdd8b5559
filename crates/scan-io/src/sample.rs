//! Sample stacks for demos and tests.
//!
//! Each sample is an 8-bit frame, black except for two discs filled with
//! uniform noise: a large disc at the image center and a small disc near the
//! top whose horizontal position differs per sample. The overlay mask marks
//! the union of all discs with 255.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{IoResult, encode_err};
use crate::stack::{DEFAULT_DPI, write_gray8};

/// Sample generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOptions {
    /// Number of stacks to write (`0.tif`, `1.tif`, ...).
    pub count: usize,
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Radius of the central disc.
    pub radius: f64,
    /// Radius of the per-sample disc.
    pub small_radius: f64,
    /// RNG seed; random when `None`.
    pub seed: Option<u64>,
    /// Output resolution in dots per inch.
    pub dpi: u32,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            count: 3,
            width: 1000,
            height: 1500,
            radius: 450.0,
            small_radius: 100.0,
            seed: None,
            dpi: DEFAULT_DPI,
        }
    }
}

impl SampleOptions {
    /// Center of the small disc of sample `index`.
    pub fn small_center(&self, index: usize) -> (f64, f64) {
        let x = self.width as f64 * (index + 1) as f64 / (self.count + 1) as f64;
        (x, self.small_radius * 1.5)
    }

    /// Center of the large disc.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Files written by [`generate`].
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// Stack paths in index order.
    pub stacks: Vec<PathBuf>,
    /// Overlay mask path.
    pub overlay: PathBuf,
    /// Seed actually used.
    pub seed: u64,
}

#[inline]
fn inside(x: f64, y: f64, (cx, cy): (f64, f64), radius: f64) -> bool {
    (cx - x).hypot(cy - y) < radius
}

/// Writes sample stacks into the catalog root and the overlay mask into
/// its reference directory.
pub fn generate(catalog: &Catalog, options: &SampleOptions) -> IoResult<SampleReport> {
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let (w, h) = (options.width, options.height);
    let size = w as usize * h as usize;
    let center = options.center();

    fs::create_dir_all(catalog.root())?;
    fs::create_dir_all(catalog.reference_dir())?;

    let mut label = vec![0u8; size];
    let mut stacks = Vec::with_capacity(options.count);

    for i in 0..options.count {
        let small = options.small_center(i);
        let mut data = vec![0u8; size];
        for (j, px) in data.iter_mut().enumerate() {
            let x = (j % w as usize) as f64;
            let y = (j / w as usize) as f64;
            if inside(x, y, small, options.small_radius) || inside(x, y, center, options.radius) {
                *px = rng.random();
                label[j] = 255;
            }
        }

        let path = catalog.root().join(format!("{i}.tif"));
        write_gray8(&path, w, h, &data, options.dpi)?;
        debug!(path = %path.display(), "wrote sample stack");
        stacks.push(path);
    }

    let overlay = catalog.overlay_path();
    write_png_gray8(&overlay, w, h, &label)?;
    info!(count = options.count, width = w, height = h, seed, "generated sample stacks");

    Ok(SampleReport {
        stacks,
        overlay,
        seed,
    })
}

/// Writes an 8-bit grayscale PNG.
pub fn write_png_gray8(path: &Path, width: u32, height: u32, data: &[u8]) -> IoResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header().map_err(encode_err)?;
    png_writer.write_image_data(data).map_err(encode_err)?;
    png_writer.finish().map_err(encode_err)?;
    Ok(())
}
