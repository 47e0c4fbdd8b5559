//! Reference previews and downsampled stacks.
//!
//! Previews are JPEGs named after their stack in `reference/`, resized to a
//! fixed width with the aspect ratio kept. Downsampled stacks are 8-bit
//! TIFFs in `downsample/` for sources too large to filter comfortably.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::{Catalog, STACK_EXTENSION};
use crate::error::{IoError, IoResult, encode_err};
use crate::resample::{height_for_width, resize_gray, to_u8};
use crate::stack::{DEFAULT_DPI, write_gray8};

/// Width of reference previews and downsampled stacks.
pub const RESIZE_WIDTH: u32 = 2000;

/// JPEG quality of reference previews.
pub const JPEG_QUALITY: u8 = 80;

/// Decodes, reduces to 8 bit and resizes one stack.
fn resized(catalog: &Catalog, name: &str, width: u32) -> IoResult<(u32, u32, Vec<u8>)> {
    let decoded = catalog.decode(name)?;
    let (w, h) = (decoded.info.width, decoded.info.height);
    let new_h = height_for_width(w, h, width);
    let gray = to_u8(decoded.buffer.samples());
    Ok((width, new_h, resize_gray(&gray, w, h, width, new_h)))
}

fn stack_names(catalog: &Catalog) -> IoResult<Vec<String>> {
    let names = catalog.list()?;
    if names.is_empty() {
        return Err(IoError::NotFound(catalog.root().display().to_string()));
    }
    Ok(names)
}

/// Writes `reference/<stem>.jpg` for every stack.
pub fn write_previews(catalog: &Catalog, width: u32) -> IoResult<Vec<PathBuf>> {
    let names = stack_names(catalog)?;
    fs::create_dir_all(catalog.reference_dir())?;

    let mut written = Vec::with_capacity(names.len());
    for name in &names {
        info!(stack = %name, "converting");
        let (w, h, data) = resized(catalog, name, width)?;
        let path = catalog.reference_path(name);
        write_jpeg_gray8(&path, w, h, &data, JPEG_QUALITY)?;
        written.push(path);
    }
    Ok(written)
}

/// Writes `downsample/<stem>.tif` (8-bit, 72 dpi) for every stack.
pub fn write_downsampled(catalog: &Catalog, width: u32) -> IoResult<Vec<PathBuf>> {
    let names = stack_names(catalog)?;
    let out_dir = catalog.downsample_dir();
    fs::create_dir_all(&out_dir)?;

    let mut written = Vec::with_capacity(names.len());
    for name in &names {
        info!(stack = %name, "downsampling");
        let (w, h, data) = resized(catalog, name, width)?;
        let path = out_dir.join(format!("{name}.{STACK_EXTENSION}"));
        write_gray8(&path, w, h, &data, DEFAULT_DPI)?;
        written.push(path);
    }
    info!(dir = %out_dir.display(), count = written.len(), "resized stacks written");
    Ok(written)
}

/// Writes an 8-bit grayscale JPEG.
pub fn write_jpeg_gray8(path: &Path, width: u32, height: u32, data: &[u8], quality: u8) -> IoResult<()> {
    use jpeg_encoder::{ColorType, Encoder};

    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(IoError::Encode(format!("{width}x{height} exceeds JPEG limits")));
    };

    let mut buffer = Vec::new();
    Encoder::new(&mut buffer, quality)
        .encode(data, w, h, ColorType::Luma)
        .map_err(encode_err)?;
    fs::write(path, buffer)?;
    Ok(())
}
