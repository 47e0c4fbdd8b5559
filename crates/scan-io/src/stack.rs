//! TIFF stack decoding and encoding.
//!
//! Only the first frame (IFD) of a stack is read. Supported layouts are
//! single-channel 8-bit and 16-bit grayscale; everything else is reported
//! as [`IoError::UnsupportedColorType`].
//!
//! # Example
//!
//! ```rust,ignore
//! use scan_io::stack;
//!
//! let decoded = stack::read("img/0.tif", "0")?;
//! println!("{}x{} @ {} bit", decoded.info.width, decoded.info.height, decoded.info.bits_per_sample);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;

use scan_core::stack::RESOLUTION_UNIT_INCH;
use scan_core::{IntensityBuffer, Samples, StackInfo};
use tiff::ColorType;
use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::{self, ColorType as EncoderColorType};
use tiff::encoder::{Rational, TiffEncoder, TiffValue};
use tiff::tags::{ResolutionUnit, Tag};
use tracing::{debug, trace};

use crate::error::{IoError, IoResult, decode_err, encode_err};

/// Default output resolution for generated stacks (dots per inch).
pub const DEFAULT_DPI: u32 = 72;

/// A decoded first frame with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedStack {
    /// Frame metadata.
    pub info: StackInfo,
    /// Frame samples.
    pub buffer: IntensityBuffer,
}

impl DecodedStack {
    /// Heap size of the samples in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.buffer.samples().size_bytes()
    }
}

fn open_decoder(path: &Path) -> IoResult<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|e| IoError::Decode(format!("cannot open {}: {e}", path.display())))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(decode_err)?
        .with_limits(Limits::unlimited());
    Ok(decoder)
}

fn bits_of(color_type: ColorType) -> IoResult<u16> {
    match color_type {
        ColorType::Gray(8) => Ok(8),
        ColorType::Gray(16) => Ok(16),
        other => Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    }
}

fn read_info<R: Read + Seek>(decoder: &mut Decoder<R>, name: &str) -> IoResult<StackInfo> {
    let (width, height) = decoder.dimensions().map_err(decode_err)?;
    let bits_per_sample = bits_of(decoder.colortype().map_err(decode_err)?)?;

    let resolution_unit = match decoder.find_tag(Tag::ResolutionUnit) {
        Ok(Some(v)) => v
            .into_u32()
            .ok()
            .and_then(|u| u16::try_from(u).ok())
            .unwrap_or(RESOLUTION_UNIT_INCH),
        _ => RESOLUTION_UNIT_INCH,
    };

    Ok(StackInfo {
        name: name.to_string(),
        width,
        height,
        bits_per_sample,
        resolution_unit,
        x_resolution: resolution_tag(decoder, Tag::XResolution),
        y_resolution: resolution_tag(decoder, Tag::YResolution),
    })
}

fn resolution_tag<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Option<f64> {
    match decoder.find_tag(tag) {
        Ok(Some(Value::Rational(n, d))) if d != 0 => Some(n as f64 / d as f64),
        Ok(Some(Value::Float(v))) => Some(v as f64),
        Ok(Some(Value::Double(v))) => Some(v),
        Ok(Some(other)) => other.into_u32().ok().map(f64::from),
        _ => None,
    }
}

/// Reads only the header of the first frame.
pub fn read_header<P: AsRef<Path>>(path: P, name: &str) -> IoResult<StackInfo> {
    let path = path.as_ref();
    trace!(path = %path.display(), "stack::read_header");
    let mut decoder = open_decoder(path)?;
    read_info(&mut decoder, name)
}

/// Decodes the first frame of a stack.
///
/// # Errors
///
/// [`IoError::Decode`] if the file is missing or corrupt,
/// [`IoError::UnsupportedColorType`] if it is not 8/16-bit grayscale.
pub fn read<P: AsRef<Path>>(path: P, name: &str) -> IoResult<DecodedStack> {
    let path = path.as_ref();
    trace!(path = %path.display(), "stack::read");
    let mut decoder = open_decoder(path)?;
    let info = read_info(&mut decoder, name)?;

    let samples = match decoder.read_image().map_err(decode_err)? {
        DecodingResult::U8(buf) => Samples::U8(buf),
        DecodingResult::U16(buf) => Samples::U16(buf),
        _ => {
            return Err(IoError::UnsupportedColorType(format!(
                "{}-bit samples",
                info.bits_per_sample
            )));
        }
    };
    let buffer = IntensityBuffer::new(info.width, info.height, samples)?;

    debug!(
        stack = %info.name,
        width = info.width,
        height = info.height,
        bits = info.bits_per_sample,
        "decoded stack"
    );
    Ok(DecodedStack { info, buffer })
}

fn write_gray<C>(path: &Path, width: u32, height: u32, data: &[C::Inner], dpi: u32) -> IoResult<()>
where
    C: EncoderColorType,
    [C::Inner]: TiffValue,
{
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file).map_err(encode_err)?;
    let mut image = encoder.new_image::<C>(width, height).map_err(encode_err)?;
    image.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    image.write_data(data).map_err(encode_err)?;
    Ok(())
}

/// Writes a single-frame 8-bit grayscale TIFF.
pub fn write_gray8<P: AsRef<Path>>(path: P, width: u32, height: u32, data: &[u8], dpi: u32) -> IoResult<()> {
    write_gray::<colortype::Gray8>(path.as_ref(), width, height, data, dpi)
}

/// Writes a single-frame 16-bit grayscale TIFF.
pub fn write_gray16<P: AsRef<Path>>(path: P, width: u32, height: u32, data: &[u16], dpi: u32) -> IoResult<()> {
    write_gray::<colortype::Gray16>(path.as_ref(), width, height, data, dpi)
}
