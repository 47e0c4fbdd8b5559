//! Per-pixel intensity samples of a single frame.

use crate::error::{Error, Result};
use crate::stack::{PIXEL_WEIGHT_MAX_16, PIXEL_WEIGHT_MAX_8};

/// Sample storage, kept at the decoded bit depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    /// 8-bit samples.
    U8(Vec<u8>),
    /// 16-bit samples.
    U16(Vec<u16>),
}

impl Samples {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
        }
    }

    /// True if there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bits per sample.
    #[inline]
    pub const fn bits_per_sample(&self) -> u16 {
        match self {
            Self::U8(_) => 8,
            Self::U16(_) => 16,
        }
    }

    /// Largest representable sample value.
    #[inline]
    pub const fn max_value(&self) -> u32 {
        match self {
            Self::U8(_) => PIXEL_WEIGHT_MAX_8,
            Self::U16(_) => PIXEL_WEIGHT_MAX_16,
        }
    }

    /// Heap size of the sample data in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len() * 2,
        }
    }
}

/// Row-major intensity samples, indexed by `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityBuffer {
    width: u32,
    height: u32,
    samples: Samples,
}

impl IntensityBuffer {
    /// Wraps samples, checking the count against `width * height`.
    pub fn new(width: u32, height: u32, samples: Samples) -> Result<Self> {
        let expected = width as u64 * height as u64;
        let actual = samples.len() as u64;
        if expected != actual {
            return Err(Error::DimensionMismatch {
                width,
                height,
                expected,
                actual,
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// 8-bit buffer.
    pub fn from_u8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Samples::U8(data))
    }

    /// 16-bit buffer.
    pub fn from_u16(width: u32, height: u32, data: Vec<u16>) -> Result<Self> {
        Self::new(width, height, Samples::U16(data))
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a zero-area frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Bits per sample (8 or 16).
    #[inline]
    pub fn bits_per_sample(&self) -> u16 {
        self.samples.bits_per_sample()
    }

    /// Raw sample storage.
    #[inline]
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Sample at a flat offset, widened to `u16`.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<u16> {
        match &self.samples {
            Samples::U8(v) => v.get(offset).map(|&s| s as u16),
            Samples::U16(v) => v.get(offset).copied(),
        }
    }

    /// Consumes the buffer, returning its samples.
    pub fn into_samples(self) -> Samples {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = IntensityBuffer::from_u16(3, 2, vec![0; 5]).unwrap_err();
        assert!(err.to_string().contains("3x2"));
    }

    #[test]
    fn flat_indexing() {
        let buf = IntensityBuffer::from_u8(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        // (x=1, y=1)
        assert_eq!(buf.get(1 * 3 + 1), Some(4));
        assert_eq!(buf.get(6), None);
        assert_eq!(buf.bits_per_sample(), 8);
        assert_eq!(buf.samples().max_value(), 255);
    }

    #[test]
    fn sixteen_bit_size() {
        let buf = IntensityBuffer::from_u16(2, 2, vec![1000; 4]).unwrap();
        assert_eq!(buf.samples().size_bytes(), 8);
        assert_eq!(buf.get(3), Some(1000));
    }
}
