//! Grayscale resampling for previews and downsampled stacks.

use rayon::prelude::*;
use scan_core::Samples;

/// Output height that keeps the aspect ratio at `new_width`.
#[inline]
pub fn height_for_width(width: u32, height: u32, new_width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    ((height as f64 * new_width as f64 / width as f64).round() as u32).max(1)
}

/// Samples mapped to 8 bit (16-bit values keep their high byte).
pub fn to_u8(samples: &Samples) -> Vec<u8> {
    match samples {
        Samples::U8(v) => v.clone(),
        Samples::U16(v) => v.iter().map(|&s| (s >> 8) as u8).collect(),
    }
}

/// Bilinear resize of an 8-bit single-channel image.
///
/// Pixel centers are aligned (`(x + 0.5) * scale - 0.5`), edges clamp.
/// Rows are computed in parallel.
pub fn resize_gray(src: &[u8], width: u32, height: u32, new_width: u32, new_height: u32) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let (nw, nh) = (new_width as usize, new_height as usize);
    if w == 0 || h == 0 || nw == 0 || nh == 0 {
        return vec![0; nw * nh];
    }
    if w == nw && h == nh {
        return src.to_vec();
    }

    let sx = w as f32 / nw as f32;
    let sy = h as f32 / nh as f32;
    let mut out = vec![0u8; nw * nh];

    out.par_chunks_mut(nw).enumerate().for_each(|(y, row)| {
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, (h - 1) as f32);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(h - 1);
        let ty = fy - y0 as f32;

        for (x, px) in row.iter_mut().enumerate() {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, (w - 1) as f32);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(w - 1);
            let tx = fx - x0 as f32;

            let top = src[y0 * w + x0] as f32 * (1.0 - tx) + src[y0 * w + x1] as f32 * tx;
            let bottom = src[y1 * w + x0] as f32 * (1.0 - tx) + src[y1 * w + x1] as f32 * tx;
            *px = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
        }
    });

    out
}
