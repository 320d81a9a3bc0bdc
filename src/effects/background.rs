//! Pixel-level background removal for swatch photography.
//!
//! Both strategies only ever write alpha, and only ever write `0`: a pixel is either classified
//! as background and cleared, or left exactly as it was.

use crate::foundation::core::Rgb8;
use crate::foundation::math::rgb_distance;
use crate::raster::buffer::PixelBuffer;

/// Chroma-key tolerance used when a caller asks for corner keying without a value.
pub const DEFAULT_CHROMA_KEY_TOLERANCE: f32 = 35.0;
/// Near-white tolerance used when a caller asks for white removal without a value.
pub const DEFAULT_NEAR_WHITE_TOLERANCE: u8 = 40;
/// Near-white tolerance the compositor applies to both swatches.
pub const COMPOSITE_NEAR_WHITE_TOLERANCE: u8 = 45;

/// How to decide which pixels are background.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundStrategy {
    /// Average the four corner pixels into a key color; clear every pixel whose RGB distance to
    /// it is strictly below `tolerance`.
    CornerChromaKey {
        /// Euclidean RGB distance.
        tolerance: f32,
    },
    /// Clear every pixel whose R, G and B all exceed `255 - tolerance`.
    NearWhite {
        /// Per-channel distance from pure white.
        tolerance: u8,
    },
}

impl BackgroundStrategy {
    pub fn corner_chroma_key() -> Self {
        Self::CornerChromaKey {
            tolerance: DEFAULT_CHROMA_KEY_TOLERANCE,
        }
    }

    pub fn near_white() -> Self {
        Self::NearWhite {
            tolerance: DEFAULT_NEAR_WHITE_TOLERANCE,
        }
    }

    /// Same strategy, different tolerance. Chroma-key tolerances below zero clamp to zero.
    pub fn with_tolerance(self, tolerance: f32) -> Self {
        match self {
            Self::CornerChromaKey { .. } => Self::CornerChromaKey {
                tolerance: tolerance.max(0.0),
            },
            Self::NearWhite { .. } => Self::NearWhite {
                tolerance: tolerance.round().clamp(0.0, 255.0) as u8,
            },
        }
    }
}

/// Apply `strategy` in place. Returns the number of pixels cleared.
pub fn remove_background(buf: &mut PixelBuffer, strategy: BackgroundStrategy) -> usize {
    match strategy {
        BackgroundStrategy::CornerChromaKey { tolerance } => remove_corner_key(buf, tolerance),
        BackgroundStrategy::NearWhite { tolerance } => remove_near_white(buf, tolerance),
    }
}

pub fn remove_near_white(buf: &mut PixelBuffer, tolerance: u8) -> usize {
    let threshold = 255 - tolerance;
    let mut cleared = 0;
    for px in buf.data_mut().chunks_exact_mut(4) {
        if px[0] > threshold && px[1] > threshold && px[2] > threshold {
            px[3] = 0;
            cleared += 1;
        }
    }
    cleared
}

pub fn remove_corner_key(buf: &mut PixelBuffer, tolerance: f32) -> usize {
    let Some(key) = corner_average(buf) else {
        return 0;
    };
    let mut cleared = 0;
    for px in buf.data_mut().chunks_exact_mut(4) {
        if rgb_distance(Rgb8::new(px[0], px[1], px[2]), key) < tolerance {
            px[3] = 0;
            cleared += 1;
        }
    }
    cleared
}

/// Mean RGB of the four corner pixels, each channel rounded to nearest. `None` for empty buffers.
pub fn corner_average(buf: &PixelBuffer) -> Option<Rgb8> {
    if buf.is_empty() {
        return None;
    }
    let (w, h) = (buf.width(), buf.height());
    let corners = [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)];

    let mut sum = [0u32; 3];
    for (x, y) in corners {
        let px = buf.pixel(x, y)?;
        sum[0] += u32::from(px.r);
        sum[1] += u32::from(px.g);
        sum[2] += u32::from(px.b);
    }
    let avg = |s: u32| -> u8 { (s as f32 / 4.0).round() as u8 };
    Some(Rgb8::new(avg(sum[0]), avg(sum[1]), avg(sum[2])))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/background.rs"]
mod tests;
