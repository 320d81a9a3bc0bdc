use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use image::ImageEncoder as _;

use crate::foundation::error::{ComposeError, ComposeResult};
use crate::raster::buffer::PixelBuffer;

/// Quality requested by the preview pipeline.
pub const DEFAULT_ENCODE_QUALITY: f32 = 0.95;

/// An encoded image payload and its media type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Final encode step of a composition.
pub trait ImageEncoder {
    fn encode(&self, pixels: &PixelBuffer) -> impl Future<Output = ComposeResult<EncodedImage>>;
}

/// PNG output. PNG is lossless, so `quality` only picks how hard the compressor works.
#[derive(Clone, Copy, Debug)]
pub struct PngEncoder {
    quality: f32,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_ENCODE_QUALITY,
        }
    }
}

impl PngEncoder {
    pub fn new(quality: f32) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    fn compression(&self) -> ComposeResult<image::codecs::png::CompressionType> {
        use image::codecs::png::CompressionType;
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(ComposeError::encode(format!(
                "quality must be within [0, 1], got {}",
                self.quality
            )));
        }
        Ok(if self.quality >= 0.9 {
            CompressionType::Best
        } else if self.quality >= 0.5 {
            CompressionType::Default
        } else {
            CompressionType::Fast
        })
    }

    /// Encode on the calling thread without yielding.
    pub fn encode_now(&self, pixels: &PixelBuffer) -> ComposeResult<EncodedImage> {
        let compression = self.compression()?;
        if pixels.is_empty() {
            return Err(ComposeError::encode("cannot encode an empty surface"));
        }
        let mut bytes = Vec::new();
        image::codecs::png::PngEncoder::new_with_quality(
            &mut bytes,
            compression,
            image::codecs::png::FilterType::Adaptive,
        )
        .write_image(
            pixels.data(),
            pixels.width(),
            pixels.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| ComposeError::encode(format!("png: {e}")))?;
        Ok(EncodedImage {
            mime: "image/png",
            bytes,
        })
    }
}

impl ImageEncoder for PngEncoder {
    fn encode(&self, pixels: &PixelBuffer) -> impl Future<Output = ComposeResult<EncodedImage>> {
        async move {
            YieldNow::default().await;
            self.encode_now(pixels)
        }
    }
}

/// Returns `Pending` once (after scheduling its own wake-up), then `Ready`.
#[derive(Debug, Default)]
pub(crate) struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
