use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::rgba_len;

/// Dense, row-major, straight-alpha RGBA8 pixels.
///
/// `data.len() == width * height * 4` holds for every value of this type; the constructors are
/// the only way in and they check it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> ComposeResult<Self> {
        let len = rgba_len(width, height)
            .ok_or_else(|| ComposeError::validation("pixel buffer size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> ComposeResult<Self> {
        let mut buf = Self::new(width, height)?;
        for px in buf.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
        Ok(buf)
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ComposeResult<Self> {
        let expected = rgba_len(width, height)
            .ok_or_else(|| ComposeError::validation("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(ComposeError::validation(format!(
                "pixel buffer expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Decode any format the `image` crate recognizes into straight RGBA8.
    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        Ok(Self::from_image(dyn_img.to_rgba8()))
    }

    pub fn to_image(&self) -> ComposeResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ComposeError::validation("pixel buffer does not match its dimensions"))
    }

    /// Resample to exactly `width`×`height`, ignoring aspect ratio.
    pub fn resized(&self, width: u32, height: u32) -> ComposeResult<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Self::new(width, height);
        }
        let img = self.to_image()?;
        let out = image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
        Ok(Self::from_image(out))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Pixel at `(x, y)`; `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_array());
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data[self.index(x, y) + 3]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
