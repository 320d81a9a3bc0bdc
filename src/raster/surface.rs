use kurbo::{Line, Point, Rect};

use crate::effects::blur::{blur_rgba8_premul, radius_for_sigma};
use crate::effects::composite::{
    blit_over, over_straight, premultiply_in_place, unpremultiply_in_place,
};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::raster::buffer::PixelBuffer;
use crate::raster::gradient::LinearGradient;

/// Largest accepted [`DropShadow::blur`].
pub const MAX_SHADOW_BLUR: f32 = 100.0;

/// Soft shadow cast by every image drawn while it is set on a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DropShadow {
    pub color: Rgba8,
    /// Blur extent in pixels; the gaussian uses `sigma = blur / 2`.
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for DropShadow {
    fn default() -> Self {
        Self {
            color: Rgba8::from_rgb_opacity(0, 0, 0, 0.15),
            blur: 5.0,
            offset_x: 0.0,
            offset_y: 3.0,
        }
    }
}

/// Pen used by [`Surface::stroke_path`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba8,
    pub width: u32,
    /// Alternating on/off run lengths in pixels. Empty means solid.
    #[serde(default)]
    pub dash: Vec<u32>,
}

impl StrokeStyle {
    pub fn solid(color: Rgba8) -> Self {
        Self {
            color,
            width: 1,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: Rgba8, on: u32, off: u32) -> Self {
        Self {
            color,
            width: 1,
            dash: vec![on, off],
        }
    }

    fn is_on(&self, distance: u32) -> bool {
        let period: u32 = self.dash.iter().sum();
        if period == 0 {
            return true;
        }
        let mut pos = distance % period;
        for (i, &run) in self.dash.iter().enumerate() {
            if pos < run {
                return i % 2 == 0;
            }
            pos -= run;
        }
        true
    }
}

/// Fixed-size drawing target.
///
/// Stores straight-alpha RGBA8 and blends source-over. Geometry is snapped to whole pixels:
/// image origins round to the nearest pixel and a 1px line at `y = 80` covers exactly row 80.
#[derive(Clone, Debug)]
pub struct Surface {
    pixels: PixelBuffer,
    shadow: Option<DropShadow>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> ComposeResult<Self> {
        Ok(Self::from_buffer(PixelBuffer::new(width, height)?))
    }

    pub fn from_buffer(pixels: PixelBuffer) -> Self {
        Self {
            pixels,
            shadow: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.pixels
    }

    /// Snapshot of the current pixels.
    pub fn read_pixels(&self) -> PixelBuffer {
        self.pixels.clone()
    }

    /// Replace the surface contents without blending. Dimensions must match.
    pub fn write_pixels(&mut self, pixels: PixelBuffer) -> ComposeResult<()> {
        if pixels.width() != self.width() || pixels.height() != self.height() {
            return Err(ComposeError::validation(format!(
                "write_pixels expects {}x{}, got {}x{}",
                self.width(),
                self.height(),
                pixels.width(),
                pixels.height()
            )));
        }
        self.pixels = pixels;
        Ok(())
    }

    pub fn shadow(&self) -> Option<DropShadow> {
        self.shadow
    }

    pub fn set_shadow(&mut self, shadow: DropShadow) {
        self.shadow = Some(shadow);
    }

    pub fn clear_shadow(&mut self) {
        self.shadow = None;
    }

    /// Fill the whole surface with `gradient`, top to bottom.
    pub fn fill_gradient(&mut self, gradient: &LinearGradient) {
        let (w, h) = (self.width(), self.height());
        for y in 0..h {
            let c = gradient.color_for_row(y, h).to_array();
            for x in 0..w {
                let i = self.pixels.index(x, y);
                let d = &mut self.pixels.data_mut()[i..i + 4];
                let out = over_straight([d[0], d[1], d[2], d[3]], c);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Draw `image` at its natural size with its top-left corner at `at`.
    pub fn draw_image(&mut self, image: &PixelBuffer, at: Point) -> ComposeResult<()> {
        let x = at.x.round() as i64;
        let y = at.y.round() as i64;
        if let Some(shadow) = self.shadow {
            self.draw_shadow(image, x, y, shadow)?;
        }
        blit_over(&mut self.pixels, image, x, y);
        Ok(())
    }

    /// Draw `image` stretched to fill `dst`, ignoring aspect ratio.
    pub fn draw_image_scaled(&mut self, image: &PixelBuffer, dst: Rect) -> ComposeResult<()> {
        let w = dst.width().round();
        let h = dst.height().round();
        if w <= 0.0 || h <= 0.0 {
            return Ok(());
        }
        let scaled = image.resized(w as u32, h as u32)?;
        self.draw_image(&scaled, dst.origin())
    }

    fn draw_shadow(
        &mut self,
        image: &PixelBuffer,
        x: i64,
        y: i64,
        shadow: DropShadow,
    ) -> ComposeResult<()> {
        if shadow.color.a == 0 || image.is_empty() {
            return Ok(());
        }
        if !(0.0..=MAX_SHADOW_BLUR).contains(&shadow.blur) {
            return Err(ComposeError::validation(format!(
                "shadow blur must be within [0, {MAX_SHADOW_BLUR}]"
            )));
        }
        let sigma = shadow.blur / 2.0;
        let pad = radius_for_sigma(sigma);
        let padded = |side: u32| {
            pad.checked_mul(2)
                .and_then(|p| side.checked_add(p))
                .ok_or_else(|| ComposeError::validation("shadow layer size overflow"))
        };
        let w = padded(image.width())?;
        let h = padded(image.height())?;

        let mut layer = PixelBuffer::new(w, h)?;
        for sy in 0..image.height() {
            for sx in 0..image.width() {
                let a = image.alpha(sx, sy);
                if a == 0 {
                    continue;
                }
                let sa = (u32::from(a) * u32::from(shadow.color.a) + 127) / 255;
                layer.set_pixel(
                    sx + pad,
                    sy + pad,
                    Rgba8::new(shadow.color.r, shadow.color.g, shadow.color.b, sa as u8),
                );
            }
        }

        let mut data = layer.into_raw();
        premultiply_in_place(&mut data)?;
        let mut blurred = blur_rgba8_premul(&data, w, h, sigma)?;
        unpremultiply_in_place(&mut blurred)?;
        let layer = PixelBuffer::from_raw(w, h, blurred)?;

        let ox = x + shadow.offset_x.round() as i64 - i64::from(pad);
        let oy = y + shadow.offset_y.round() as i64 - i64::from(pad);
        blit_over(&mut self.pixels, &layer, ox, oy);
        Ok(())
    }

    /// Stroke a sequence of segments with one pen. The dash pattern runs continuously across
    /// segment joins. Each segment covers its start pixel and stops one pixel short of its end.
    pub fn stroke_path(&mut self, segments: &[Line], style: &StrokeStyle) {
        if style.color.a == 0 || style.width == 0 {
            return;
        }
        let mut distance = 0u32;
        for seg in segments {
            let (x0, y0) = (seg.p0.x.round() as i64, seg.p0.y.round() as i64);
            let (x1, y1) = (seg.p1.x.round() as i64, seg.p1.y.round() as i64);
            let steps = (x1 - x0).abs().max((y1 - y0).abs());
            for i in 0..steps {
                if style.is_on(distance) {
                    let px = x0 + (x1 - x0) * i / steps;
                    let py = y0 + (y1 - y0) * i / steps;
                    self.stamp(px, py, style);
                }
                distance += 1;
            }
        }
    }

    /// Stroke the innermost ring of pixels of `rect`, touching each pixel once.
    pub fn stroke_rect(&mut self, rect: Rect, style: &StrokeStyle) {
        let x0 = rect.x0.round();
        let y0 = rect.y0.round();
        let x1 = rect.x1.round() - 1.0;
        let y1 = rect.y1.round() - 1.0;
        if x1 < x0 || y1 < y0 {
            return;
        }
        // One pixel tall or wide: the ring collapses to a single run.
        if y1 == y0 {
            self.stroke_path(&[Line::new((x0, y0), (x1 + 1.0, y0))], style);
            return;
        }
        if x1 == x0 {
            self.stroke_path(&[Line::new((x0, y0), (x0, y1 + 1.0))], style);
            return;
        }
        let segments = [
            Line::new((x0, y0), (x1, y0)),
            Line::new((x1, y0), (x1, y1)),
            Line::new((x1, y1), (x0, y1)),
            Line::new((x0, y1), (x0, y0)),
        ];
        self.stroke_path(&segments, style);
    }

    fn stamp(&mut self, cx: i64, cy: i64, style: &StrokeStyle) {
        let half = i64::from(style.width - 1) / 2;
        let c = style.color.to_array();
        for y in cy - half..cy - half + i64::from(style.width) {
            for x in cx - half..cx - half + i64::from(style.width) {
                if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
                    continue;
                }
                let i = self.pixels.index(x as u32, y as u32);
                let d = &mut self.pixels.data_mut()[i..i + 4];
                let out = over_straight([d[0], d[1], d[2], d[3]], c);
                d.copy_from_slice(&out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
