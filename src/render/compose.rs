//! The two-layer swatch preview.
//!
//! Layout, top to bottom, on a fixed 400×300 canvas:
//!
//! - rows `0..80`: material band
//! - rows `80..220`: hardware band (the closure, with a soft shadow)
//! - rows `220..300`: material band
//!
//! The material is stretched over the whole canvas rather than only its bands, so the hardware
//! reads as mounted on one continuous piece of fabric.

use kurbo::{Line, Point, Rect};

use crate::effects::background::{BackgroundStrategy, remove_background};
use crate::effects::smooth::smooth_edges;
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::ComposeResult;
use crate::raster::buffer::PixelBuffer;
use crate::raster::gradient::{ColorStop, LinearGradient};
use crate::raster::surface::{StrokeStyle, Surface};
use crate::render::opts::ComposeOpts;

pub const CANVAS_WIDTH: u32 = 400;
pub const CANVAS_HEIGHT: u32 = 300;
/// Height of each material band above and below the hardware.
pub const FABRIC_SECTION_HEIGHT: u32 = 80;
/// Height of the hardware band.
pub const CLOSURE_SECTION_HEIGHT: u32 = CANVAS_HEIGHT - 2 * FABRIC_SECTION_HEIGHT;
/// Horizontal inset of the seam lines from each side.
pub const SEAM_INSET: u32 = 10;

/// Rows the two seams are drawn on.
pub const SEAM_ROWS: [u32; 2] = [
    FABRIC_SECTION_HEIGHT,
    FABRIC_SECTION_HEIGHT + CLOSURE_SECTION_HEIGHT,
];

const BACKDROP_STOPS: [(f32, Rgb8); 3] = [
    (0.0, Rgb8::new(0xf8, 0xfa, 0xfc)),
    (0.5, Rgb8::new(0xf1, 0xf5, 0xf9)),
    (1.0, Rgb8::new(0xe2, 0xe8, 0xf0)),
];

/// Light-gray backdrop behind both swatches.
pub fn backdrop_gradient() -> ComposeResult<LinearGradient> {
    let stops = BACKDROP_STOPS
        .iter()
        .map(|&(offset, rgb)| ColorStop {
            offset,
            color: rgb.with_alpha(255),
        })
        .collect();
    LinearGradient::vertical(stops)
}

pub fn seam_style() -> StrokeStyle {
    StrokeStyle::dashed(Rgba8::from_rgb_opacity(100, 116, 139, 0.3), 5, 3)
}

pub fn border_style() -> StrokeStyle {
    StrokeStyle::solid(Rgba8::from_rgb_opacity(148, 163, 184, 0.4))
}

/// Resample `src` to `width`×`height`, strip its background and feather the cut.
pub fn clean_layer(
    src: &PixelBuffer,
    width: u32,
    height: u32,
    strategy: BackgroundStrategy,
    smooth: bool,
) -> ComposeResult<PixelBuffer> {
    let mut scratch = Surface::new(width, height)?;
    scratch.draw_image_scaled(src, Rect::new(0.0, 0.0, f64::from(width), f64::from(height)))?;

    let mut pixels = scratch.read_pixels();
    let cleared = remove_background(&mut pixels, strategy);
    let feathered = if smooth { smooth_edges(&mut pixels) } else { 0 };
    tracing::trace!(width, height, cleared, feathered, "cleaned layer");

    scratch.write_pixels(pixels)?;
    Ok(scratch.into_buffer())
}

/// Build the full preview surface from the two decoded swatches.
pub fn compose_preview(
    material: &PixelBuffer,
    hardware: &PixelBuffer,
    opts: &ComposeOpts,
) -> ComposeResult<Surface> {
    let mut canvas = Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
    canvas.fill_gradient(&backdrop_gradient()?);

    let fabric = clean_layer(
        material,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        opts.material_background,
        opts.smooth_edges,
    )?;
    canvas.draw_image(&fabric, Point::ZERO)?;

    let closure = clean_layer(
        hardware,
        CANVAS_WIDTH,
        CLOSURE_SECTION_HEIGHT,
        opts.hardware_background,
        opts.smooth_edges,
    )?;
    canvas.set_shadow(opts.shadow);
    canvas.draw_image(&closure, Point::new(0.0, f64::from(FABRIC_SECTION_HEIGHT)))?;
    canvas.clear_shadow();

    let seam = seam_style();
    for y in SEAM_ROWS {
        let y = f64::from(y);
        canvas.stroke_path(
            &[Line::new(
                (f64::from(SEAM_INSET), y),
                (f64::from(CANVAS_WIDTH - SEAM_INSET), y),
            )],
            &seam,
        );
    }

    canvas.stroke_rect(
        Rect::new(0.0, 0.0, f64::from(CANVAS_WIDTH), f64::from(CANVAS_HEIGHT)),
        &border_style(),
    );
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
