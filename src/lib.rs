//! swatch-composer builds a single preview image out of a fabric swatch and a closure swatch.
//!
//! # Pipeline overview
//!
//! 1. **Load**: both source images are requested together through a [`RasterSource`] and joined;
//!    the first failure settles the call with a [`ComposeError::Load`] naming the failed role.
//! 2. **Clean**: each image is resampled to its target size, its background is removed with a
//!    [`BackgroundStrategy`], and the cut is feathered with [`smooth_edges`].
//! 3. **Composite**: gradient backdrop, full-bleed fabric, shadowed closure band, dashed seams and
//!    a border on a fixed 400×300 [`Surface`].
//! 4. **Export**: the surface is PNG-encoded through an [`ImageEncoder`] and published in a
//!    [`ResourceRegistry`]; the caller gets a [`ResourceHandle`] and releases it when done.
//!
//! Everything runs on the caller's executor. No threads are spawned.
#![forbid(unsafe_code)]

mod assets;
mod effects;
mod foundation;
mod raster;
mod render;

/// Catalog files describing which swatches go together.
pub mod catalog;
/// Encoding and resource handles.
pub mod encode;
/// The top-level `create_combined_image` entry point.
pub mod pipeline;

pub use assets::join::{SwatchPair, load_both};
pub use assets::source::{FsSource, MemorySource, RasterImage, RasterSource, normalize_reference};
pub use catalog::{Catalog, CatalogEntry, PreviewRequest, slugify};
pub use effects::background::{
    BackgroundStrategy, COMPOSITE_NEAR_WHITE_TOLERANCE, DEFAULT_CHROMA_KEY_TOLERANCE,
    DEFAULT_NEAR_WHITE_TOLERANCE, corner_average, remove_background, remove_corner_key,
    remove_near_white,
};
pub use effects::blur::blur_rgba8_premul;
pub use effects::composite::{over, over_straight, premultiply, unpremultiply};
pub use effects::smooth::{EDGE_ALPHA_FACTOR, EDGE_NEIGHBOR_THRESHOLD, smooth_edges};
pub use encode::png::{DEFAULT_ENCODE_QUALITY, EncodedImage, ImageEncoder, PngEncoder};
pub use encode::resource::{MANAGED_SCHEME, ResourceHandle, ResourceRegistry, is_managed};
pub use foundation::core::{Rgb8, Rgba8, SwatchRole};
pub use foundation::error::{ComposeError, ComposeResult};
pub use pipeline::{ComposeStage, Composer};
pub use raster::buffer::PixelBuffer;
pub use raster::gradient::{ColorStop, LinearGradient};
pub use raster::surface::{DropShadow, MAX_SHADOW_BLUR, StrokeStyle, Surface};
pub use render::compose::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CLOSURE_SECTION_HEIGHT, FABRIC_SECTION_HEIGHT, SEAM_INSET,
    SEAM_ROWS, backdrop_gradient, border_style, clean_layer, compose_preview, seam_style,
};
pub use render::opts::{
    ComposeOpts, ENV_ENCODE_QUALITY, ENV_HARDWARE_TOLERANCE, ENV_MATERIAL_TOLERANCE,
};
