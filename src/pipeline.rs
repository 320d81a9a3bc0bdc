use std::fmt;

use crate::assets::join::load_both;
use crate::assets::source::RasterSource;
use crate::encode::png::{ImageEncoder, PngEncoder};
use crate::encode::resource::{ResourceHandle, ResourceRegistry};
use crate::foundation::error::ComposeResult;
use crate::render::compose::compose_preview;
use crate::render::opts::ComposeOpts;

/// Where a single `create_combined_image` call is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeStage {
    Idle,
    LoadingBoth,
    LoadFailed,
    BothLoaded,
    Compositing,
    Encoding,
    Ready,
    EncodeFailed,
}

impl ComposeStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::LoadFailed | Self::Ready | Self::EncodeFailed)
    }
}

impl fmt::Display for ComposeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::LoadingBoth => "loading_both",
            Self::LoadFailed => "load_failed",
            Self::BothLoaded => "both_loaded",
            Self::Compositing => "compositing",
            Self::Encoding => "encoding",
            Self::Ready => "ready",
            Self::EncodeFailed => "encode_failed",
        };
        f.write_str(s)
    }
}

/// Produces swatch previews and owns the registry their handles point into.
///
/// Nothing is shared between calls except the registry, so one composer can serve any number
/// of interleaved `create_combined_image` futures.
pub struct Composer<S, E = PngEncoder> {
    source: S,
    encoder: E,
    opts: ComposeOpts,
    registry: ResourceRegistry,
}

impl<S: RasterSource> Composer<S, PngEncoder> {
    pub fn new(source: S, opts: ComposeOpts) -> ComposeResult<Self> {
        let encoder = PngEncoder::new(opts.encode_quality);
        Self::with_encoder(source, encoder, opts)
    }
}

impl<S: RasterSource, E: ImageEncoder> Composer<S, E> {
    pub fn with_encoder(source: S, encoder: E, opts: ComposeOpts) -> ComposeResult<Self> {
        opts.validate()?;
        Ok(Self {
            source,
            encoder,
            opts,
            registry: ResourceRegistry::new(),
        })
    }

    pub fn opts(&self) -> &ComposeOpts {
        &self.opts
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Load both swatches, composite them and publish the encoded preview.
    ///
    /// Composition starts only once both loads have succeeded; a failed load settles the call
    /// without compositing or encoding anything.
    #[tracing::instrument(skip(self))]
    pub async fn create_combined_image(
        &self,
        material_ref: &str,
        hardware_ref: &str,
    ) -> ComposeResult<ResourceHandle> {
        let mut stage = StageLog::default();

        stage.enter(ComposeStage::LoadingBoth);
        let pair = match load_both(&self.source, material_ref, hardware_ref).await {
            Ok(pair) => pair,
            Err(err) => {
                stage.enter(ComposeStage::LoadFailed);
                return Err(err);
            }
        };
        stage.enter(ComposeStage::BothLoaded);

        stage.enter(ComposeStage::Compositing);
        let surface = compose_preview(&pair.material.pixels, &pair.hardware.pixels, &self.opts)?;
        drop(pair);

        stage.enter(ComposeStage::Encoding);
        let encoded = match self.encoder.encode(surface.pixels()).await {
            Ok(encoded) => encoded,
            Err(err) => {
                stage.enter(ComposeStage::EncodeFailed);
                tracing::warn!(error = %err, "preview encode failed");
                return Err(err);
            }
        };

        let handle = self.registry.publish(encoded);
        stage.enter(ComposeStage::Ready);
        Ok(handle)
    }

    /// Give a handle back. `None`, empty, static and already released references are no-ops.
    pub fn release_resource(&self, handle: Option<&str>) {
        if let Some(reference) = handle {
            self.registry.release(reference);
        }
    }
}

#[derive(Debug)]
struct StageLog {
    current: ComposeStage,
}

impl Default for StageLog {
    fn default() -> Self {
        Self {
            current: ComposeStage::Idle,
        }
    }
}

impl StageLog {
    fn enter(&mut self, next: ComposeStage) {
        tracing::debug!(from = %self.current, to = %next, "compose stage");
        self.current = next;
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
