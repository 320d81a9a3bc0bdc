use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ComposeError, ComposeResult};
use crate::raster::buffer::PixelBuffer;

/// A decoded source image together with the reference it was loaded from.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub reference: String,
    pub pixels: PixelBuffer,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Anything that can turn an image reference into pixels.
///
/// Loads are futures so a caller can keep several in flight at once; implementations decide
/// whether they actually suspend.
pub trait RasterSource {
    fn load(&self, reference: &str) -> impl Future<Output = anyhow::Result<RasterImage>>;
}

impl<S: RasterSource> RasterSource for &S {
    fn load(&self, reference: &str) -> impl Future<Output = anyhow::Result<RasterImage>> {
        (**self).load(reference)
    }
}

/// Normalize a site-style image reference (`/telas/denim.jpg`) into a relative path.
///
/// A single leading `/` anchors at the source root. Backslashes become `/`, `.` segments are
/// dropped, and `..` or empty references are rejected.
pub fn normalize_reference(reference: &str) -> ComposeResult<String> {
    let s = reference.trim().replace('\\', "/");
    let s = s.strip_prefix('/').unwrap_or(&s);
    if s.is_empty() {
        return Err(ComposeError::validation("image reference must be non-empty"));
    }
    if s.contains("://") {
        return Err(ComposeError::validation(format!(
            "unsupported image reference scheme in '{reference}'"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ComposeError::validation(
                "image references must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ComposeError::validation(
            "image reference must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Loads references as files below a root directory (a site's public folder, for example).
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, reference: &str) -> ComposeResult<PathBuf> {
        let rel = normalize_reference(reference)?;
        Ok(self.root.join(Path::new(&rel)))
    }

    fn load_now(&self, reference: &str) -> anyhow::Result<RasterImage> {
        let path = self.resolve(reference)?;
        let bytes =
            std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?;
        let pixels = PixelBuffer::decode(&bytes)
            .with_context(|| format!("decode '{}'", path.display()))?;
        tracing::trace!(
            reference,
            width = pixels.width(),
            height = pixels.height(),
            "loaded image from disk"
        );
        Ok(RasterImage {
            reference: reference.to_string(),
            pixels,
        })
    }
}

/// The read and decode happen when the future is first polled and block the polling thread
/// until done; nothing touches the disk before that.
impl RasterSource for FsSource {
    fn load(&self, reference: &str) -> impl Future<Output = anyhow::Result<RasterImage>> {
        let reference = reference.to_string();
        async move { self.load_now(&reference) }
    }
}

/// References resolved against encoded images held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    images: HashMap<String, Arc<Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes under `reference`, replacing any previous entry.
    pub fn insert(&mut self, reference: impl Into<String>, encoded: Vec<u8>) {
        self.images.insert(reference.into(), Arc::new(encoded));
    }

    pub fn with(mut self, reference: impl Into<String>, encoded: Vec<u8>) -> Self {
        self.insert(reference, encoded);
        self
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.images.contains_key(reference)
    }
}

impl RasterSource for MemorySource {
    fn load(&self, reference: &str) -> impl Future<Output = anyhow::Result<RasterImage>> {
        let entry = self.images.get(reference).cloned();
        let reference = reference.to_string();
        async move {
            let bytes = entry.with_context(|| format!("no image registered as '{reference}'"))?;
            let pixels =
                PixelBuffer::decode(&bytes).with_context(|| format!("decode '{reference}'"))?;
            Ok(RasterImage { reference, pixels })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
