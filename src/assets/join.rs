use crate::assets::source::{RasterImage, RasterSource};
use crate::foundation::core::SwatchRole;
use crate::foundation::error::{ComposeError, ComposeResult};

/// Both decoded swatches, ready to composite.
#[derive(Clone, Debug)]
pub struct SwatchPair {
    pub material: RasterImage,
    pub hardware: RasterImage,
}

/// Start both loads together and wait for both.
///
/// The first failure to surface wins and the other load is dropped unfinished. When both fail
/// on the same poll the material failure is reported.
pub async fn load_both<S: RasterSource>(
    source: &S,
    material_ref: &str,
    hardware_ref: &str,
) -> ComposeResult<SwatchPair> {
    let material = load_role(source, SwatchRole::Material, material_ref);
    let hardware = load_role(source, SwatchRole::Hardware, hardware_ref);
    let (material, hardware) = futures::future::try_join(material, hardware).await?;
    Ok(SwatchPair { material, hardware })
}

async fn load_role<S: RasterSource>(
    source: &S,
    role: SwatchRole,
    reference: &str,
) -> ComposeResult<RasterImage> {
    source.load(reference).await.map_err(|err| {
        tracing::warn!(%role, reference, error = %format!("{err:#}"), "swatch load failed");
        ComposeError::load(role, err)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/join.rs"]
mod tests;
