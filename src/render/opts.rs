use std::path::Path;

use anyhow::Context as _;

use crate::effects::background::{BackgroundStrategy, COMPOSITE_NEAR_WHITE_TOLERANCE};
use crate::encode::png::DEFAULT_ENCODE_QUALITY;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::raster::surface::{DropShadow, MAX_SHADOW_BLUR};

/// Environment override for the material swatch's background tolerance.
pub const ENV_MATERIAL_TOLERANCE: &str = "SWATCH_COMPOSER_MATERIAL_TOLERANCE";
/// Environment override for the hardware swatch's background tolerance.
pub const ENV_HARDWARE_TOLERANCE: &str = "SWATCH_COMPOSER_HARDWARE_TOLERANCE";
/// Environment override for the PNG encode quality.
pub const ENV_ENCODE_QUALITY: &str = "SWATCH_COMPOSER_ENCODE_QUALITY";

/// Tunables for one composition. Every field has a default, so partial JSON is fine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeOpts {
    /// Background removal applied to the stretched material layer.
    pub material_background: BackgroundStrategy,
    /// Background removal applied to the resized hardware layer.
    pub hardware_background: BackgroundStrategy,
    /// Run the edge feathering pass after background removal.
    pub smooth_edges: bool,
    /// Shadow cast by the hardware layer.
    pub shadow: DropShadow,
    /// Encode quality in `[0, 1]`.
    pub encode_quality: f32,
}

impl Default for ComposeOpts {
    fn default() -> Self {
        let near_white = BackgroundStrategy::NearWhite {
            tolerance: COMPOSITE_NEAR_WHITE_TOLERANCE,
        };
        Self {
            material_background: near_white,
            hardware_background: near_white,
            smooth_edges: true,
            shadow: DropShadow::default(),
            encode_quality: DEFAULT_ENCODE_QUALITY,
        }
    }
}

impl ComposeOpts {
    pub fn from_json_str(json: &str) -> ComposeResult<Self> {
        let opts: Self = serde_json::from_str(json).context("parse compose options json")?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: &Path) -> ComposeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read compose options '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Apply `SWATCH_COMPOSER_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Values that do not parse, or that would make the options
    /// invalid, are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| -> Option<f32> {
            lookup(key)
                .and_then(|v| v.trim().parse::<f32>().ok())
                .filter(|v| v.is_finite())
        };
        if let Some(t) = parse(ENV_MATERIAL_TOLERANCE).filter(|t| *t >= 0.0) {
            self.material_background = self.material_background.with_tolerance(t);
        }
        if let Some(t) = parse(ENV_HARDWARE_TOLERANCE).filter(|t| *t >= 0.0) {
            self.hardware_background = self.hardware_background.with_tolerance(t);
        }
        if let Some(q) = parse(ENV_ENCODE_QUALITY).filter(|q| (0.0..=1.0).contains(q)) {
            self.encode_quality = q;
        }
        self
    }

    pub fn validate(&self) -> ComposeResult<()> {
        for (name, strategy) in [
            ("material_background", self.material_background),
            ("hardware_background", self.hardware_background),
        ] {
            if let BackgroundStrategy::CornerChromaKey { tolerance } = strategy
                && (!tolerance.is_finite() || tolerance < 0.0)
            {
                return Err(ComposeError::validation(format!(
                    "{name} tolerance must be finite and >= 0"
                )));
            }
        }
        if !self.encode_quality.is_finite() || !(0.0..=1.0).contains(&self.encode_quality) {
            return Err(ComposeError::validation("encode_quality must be within [0, 1]"));
        }
        let s = &self.shadow;
        if !(0.0..=MAX_SHADOW_BLUR).contains(&s.blur) {
            return Err(ComposeError::validation(format!(
                "shadow blur must be within [0, {MAX_SHADOW_BLUR}]"
            )));
        }
        if !s.offset_x.is_finite() || !s.offset_y.is_finite() {
            return Err(ComposeError::validation("shadow offsets must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/opts.rs"]
mod tests;
