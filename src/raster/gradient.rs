use crate::foundation::core::Rgba8;
use crate::foundation::error::{ComposeError, ComposeResult};

/// One stop of a [`LinearGradient`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Position along the gradient axis in `[0, 1]`.
    pub offset: f32,
    pub color: Rgba8,
}

/// Top-to-bottom linear gradient spanning the full height of whatever it fills.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearGradient {
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Stops must be non-empty, finite, inside `[0, 1]` and non-decreasing.
    pub fn vertical(stops: Vec<ColorStop>) -> ComposeResult<Self> {
        if stops.is_empty() {
            return Err(ComposeError::validation("gradient needs at least one stop"));
        }
        let mut prev = 0.0f32;
        for s in &stops {
            if !s.offset.is_finite() || !(0.0..=1.0).contains(&s.offset) {
                return Err(ComposeError::validation(
                    "gradient stop offsets must be in [0, 1]",
                ));
            }
            if s.offset < prev {
                return Err(ComposeError::validation(
                    "gradient stop offsets must be non-decreasing",
                ));
            }
            prev = s.offset;
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at position `t` along the axis. Outside the first/last stop the end color holds.
    pub fn color_at(&self, t: f32) -> Rgba8 {
        let first = self.stops[0];
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return lerp_color(a.color, b.color, (t - a.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Color for pixel row `y` of a surface `height` pixels tall, sampled at the pixel center.
    pub fn color_for_row(&self, y: u32, height: u32) -> Rgba8 {
        if height == 0 {
            return self.color_at(0.0);
        }
        self.color_at((y as f32 + 0.5) / height as f32)
    }
}

fn lerp_color(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    let lerp = |a: u8, b: u8| -> u8 {
        let af = a as f32;
        let bf = b as f32;
        (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba8::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/gradient.rs"]
mod tests;
