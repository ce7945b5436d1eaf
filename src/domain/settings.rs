//! WindSettings - engine configuration
//!
//! Every option has a default, so hosts only send what they change:
//!
//! ```json
//! { "maxAge": 100, "palette": { "kind": "theme", "theme": "pm10" } }
//! ```

use serde::{Deserialize, Serialize};

use super::palette::{ColorScale, Rgba, Theme};

pub const DEFAULT_PARTICLE_MULTIPLIER: f32 = 7.0;
pub const DEFAULT_MAX_AGE: u32 = 150;
pub const DEFAULT_VELOCITY_SCALE: f32 = 0.0005;
pub const DEFAULT_FADE_OPACITY: f32 = 0.85;
pub const DEFAULT_BUCKET_COUNT: usize = 18;
pub const DEFAULT_MAX_SPEED: f32 = 17.0;
pub const DEFAULT_SEED_ATTEMPTS: u32 = 30;

/// Stroke palette choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaletteSpec {
    /// Dark to light gray
    Grayscale,
    /// Linear gradient through RGB stops
    Gradient { stops: Vec<[u8; 3]> },
    /// Pollutant overlay table
    Theme { theme: Theme },
}

impl Default for PaletteSpec {
    fn default() -> Self {
        PaletteSpec::Grayscale
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindSettings {
    /// Particles per horizontal pixel
    pub particle_multiplier: f32,
    /// Ticks a particle lives before it is reseeded
    pub max_age: u32,
    /// Pixel displacement per (m/s) per pixel of surface height
    pub velocity_scale: f32,
    pub fade_color: [u8; 3],
    /// Fraction of the previous frame kept each tick
    pub fade_opacity: f32,
    pub bucket_count: usize,
    /// Speed (m/s) mapped to the last bucket
    pub max_speed: f32,
    pub palette: PaletteSpec,
    pub line_width: f32,
    /// Random placements tried per seed before falling back
    pub seed_attempts: u32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            particle_multiplier: DEFAULT_PARTICLE_MULTIPLIER,
            max_age: DEFAULT_MAX_AGE,
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            fade_color: [0, 0, 0],
            fade_opacity: DEFAULT_FADE_OPACITY,
            bucket_count: DEFAULT_BUCKET_COUNT,
            max_speed: DEFAULT_MAX_SPEED,
            palette: PaletteSpec::Grayscale,
            line_width: 1.0,
            seed_attempts: DEFAULT_SEED_ATTEMPTS,
            seed: None,
        }
    }
}

impl WindSettings {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let settings: WindSettings = serde_json::from_str(json).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.particle_multiplier.is_finite() && self.particle_multiplier >= 0.0) {
            return Err(format!("particleMultiplier must be >= 0, got {}", self.particle_multiplier));
        }
        if self.max_age == 0 {
            return Err("maxAge must be at least 1".to_string());
        }
        if !self.velocity_scale.is_finite() {
            return Err("velocityScale must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.fade_opacity) {
            return Err(format!("fadeOpacity must be within 0..=1, got {}", self.fade_opacity));
        }
        if self.bucket_count == 0 {
            return Err("bucketCount must be at least 1".to_string());
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(format!("maxSpeed must be positive, got {}", self.max_speed));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(format!("lineWidth must be positive, got {}", self.line_width));
        }
        if let PaletteSpec::Gradient { stops } = &self.palette {
            if stops.is_empty() {
                return Err("gradient palette needs at least one stop".to_string());
            }
        }
        Ok(())
    }

    pub fn color_scale(&self) -> Result<ColorScale, String> {
        match &self.palette {
            PaletteSpec::Grayscale => ColorScale::grayscale(self.bucket_count, self.max_speed),
            PaletteSpec::Gradient { stops } => {
                let stops: Vec<Rgba> = stops.iter().copied().map(Rgba::from_array).collect();
                ColorScale::from_gradient(&stops, self.bucket_count, self.max_speed)
            }
            PaletteSpec::Theme { theme } => {
                ColorScale::for_theme(*theme, self.bucket_count, self.max_speed)
            }
        }
    }

    pub fn fade(&self) -> Rgba {
        Rgba::from_array(self.fade_color).with_alpha(self.fade_opacity)
    }

    /// `round(width * multiplier)`
    pub fn particle_count_for(&self, width: u32) -> usize {
        (width as f32 * self.particle_multiplier).round() as usize
    }
}
