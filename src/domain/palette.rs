//! ColorScale - wind speed to stroke color
//!
//! Particles are batched into N color buckets spanning `[0, max_speed]`.
//! Bucket `k` of a ramp takes the color at `k / (N - 1)` along it.

use serde::{Deserialize, Serialize};

use super::settings::{DEFAULT_BUCKET_COUNT, DEFAULT_MAX_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Alpha as a 0..=1 fraction
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// CSS color string for canvas `fillStyle` / `strokeStyle`.
    pub fn css(&self) -> String {
        let a = (self.alpha() * 1000.0).round() / 1000.0;
        format!("rgba({},{},{},{})", self.r, self.g, self.b, a)
    }

    /// Packed ABGR (little-endian bytes RR,GG,BB,AA) for direct ImageData copy.
    #[inline]
    pub fn to_abgr(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.b as u32) << 16) | ((self.g as u32) << 8) | (self.r as u32)
    }

    #[inline]
    pub fn from_abgr(px: u32) -> Self {
        Self {
            r: (px & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: ((px >> 16) & 0xFF) as u8,
            a: (px >> 24) as u8,
        }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Thematic overlay tables from the dashboard's pollutant layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "tmp")]
    Temperature,
    #[serde(rename = "o3")]
    Ozone,
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "pm2.5")]
    Pm25,
}

/// One interval of a thematic table: values in `(min, max]` run light → dark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeInterval {
    pub min: f32,
    pub max: f32,
    pub light: Rgba,
    pub dark: Rgba,
}

const BLUE: (Rgba, Rgba) = (Rgba::rgb(180, 210, 255), Rgba::rgb(0, 100, 255));
const GREEN: (Rgba, Rgba) = (Rgba::rgb(180, 255, 180), Rgba::rgb(0, 128, 0));
const YELLOW: (Rgba, Rgba) = (Rgba::rgb(255, 245, 180), Rgba::rgb(255, 200, 0));
const RED: (Rgba, Rgba) = (Rgba::rgb(255, 180, 180), Rgba::rgb(200, 0, 0));

const fn interval(min: f32, max: f32, (light, dark): (Rgba, Rgba)) -> ThemeInterval {
    ThemeInterval { min, max, light, dark }
}

const TEMPERATURE: [ThemeInterval; 4] = [
    interval(0.0, 10.0, BLUE),
    interval(10.0, 20.0, GREEN),
    interval(20.0, 30.0, YELLOW),
    interval(30.0, 40.0, RED),
];
const OZONE: [ThemeInterval; 4] = [
    interval(0.0, 0.0301, BLUE),
    interval(0.0301, 0.0901, GREEN),
    interval(0.0901, 0.1501, YELLOW),
    interval(0.1501, 0.3001, RED),
];
const PM10: [ThemeInterval; 4] = [
    interval(0.0, 31.0, BLUE),
    interval(31.0, 81.0, GREEN),
    interval(81.0, 151.0, YELLOW),
    interval(151.0, 320.0, RED),
];
const PM25: [ThemeInterval; 4] = [
    interval(0.0, 16.0, BLUE),
    interval(16.0, 36.0, GREEN),
    interval(36.0, 76.0, YELLOW),
    interval(76.0, 200.0, RED),
];

impl Theme {
    /// Host option key ("tmp", "o3", "pm10", "pm2.5").
    pub fn from_key(key: &str) -> Option<Theme> {
        match key {
            "tmp" => Some(Theme::Temperature),
            "o3" => Some(Theme::Ozone),
            "pm10" => Some(Theme::Pm10),
            "pm2.5" | "pm25" => Some(Theme::Pm25),
            _ => None,
        }
    }

    pub fn intervals(&self) -> &'static [ThemeInterval] {
        match self {
            Theme::Temperature => &TEMPERATURE,
            Theme::Ozone => &OZONE,
            Theme::Pm10 => &PM10,
            Theme::Pm25 => &PM25,
        }
    }

    /// Upper bound of the last interval.
    pub fn max(&self) -> f32 {
        self.intervals().last().map(|i| i.max).unwrap_or(1.0)
    }

    pub fn color_at(&self, value: f32) -> Rgba {
        let intervals = self.intervals();
        for iv in intervals {
            if value > iv.min && value <= iv.max {
                let t = (value - iv.min) / (iv.max - iv.min);
                return iv.light.lerp(iv.dark, t);
            }
        }
        match intervals {
            [first, ..] if value <= first.min => first.light,
            [.., last] => last.dark,
            [] => Rgba::rgb(255, 255, 255),
        }
    }
}

const GRAY_STOPS: [Rgba; 2] = [Rgba::rgb(85, 85, 85), Rgba::rgb(255, 255, 255)];

pub struct ColorScale {
    colors: Vec<Rgba>,
    css: Vec<String>,
    max_speed: f32,
}

impl ColorScale {
    pub fn new(colors: Vec<Rgba>, max_speed: f32) -> Result<Self, String> {
        if colors.is_empty() {
            return Err("color scale needs at least one bucket".to_string());
        }
        if !(max_speed.is_finite() && max_speed > 0.0) {
            return Err(format!("max speed must be positive, got {}", max_speed));
        }
        Ok(Self::from_colors(colors, max_speed))
    }

    fn from_colors(colors: Vec<Rgba>, max_speed: f32) -> Self {
        let css = colors.iter().map(Rgba::css).collect();
        Self { colors, css, max_speed }
    }

    /// Dark-to-light gray ramp (85 → 255). 18 buckets give the classic
    /// 85, 95, ..., 255 steps.
    pub fn grayscale(bucket_count: usize, max_speed: f32) -> Result<Self, String> {
        Self::from_gradient(&GRAY_STOPS, bucket_count, max_speed)
    }

    /// Evenly sample a multi-stop linear gradient into `bucket_count` colors.
    pub fn from_gradient(stops: &[Rgba], bucket_count: usize, max_speed: f32) -> Result<Self, String> {
        if stops.is_empty() {
            return Err("gradient needs at least one stop".to_string());
        }
        Self::new(ramp(stops, bucket_count), max_speed)
    }

    /// Sample a thematic table across its full value range.
    pub fn for_theme(theme: Theme, bucket_count: usize, max_speed: f32) -> Result<Self, String> {
        let top = theme.max();
        let colors = (0..bucket_count)
            .map(|k| theme.color_at(ramp_position(k, bucket_count) * top))
            .collect();
        Self::new(colors, max_speed)
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    #[inline]
    pub fn color(&self, bucket: usize) -> Rgba {
        self.colors[bucket]
    }

    #[inline]
    pub fn css(&self, bucket: usize) -> &str {
        &self.css[bucket]
    }

    /// `floor(min(m, max) / max * (N - 1))`
    #[inline]
    pub fn bucket_index_for(&self, magnitude: f32) -> usize {
        let last = self.colors.len() - 1;
        let t = magnitude.min(self.max_speed) / self.max_speed;
        let idx = (t * last as f32).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(last)
        }
    }
}

/// 18-step gray ramp over 0..=17 m/s.
impl Default for ColorScale {
    fn default() -> Self {
        Self::from_colors(ramp(&GRAY_STOPS, DEFAULT_BUCKET_COUNT), DEFAULT_MAX_SPEED)
    }
}

#[inline]
/// `n` evenly spaced samples of a gradient
fn ramp(stops: &[Rgba], n: usize) -> Vec<Rgba> {
    (0..n).map(|k| sample_gradient(stops, ramp_position(k, n))).collect()
}

fn ramp_position(k: usize, n: usize) -> f32 {
    if n <= 1 {
        0.0
    } else {
        k as f32 / (n - 1) as f32
    }
}

fn sample_gradient(stops: &[Rgba], t: f32) -> Rgba {
    if stops.len() == 1 {
        return stops[0];
    }
    let segments = (stops.len() - 1) as f32;
    let pos = t.clamp(0.0, 1.0) * segments;
    let seg = (pos.floor() as usize).min(stops.len() - 2);
    stops[seg].lerp(stops[seg + 1], pos - seg as f32)
}
