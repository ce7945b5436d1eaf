//! WindCore - wind particle animation state
//!
//! Owns one field, one particle population and the per-tick scratch state.
//! Operations live in helper modules:
//! - init/      construction and RNG seeding
//! - init/settings.rs  runtime tuning
//! - step/      one tick (evolve + render)
//! - perf/      optional per-tick timings
//!
//! `facade.rs` wraps the core for JS.

use std::sync::Arc;

use crate::domain::palette::ColorScale;
use crate::domain::settings::{PaletteSpec, WindSettings};
use crate::render::{Renderer, Surface};
use crate::spatial::bridge::CoordinateBridge;
use crate::spatial::field::VectorField;
use crate::systems::evolve::{EvolveReport, Evolver};
use crate::systems::particles::{ColorBuckets, ParticleSystem};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/random.rs"]
mod random;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "step/step.rs"]
mod step;
mod facade;

pub use facade::WindLayer;
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

pub struct WindCore {
    settings: WindSettings,
    field: Arc<VectorField>,
    particles: ParticleSystem,
    buckets: ColorBuckets,
    scale: ColorScale,
    evolver: Evolver,
    renderer: Renderer,

    // State
    frame: u64,
    last_report: EvolveReport,
    strokes: u32,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl WindCore {
    /// Core with default settings and an empty field
    pub fn new(width: u32, height: u32) -> Self {
        init::create_wind_core(width, height, WindSettings::default(), ColorScale::default())
    }

    pub fn with_settings(width: u32, height: u32, settings: WindSettings) -> Result<Self, String> {
        settings.validate()?;
        let scale = settings.color_scale()?;
        Ok(init::create_wind_core(width, height, settings, scale))
    }

    pub fn width(&self) -> u32 { self.particles.width() }

    pub fn height(&self) -> u32 { self.particles.height() }

    pub fn particle_count(&self) -> usize { self.particles.len() }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn settings(&self) -> &WindSettings { &self.settings }

    pub fn field(&self) -> &Arc<VectorField> { &self.field }

    pub fn particles(&self) -> &ParticleSystem { &self.particles }

    pub fn buckets(&self) -> &ColorBuckets { &self.buckets }

    pub fn color_scale(&self) -> &ColorScale { &self.scale }

    /// Counts from the most recent tick
    pub fn last_report(&self) -> EvolveReport { self.last_report }

    /// Strokes issued by the most recent tick
    pub fn last_strokes(&self) -> u32 { self.strokes }

    pub fn is_seeded(&self) -> bool { self.particles.is_seeded() }

    /// Swap the field without touching particles; the population is
    /// reseeded before the next tick.
    pub fn set_field(&mut self, field: Arc<VectorField>) {
        let h = field.header();
        log::info!(
            "wind field {}x{} loaded (ref {})",
            h.column_count,
            h.row_count,
            if h.reference_time.is_empty() { "-" } else { h.reference_time.as_str() }
        );
        self.field = field;
        self.particles.invalidate();
    }

    /// Swap the field and reseed the whole population against it. Ages are
    /// restaggered from scratch.
    pub fn replace_field<B: CoordinateBridge + ?Sized>(&mut self, field: Arc<VectorField>, bridge: &B) {
        self.set_field(field);
        self.seed(bridge);
    }

    /// (Re)create the population: `round(width * multiplier)` particles.
    /// Returns how many seeds found no coverage.
    pub fn seed<B: CoordinateBridge + ?Sized>(&mut self, bridge: &B) -> usize {
        let count = self.settings.particle_count_for(self.width());
        let fallbacks = self.particles.populate(count, &self.field, bridge);
        self.buckets.clear();
        fallbacks
    }

    pub fn ensure_seeded<B: CoordinateBridge + ?Sized>(&mut self, bridge: &B) {
        if !self.particles.is_seeded() {
            self.seed(bridge);
        }
    }

    /// New surface size; the population is rebuilt for it.
    pub fn resize<B: CoordinateBridge + ?Sized>(&mut self, width: u32, height: u32, bridge: &B) {
        self.particles.set_bounds(width, height);
        self.seed(bridge);
    }

    /// One animation frame: evolve every particle, then draw.
    pub fn tick<B, S>(&mut self, bridge: &B, surface: &mut S) -> EvolveReport
    where
        B: CoordinateBridge + ?Sized,
        S: Surface + ?Sized,
    {
        step::tick(self, bridge, surface)
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub fn set_max_age(&mut self, max_age: u32) {
        settings::set_max_age(self, max_age);
    }

    pub fn set_velocity_scale(&mut self, scale: f32) {
        settings::set_velocity_scale(self, scale);
    }

    pub fn set_fade(&mut self, color: [u8; 3], opacity: f32) {
        settings::set_fade(self, color, opacity);
    }

    pub fn set_line_width(&mut self, width: f32) {
        settings::set_line_width(self, width);
    }

    pub fn set_particle_multiplier(&mut self, multiplier: f32) {
        settings::set_particle_multiplier(self, multiplier);
    }

    pub fn set_palette(&mut self, palette: PaletteSpec) -> Result<(), String> {
        settings::set_palette(self, palette)
    }

    /// Switch to a pollutant overlay palette by key (`tmp`, `o3`, `pm10`, `pm2.5`)
    pub fn set_theme(&mut self, key: &str) -> Result<(), String> {
        settings::set_theme(self, key)
    }

    /// Replace every setting at once. Nothing changes when validation fails.
    pub fn apply_settings(&mut self, next: WindSettings) -> Result<(), String> {
        settings::apply_settings(self, next)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
