use std::sync::Arc;

use crate::domain::palette::ColorScale;
use crate::domain::settings::WindSettings;
use crate::render::Renderer;
use crate::spatial::field::VectorField;
use crate::systems::evolve::{EvolveReport, Evolver};
use crate::systems::particles::{ColorBuckets, ParticleSystem};

use super::perf_stats::PerfStats;
use super::random::entropy_seed;
use super::WindCore;

pub(super) fn create_wind_core(
    width: u32,
    height: u32,
    settings: WindSettings,
    scale: ColorScale,
) -> WindCore {
    let rng_seed = settings.seed.unwrap_or_else(entropy_seed);
    WindCore {
        field: Arc::new(VectorField::empty()),
        particles: ParticleSystem::new(width, height, settings.max_age, settings.seed_attempts, rng_seed),
        buckets: ColorBuckets::new(scale.bucket_count()),
        evolver: Evolver::new(settings.velocity_scale),
        renderer: Renderer::new(settings.fade(), settings.line_width),
        scale,
        settings,
        frame: 0,
        last_report: EvolveReport::default(),
        strokes: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}
