use crate::render::Surface;
use crate::spatial::bridge::CoordinateBridge;
use crate::systems::evolve::EvolveReport;

use super::{PerfTimer, WindCore};

pub(super) fn tick<B, S>(core: &mut WindCore, bridge: &B, surface: &mut S) -> EvolveReport
where
    B: CoordinateBridge + ?Sized,
    S: Surface + ?Sized,
{
    let perf_on = core.perf_enabled;
    let tick_start = if perf_on { Some(PerfTimer::start()) } else { None };

    // Lazy (re)seed after a field swap or a population change
    let mut fallbacks = 0;
    if !core.particles.is_seeded() {
        fallbacks = core.seed(bridge);
    }

    let mut lap = PerfTimer::start();

    // === EVOLVE ===
    let report = core.evolver.tick(
        &mut core.particles,
        &mut core.buckets,
        &core.field,
        bridge,
        &core.scale,
    );
    let evolve_ms = if perf_on { lap.lap_ms() } else { 0.0 };

    // === RENDER ===
    let strokes = core
        .renderer
        .draw(surface, &mut core.particles, &core.buckets, &core.scale);
    let render_ms = if perf_on { lap.elapsed_ms() } else { 0.0 };

    core.frame += 1;
    core.last_report = report;
    core.strokes = strokes;

    if let Some(t0) = tick_start {
        let stats = &mut core.perf_stats;
        stats.reset();
        stats.evolve_ms = evolve_ms;
        stats.render_ms = render_ms;
        stats.tick_ms = t0.elapsed_ms();
        stats.particles_advanced = report.advanced;
        stats.particles_reseeded = report.reseeded;
        stats.particles_retired = report.retired;
        stats.seed_fallbacks = report.seed_fallbacks + fallbacks as u32;
        stats.non_empty_buckets = strokes;
        stats.particle_count = core.particles.len() as u32;
    }

    report
}
