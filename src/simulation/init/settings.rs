use crate::domain::palette::Theme;
use crate::domain::settings::{PaletteSpec, WindSettings};

use super::perf_stats::PerfStats;
use super::WindCore;

pub(super) fn enable_perf_metrics(core: &mut WindCore, enabled: bool) {
    core.perf_enabled = enabled;
    if !enabled {
        core.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(core: &WindCore) -> PerfStats {
    core.perf_stats.clone()
}

pub(super) fn set_max_age(core: &mut WindCore, max_age: u32) {
    let max_age = max_age.max(1);
    core.settings.max_age = max_age;
    core.particles.set_max_age(max_age);
}

pub(super) fn set_velocity_scale(core: &mut WindCore, scale: f32) {
    if !scale.is_finite() {
        return;
    }
    core.settings.velocity_scale = scale;
    core.evolver.set_velocity_scale(scale);
}

pub(super) fn set_fade(core: &mut WindCore, color: [u8; 3], opacity: f32) {
    core.settings.fade_color = color;
    core.settings.fade_opacity = opacity.clamp(0.0, 1.0);
    core.renderer.set_fade(core.settings.fade());
}

pub(super) fn set_line_width(core: &mut WindCore, width: f32) {
    if width.is_finite() && width > 0.0 {
        core.settings.line_width = width;
        core.renderer.set_line_width(width);
    }
}

/// Population size follows on the next tick.
pub(super) fn set_particle_multiplier(core: &mut WindCore, multiplier: f32) {
    if multiplier.is_finite() && multiplier >= 0.0 {
        core.settings.particle_multiplier = multiplier;
        core.particles.invalidate();
    }
}

pub(super) fn set_palette(core: &mut WindCore, palette: PaletteSpec) -> Result<(), String> {
    let next = WindSettings {
        palette,
        ..core.settings.clone()
    };
    apply_settings(core, next)
}

pub(super) fn set_theme(core: &mut WindCore, key: &str) -> Result<(), String> {
    let theme = Theme::from_key(key).ok_or_else(|| format!("unknown theme '{}'", key))?;
    set_palette(core, PaletteSpec::Theme { theme })
}

pub(super) fn apply_settings(core: &mut WindCore, next: WindSettings) -> Result<(), String> {
    next.validate()?;
    let scale = next.color_scale()?;

    let repopulate = next.particle_multiplier != core.settings.particle_multiplier
        || next.seed_attempts != core.settings.seed_attempts;

    core.buckets.reset(scale.bucket_count());
    core.scale = scale;
    core.particles.set_max_age(next.max_age);
    core.particles.set_seed_attempts(next.seed_attempts);
    core.evolver.set_velocity_scale(next.velocity_scale);
    core.renderer.set_fade(next.fade());
    core.renderer.set_line_width(next.line_width);
    if repopulate {
        core.particles.invalidate();
    }
    core.settings = next;
    Ok(())
}
