use wasm_bindgen::prelude::*;

/// Snapshot of the last tick. All zeros while metrics are disabled.
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct PerfStats {
    pub(super) tick_ms: f64,
    pub(super) evolve_ms: f64,
    pub(super) render_ms: f64,
    pub(super) particles_advanced: u32,
    pub(super) particles_reseeded: u32,
    pub(super) particles_retired: u32,
    pub(super) seed_fallbacks: u32,
    pub(super) non_empty_buckets: u32,
    pub(super) particle_count: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn tick_ms(&self) -> f64 { self.tick_ms }
    #[wasm_bindgen(getter)]
    pub fn evolve_ms(&self) -> f64 { self.evolve_ms }
    #[wasm_bindgen(getter)]
    pub fn render_ms(&self) -> f64 { self.render_ms }
    #[wasm_bindgen(getter)]
    pub fn particles_advanced(&self) -> u32 { self.particles_advanced }
    #[wasm_bindgen(getter)]
    pub fn particles_reseeded(&self) -> u32 { self.particles_reseeded }
    #[wasm_bindgen(getter)]
    pub fn particles_retired(&self) -> u32 { self.particles_retired }
    #[wasm_bindgen(getter)]
    pub fn seed_fallbacks(&self) -> u32 { self.seed_fallbacks }
    #[wasm_bindgen(getter)]
    pub fn non_empty_buckets(&self) -> u32 { self.non_empty_buckets }
    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.particle_count }
}
