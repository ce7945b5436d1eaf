//! Windflow Engine - wind-field particle animation in WASM
//!
//! Thousands of tracer particles advected through a gridded wind field and
//! drawn as fading, speed-colored trails over a map.
//!
//! Architecture:
//! - core/        - Errors and logging
//! - spatial/     - Vector field grid, interpolation, pixel/geo bridges
//! - domain/      - Palettes, settings, dataset decoding
//! - systems/     - Particle population and per-tick evolution
//! - render/      - Trail renderer and draw surfaces
//! - animation/   - Loop lifecycle and frame scheduling
//! - simulation/  - WindCore orchestration and the JS facade

pub mod core;
pub mod spatial;
pub mod domain;
pub mod systems;
pub mod render;
pub mod animation;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::logging::install();
    log::info!("Windflow WASM engine initialized");
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use animation::{AnimationLoop, FrameScheduler, LoopState, ManualScheduler};
pub use domain::dataset::{field_from_json, WindDataset};
pub use domain::palette::{ColorScale, Rgba, Theme};
pub use domain::settings::{PaletteSpec, WindSettings};
pub use render::{RasterSurface, Surface};
pub use simulation::{PerfStats, WindCore, WindLayer};
pub use spatial::{CoordinateBridge, GridHeader, IdentityBridge, Projection, VectorField, ViewportBridge};
pub use systems::EvolveReport;
