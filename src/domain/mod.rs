//! Domain - configuration, palettes and dataset decoding

pub mod dataset;
pub mod palette;
pub mod settings;

pub use dataset::WindDataset;
pub use palette::{ColorScale, Rgba, Theme};
pub use settings::{PaletteSpec, WindSettings};
