//! Spatial - the wind raster and the pixel/geo bridge

pub mod bridge;
pub mod field;

pub use bridge::{CoordinateBridge, IdentityBridge, Projection, ViewportBridge};
pub use field::{GeoBounds, GridHeader, VectorField, WindSample};
