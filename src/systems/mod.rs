pub mod evolve;
pub mod particles;

pub use evolve::{EvolveReport, Evolver};
pub use particles::{ColorBuckets, ParticleSystem, Seed};
