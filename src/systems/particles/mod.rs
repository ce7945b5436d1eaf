//! ParticleSystem - fixed-size tracer population
//!
//! Structure of Arrays for the hot per-tick loop:
//!
//! Instead of: Vec<Particle { x, y, next_x, next_y, age }>
//! We have:    x[], y[], next_x[], next_y[], age[]
//!
//! Particles are never reallocated while the surface size is stable: dying
//! particles are reseeded in place.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod buckets;
mod seed;

pub use buckets::ColorBuckets;
pub use seed::Seed;

pub struct ParticleSystem {
    width: u32,
    height: u32,
    max_age: u32,
    seed_attempts: u32,

    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) next_x: Vec<f32>,
    pub(crate) next_y: Vec<f32>,
    pub(crate) age: Vec<u32>,

    rng: ChaCha8Rng,
    seeded: bool,
}

impl ParticleSystem {
    pub fn new(width: u32, height: u32, max_age: u32, seed_attempts: u32, rng_seed: u64) -> Self {
        Self {
            width,
            height,
            max_age: max_age.max(1),
            seed_attempts,
            x: Vec::new(),
            y: Vec::new(),
            next_x: Vec::new(),
            next_y: Vec::new(),
            age: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            seeded: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.age.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.age.is_empty()
    }

    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Forget the current population; the next `populate` starts fresh.
    pub fn invalidate(&mut self) {
        self.seeded = false;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    pub fn set_max_age(&mut self, max_age: u32) {
        self.max_age = max_age.max(1);
    }

    pub fn set_seed_attempts(&mut self, attempts: u32) {
        self.seed_attempts = attempts;
    }

    /// New surface bounds; the caller repopulates afterwards.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.seeded = false;
    }

    #[inline]
    pub fn position(&self, idx: usize) -> (f32, f32) {
        (self.x[idx], self.y[idx])
    }

    #[inline]
    pub fn next_position(&self, idx: usize) -> (f32, f32) {
        (self.next_x[idx], self.next_y[idx])
    }

    #[inline]
    pub fn age(&self, idx: usize) -> u32 {
        self.age[idx]
    }

    pub fn ages(&self) -> &[u32] {
        &self.age
    }

    /// Mark a particle as out of coverage; it is recycled on the next tick.
    #[inline]
    pub fn retire(&mut self, idx: usize) {
        self.age[idx] = self.max_age;
    }

    /// Move a particle to the end of its stroke.
    #[inline]
    pub fn commit(&mut self, idx: usize) {
        self.x[idx] = self.next_x[idx];
        self.y[idx] = self.next_y[idx];
    }

    #[inline]
    fn write(&mut self, idx: usize, seed: Seed) {
        self.x[idx] = seed.x;
        self.y[idx] = seed.y;
        self.next_x[idx] = seed.x;
        self.next_y[idx] = seed.y;
        self.age[idx] = seed.age;
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, idx: usize, x: f32, y: f32, age: u32) {
        self.write(idx, Seed { x, y, age, fallback: false });
    }
}
