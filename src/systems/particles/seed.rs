use rand::Rng;

use super::ParticleSystem;
use crate::spatial::bridge::CoordinateBridge;
use crate::spatial::field::VectorField;

/// Placement chosen for a (re)seeded particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub x: f32,
    pub y: f32,
    pub age: u32,
    /// No attempt landed on covered data
    pub fallback: bool,
}

impl ParticleSystem {
    /// Pick a placement on covered data.
    ///
    /// Tries up to `seed_attempts` uniform positions. Accepted seeds get a
    /// random age in `[0, max_age)` so the population does not expire all at
    /// once. When every attempt misses, a random position with age 0 is
    /// returned instead; this never fails.
    pub fn seed_one<B: CoordinateBridge + ?Sized>(&mut self, field: &VectorField, bridge: &B) -> Seed {
        let w = self.width as f32;
        let h = self.height as f32;

        for _ in 0..self.seed_attempts {
            let x = self.rng.gen::<f32>() * w;
            let y = self.rng.gen::<f32>() * h;
            let covered = bridge
                .pixel_to_geo(x as f64, y as f64)
                .and_then(|(lon, lat)| field.interpolate(lon, lat))
                .is_some();
            if covered {
                let age = self.rng.gen_range(0..self.max_age);
                return Seed { x, y, age, fallback: false };
            }
        }

        Seed {
            x: self.rng.gen::<f32>() * w,
            y: self.rng.gen::<f32>() * h,
            age: 0,
            fallback: true,
        }
    }

    /// Replace the population with exactly `count` freshly seeded particles.
    /// Returns how many seeds took the fallback path.
    pub fn populate<B: CoordinateBridge + ?Sized>(
        &mut self,
        count: usize,
        field: &VectorField,
        bridge: &B,
    ) -> usize {
        self.x.resize(count, 0.0);
        self.y.resize(count, 0.0);
        self.next_x.resize(count, 0.0);
        self.next_y.resize(count, 0.0);
        self.age.resize(count, 0);

        let mut fallbacks = 0;
        for idx in 0..count {
            let seed = self.seed_one(field, bridge);
            if seed.fallback {
                fallbacks += 1;
            }
            self.write(idx, seed);
        }
        self.seeded = true;

        if fallbacks > 0 {
            log::debug!("populated {} particles ({} without coverage)", count, fallbacks);
        }
        fallbacks
    }

    /// Reset one particle in place. Returns true when the fallback was taken.
    pub fn reseed<B: CoordinateBridge + ?Sized>(
        &mut self,
        idx: usize,
        field: &VectorField,
        bridge: &B,
    ) -> bool {
        let seed = self.seed_one(field, bridge);
        self.write(idx, seed);
        seed.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::bridge::IdentityBridge;
    use crate::spatial::field::GridHeader;

    fn field(nx: u32, ny: u32) -> VectorField {
        let header = GridHeader {
            origin_lon: 0.0,
            origin_lat: 0.0,
            cell_width: 1.0,
            cell_height: 1.0,
            column_count: nx,
            row_count: ny,
            reference_time: String::new(),
        };
        let n = (nx * ny) as usize;
        VectorField::new(header, &vec![1.0; n], &vec![0.0; n]).unwrap()
    }

    #[test]
    fn seeds_land_on_coverage_with_staggered_ages() {
        let field = field(11, 11);
        let mut ps = ParticleSystem::new(10, 10, 150, 30, 1);
        for _ in 0..200 {
            let s = ps.seed_one(&field, &IdentityBridge);
            assert!(!s.fallback);
            assert!(s.age < 150);
            assert!(s.x >= 0.0 && s.x < 10.0 && s.y >= 0.0 && s.y < 10.0);
            assert!(field.interpolate(s.x as f64, s.y as f64).is_some());
        }
    }

    #[test]
    fn fallback_when_nothing_is_covered() {
        let field = field(2, 2);
        let mut ps = ParticleSystem::new(64, 32, 150, 30, 2);
        let off_view = |_x: f64, _y: f64| -> Option<(f64, f64)> { None };
        let s = ps.seed_one(&field, &off_view);
        assert!(s.fallback);
        assert_eq!(s.age, 0);
        assert!(s.x >= 0.0 && s.x < 64.0 && s.y >= 0.0 && s.y < 32.0);
    }

    #[test]
    fn zero_attempts_always_falls_back() {
        let field = field(11, 11);
        let mut ps = ParticleSystem::new(10, 10, 150, 0, 3);
        assert!(ps.seed_one(&field, &IdentityBridge).fallback);
    }

    #[test]
    fn populate_holds_exact_count_even_on_empty_field() {
        let empty = field(0, 0);
        let mut ps = ParticleSystem::new(20, 20, 10, 30, 4);
        let fallbacks = ps.populate(140, &empty, &IdentityBridge);
        assert_eq!(ps.len(), 140);
        assert_eq!(fallbacks, 140);
        assert!(ps.is_seeded());
        assert!(ps.ages().iter().all(|&a| a == 0));

        ps.populate(7, &empty, &IdentityBridge);
        assert_eq!(ps.len(), 7);
    }

    #[test]
    fn same_seed_same_population() {
        let field = field(11, 11);
        let mut a = ParticleSystem::new(10, 10, 150, 30, 42);
        let mut b = ParticleSystem::new(10, 10, 150, 30, 42);
        a.populate(50, &field, &IdentityBridge);
        b.populate(50, &field, &IdentityBridge);
        assert_eq!(a.ages(), b.ages());
        assert_eq!(a.position(17), b.position(17));
    }
}
