//! Evolver - one advection step over the whole population
//!
//! Per particle, in index order:
//! 1. expired (age at or past max) -> reseed in place, no advection
//! 2. current pixel off the view or 3. off coverage -> retire
//! 4. integrate one step through the field
//! 5. predicted position off the view or off coverage -> retire
//! 6. age, keep the step, bucket by speed
//!
//! Retired particles carry `age == max_age` and are recycled on the next tick.

use super::particles::{ColorBuckets, ParticleSystem};
use crate::domain::palette::ColorScale;
use crate::spatial::bridge::CoordinateBridge;
use crate::spatial::field::{VectorField, WindSample};

/// Counts from one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvolveReport {
    pub advanced: u32,
    pub reseeded: u32,
    pub retired: u32,
    pub seed_fallbacks: u32,
}

pub struct Evolver {
    velocity_scale: f32,
}

impl Evolver {
    pub fn new(velocity_scale: f32) -> Self {
        Self { velocity_scale }
    }

    #[inline]
    pub fn velocity_scale(&self) -> f32 {
        self.velocity_scale
    }

    pub fn set_velocity_scale(&mut self, scale: f32) {
        self.velocity_scale = scale;
    }

    /// Pixels travelled per tick per m/s on a surface of the given height
    #[inline]
    pub fn step_factor(&self, height: u32) -> f32 {
        self.velocity_scale * height as f32
    }

    pub fn tick<B: CoordinateBridge + ?Sized>(
        &self,
        particles: &mut ParticleSystem,
        buckets: &mut ColorBuckets,
        field: &VectorField,
        bridge: &B,
        scale: &ColorScale,
    ) -> EvolveReport {
        let mut report = EvolveReport::default();
        let k = self.step_factor(particles.height());
        let max_age = particles.max_age();

        buckets.clear();

        for idx in 0..particles.len() {
            if particles.age[idx] >= max_age {
                if particles.reseed(idx, field, bridge) {
                    report.seed_fallbacks += 1;
                }
                report.reseeded += 1;
                continue;
            }

            let (x, y) = particles.position(idx);

            let Some(wind) = sample_at(field, bridge, x, y) else {
                particles.retire(idx);
                report.retired += 1;
                continue;
            };

            // Screen y grows downward, northward wind moves up
            let nx = x + wind.u * k;
            let ny = y - wind.v * k;

            if sample_at(field, bridge, nx, ny).is_none() {
                particles.retire(idx);
                report.retired += 1;
                continue;
            }

            particles.next_x[idx] = nx;
            particles.next_y[idx] = ny;
            particles.age[idx] += 1;
            buckets.push(scale.bucket_index_for(wind.magnitude), idx);
            report.advanced += 1;
        }

        report
    }
}

#[inline]
fn sample_at<B: CoordinateBridge + ?Sized>(
    field: &VectorField,
    bridge: &B,
    x: f32,
    y: f32,
) -> Option<WindSample> {
    let (lon, lat) = bridge.pixel_to_geo(x as f64, y as f64)?;
    field.interpolate(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::bridge::IdentityBridge;
    use crate::spatial::field::GridHeader;

    fn uniform(nx: u32, ny: u32, u: f32, v: f32) -> VectorField {
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
        VectorField::new(header, &vec![u; n], &vec![v; n]).unwrap()
    }

    #[test]
    fn expired_particle_is_reseeded_without_advection() {
        let field = uniform(11, 11, 1.0, 0.0);
        let scale = ColorScale::grayscale(18, 17.0).unwrap();
        let mut ps = ParticleSystem::new(10, 10, 5, 30, 7);
        let mut buckets = ColorBuckets::new(scale.bucket_count());
        ps.populate(1, &field, &IdentityBridge);
        ps.place(0, 2.0, 2.0, 6);

        let report = Evolver::new(0.0005).tick(&mut ps, &mut buckets, &field, &IdentityBridge, &scale);
        assert_eq!(report.reseeded, 1);
        assert_eq!(report.advanced, 0);
        assert!(ps.age(0) < 5);
        assert_eq!(buckets.total(), 0);
    }

    #[test]
    fn steps_follow_wind_with_screen_y_flipped() {
        let field = uniform(11, 11, 3.0, 4.0);
        let scale = ColorScale::grayscale(18, 17.0).unwrap();
        let mut ps = ParticleSystem::new(10, 10, 150, 30, 7);
        let mut buckets = ColorBuckets::new(scale.bucket_count());
        ps.populate(1, &field, &IdentityBridge);
        ps.place(0, 5.0, 5.0, 0);

        let evolver = Evolver::new(0.01);
        let report = evolver.tick(&mut ps, &mut buckets, &field, &IdentityBridge, &scale);
        assert_eq!(report.advanced, 1);

        let (nx, ny) = ps.next_position(0);
        assert!((nx - 5.3).abs() < 1e-5);
        assert!((ny - 4.6).abs() < 1e-5);
        assert_eq!(ps.position(0), (5.0, 5.0));
        assert_eq!(ps.age(0), 1);
        // magnitude 5 of 17 over 17 steps
        assert_eq!(buckets.bucket(scale.bucket_index_for(5.0)), &[0]);
    }

    #[test]
    fn step_into_no_coverage_retires() {
        // coverage ends at x = 1.0
        let field = uniform(2, 2, 1.0, 0.0);
        let scale = ColorScale::grayscale(18, 17.0).unwrap();
        let mut ps = ParticleSystem::new(1, 1, 150, 30, 7);
        let mut buckets = ColorBuckets::new(scale.bucket_count());
        ps.populate(1, &field, &IdentityBridge);
        ps.place(0, 0.99, 0.5, 3);

        let report = Evolver::new(0.1).tick(&mut ps, &mut buckets, &field, &IdentityBridge, &scale);
        assert_eq!(report.retired, 1);
        assert_eq!(ps.age(0), 150);
        assert_eq!(ps.position(0), (0.99, 0.5));
        assert_eq!(buckets.total(), 0);
    }

    #[test]
    fn bridge_miss_retires() {
        let field = uniform(11, 11, 1.0, 0.0);
        let scale = ColorScale::grayscale(18, 17.0).unwrap();
        let mut ps = ParticleSystem::new(10, 10, 150, 30, 7);
        let mut buckets = ColorBuckets::new(scale.bucket_count());
        ps.populate(4, &field, &IdentityBridge);

        let nowhere = |_x: f64, _y: f64| -> Option<(f64, f64)> { None };
        let report = Evolver::new(0.0005).tick(&mut ps, &mut buckets, &field, &nowhere, &scale);
        assert_eq!(report.retired + report.reseeded, 4);
        assert!(ps.ages().iter().all(|&a| a <= 150));
    }
}
