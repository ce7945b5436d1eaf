use super::VectorField;

/// Interpolated wind at a point: components in m/s plus their magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSample {
    pub u: f32,
    pub v: f32,
    pub magnitude: f32,
}

impl VectorField {
    /// Bilinear wind at (`lon`, `lat`).
    ///
    /// Returns `None` outside coverage and when any of the four surrounding
    /// samples is a hole.
    pub fn interpolate(&self, lon: f64, lat: f64) -> Option<WindSample> {
        let h = &self.header;
        let nx = h.column_count;
        let ny = h.row_count;
        if nx == 0 || ny == 0 {
            return None;
        }

        let i = (lon - h.origin_lon) / h.cell_width;
        // Rows are stored north-first, so distance is measured southward
        // from the northernmost row whatever the source storage order was.
        let j = (self.north_lat - lat) / h.cell_height.abs();
        if !i.is_finite() || !j.is_finite() {
            return None;
        }

        let fi_f = i.floor();
        let fj_f = j.floor();
        let fx = (i - fi_f) as f32;
        let fy = (j - fj_f) as f32;

        // Range checks stay in f64 so huge coordinates never reach the casts.
        let col = if self.wraps {
            fi_f.rem_euclid(nx as f64)
        } else {
            fi_f
        };
        if col < 0.0
            || col + 1.0 >= self.row_stride as f64
            || fj_f < 0.0
            || fj_f + 1.0 >= ny as f64
        {
            return None;
        }

        let fi = col as usize;
        let ci = fi + 1;
        let fj = fj_f as usize;
        let cj = fj + 1;

        let g00 = self.sample(fj, fi)?;
        let g10 = self.sample(fj, ci)?;
        let g01 = self.sample(cj, fi)?;
        let g11 = self.sample(cj, ci)?;

        let sample = bilinear(fx, fy, g00, g10, g01, g11);
        if sample.magnitude.is_finite() {
            Some(sample)
        } else {
            None
        }
    }
}

#[inline(always)]
fn bilinear(
    x: f32,
    y: f32,
    g00: (f32, f32),
    g10: (f32, f32),
    g01: (f32, f32),
    g11: (f32, f32),
) -> WindSample {
    let rx = 1.0 - x;
    let ry = 1.0 - y;
    let a = rx * ry;
    let b = x * ry;
    let c = rx * y;
    let d = x * y;
    let u = g00.0 * a + g10.0 * b + g01.0 * c + g11.0 * d;
    let v = g00.1 * a + g10.1 * b + g01.1 * c + g11.1 * d;
    WindSample {
        u,
        v,
        magnitude: (u * u + v * v).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::GridHeader;
    use super::*;

    fn header(nx: u32, ny: u32, dx: f64, dy: f64) -> GridHeader {
        GridHeader {
            origin_lon: 0.0,
            origin_lat: 0.0,
            cell_width: dx,
            cell_height: dy,
            column_count: nx,
            row_count: ny,
            reference_time: "2025-06-25T00:00:00Z".to_string(),
        }
    }

    fn uniform() -> VectorField {
        VectorField::new(header(2, 2, 1.0, 1.0), &[1.0; 4], &[0.0; 4]).unwrap()
    }

    #[test]
    fn uniform_field_centre() {
        let w = uniform().interpolate(0.5, 0.5).unwrap();
        assert_eq!(w, WindSample { u: 1.0, v: 0.0, magnitude: 1.0 });
    }

    #[test]
    fn grid_vertex_returns_stored_sample() {
        // 3x3 south-up grid, u = column + 10 * stored row
        let mut u = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                u.push((col + 10 * row) as f32);
            }
        }
        let v: Vec<f32> = u.iter().map(|x| -x).collect();
        let field = VectorField::new(header(3, 3, 1.0, 1.0), &u, &v).unwrap();

        // lon=1, lat=1 is stored row 1, column 1
        let w = field.interpolate(1.0, 1.0).unwrap();
        assert_eq!((w.u, w.v), (11.0, -11.0));
        // lon=0, lat=2 is the northern stored row 2, column 0
        let w = field.interpolate(0.0, 2.0).unwrap();
        assert_eq!((w.u, w.v), (20.0, -20.0));
    }

    #[test]
    fn magnitude_is_exact_and_finite_inside_coverage() {
        let u = [3.0, -1.5, 0.25, 7.0, 2.0, -4.0, 1.0, 0.0, 5.5];
        let v = [4.0, 2.5, -0.75, 1.0, -3.0, 0.5, 6.0, -2.0, 1.25];
        let field = VectorField::new(header(3, 3, 0.5, 0.5), &u, &v).unwrap();

        for step_x in 0..20 {
            for step_y in 0..20 {
                let lon = 0.01 + step_x as f64 * 0.049;
                let lat = 0.01 + step_y as f64 * 0.049;
                let w = field.interpolate(lon, lat).expect("inside coverage");
                assert!(w.u.is_finite() && w.v.is_finite());
                assert_eq!(w.magnitude, (w.u * w.u + w.v * w.v).sqrt());
            }
        }
    }

    #[test]
    fn longitude_wraparound_is_continuous() {
        let u = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let v = [0.5, 0.0, -0.5, 1.0, 2.0, 0.0, 3.0, -1.0];
        let field = VectorField::new(header(4, 2, 90.0, 10.0), &u, &v).unwrap();

        for lat in [0.0, 2.5, 5.0, 9.0] {
            for lon in [0.0, 45.0, 300.0] {
                assert_eq!(field.interpolate(lon + 360.0, lat), field.interpolate(lon, lat));
            }
        }
        // The span between the last column and the duplicate is interpolated.
        let w = field.interpolate(315.0, 10.0).unwrap();
        assert_eq!(w.u, (8.0 + 5.0) / 2.0);
        // Negative longitudes wrap too.
        assert_eq!(field.interpolate(-45.0, 5.0), field.interpolate(315.0, 5.0));
    }

    #[test]
    fn outside_coverage_is_none_without_wraparound() {
        let field = uniform();
        assert_eq!(field.interpolate(-0.1, 0.5), None);
        // Last column has no east neighbour.
        assert_eq!(field.interpolate(1.0, 0.5), None);
        assert_eq!(field.interpolate(0.5, 1.5), None);
        assert_eq!(field.interpolate(0.5, -0.5), None);
        assert_eq!(field.interpolate(f64::NAN, 0.5), None);
    }

    #[test]
    fn any_hole_corner_gives_none() {
        let field = VectorField::from_optional(
            header(3, 2, 1.0, 1.0),
            &[Some(1.0), Some(1.0), None, Some(1.0), Some(1.0), Some(1.0)],
            &[Some(0.0); 6],
        )
        .unwrap();
        assert!(field.interpolate(0.5, 0.5).is_some());
        assert_eq!(field.interpolate(1.5, 0.5), None);
    }

    #[test]
    fn huge_coordinates_miss_without_panicking() {
        let field = uniform();
        assert_eq!(field.interpolate(1e20, 0.5), None);
        assert_eq!(field.interpolate(0.5, -1e20), None);
        assert_eq!(field.interpolate(-1e20, 0.5), None);
        assert_eq!(field.interpolate(0.5, 1e20), None);

        let global = VectorField::new(header(4, 2, 90.0, 10.0), &[1.0; 8], &[0.0; 8]).unwrap();
        assert!(global.interpolate(1e20, 5.0).is_some());
        assert!(global.interpolate(-1e20, 5.0).is_some());
        assert_eq!(global.interpolate(45.0, 1e20), None);
    }
}
