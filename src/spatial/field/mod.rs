//! VectorField - immutable raster of (u, v) wind samples
//!
//! Storage is Structure of Arrays (`u[]`, `v[]`), row-major, normalized so that
//! row 0 is always the northernmost row. Source arrays may be stored south-up
//! (positive `cell_height`) or north-up (negative `cell_height`).
//!
//! Holes (missing samples) are stored as NaN in both components.
//!
//! When the grid spans the whole globe (`nx * dx >= 360`) every row carries a
//! copy of its first cell at the end, so the east neighbour of the last column
//! is always addressable without branching at query time.

use serde::{Deserialize, Serialize};

use crate::core::error::FieldError;

mod interpolate;

pub use interpolate::WindSample;

/// Geographic metadata of a wind raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridHeader {
    /// Longitude of the first column (degrees)
    pub origin_lon: f64,
    /// Latitude of the first *stored* row (degrees)
    pub origin_lat: f64,
    /// dLon between columns
    pub cell_width: f64,
    /// dLat between stored rows; the sign gives the storage direction
    pub cell_height: f64,
    pub column_count: u32,
    pub row_count: u32,
    #[serde(default)]
    pub reference_time: String,
}

impl GridHeader {
    #[inline]
    pub fn sample_count(&self) -> usize {
        (self.column_count as usize) * (self.row_count as usize)
    }

    /// True when the columns cover a full turn of longitude.
    #[inline]
    pub fn wraps_longitude(&self) -> bool {
        (self.column_count as f64 * self.cell_width).floor() >= 360.0
    }

    /// Latitude of the northernmost row.
    pub fn north_lat(&self) -> f64 {
        if self.cell_height > 0.0 && self.row_count > 0 {
            self.origin_lat + (self.row_count - 1) as f64 * self.cell_height
        } else {
            self.origin_lat
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        let ok = |d: f64| d.is_finite() && d != 0.0;
        if ok(self.cell_width) && ok(self.cell_height) {
            Ok(())
        } else {
            Err(FieldError::InvalidCellSize {
                cell_width: self.cell_width,
                cell_height: self.cell_height,
            })
        }
    }
}

/// Lon/lat extent covered by sample centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

pub struct VectorField {
    header: GridHeader,
    north_lat: f64,
    wraps: bool,
    /// Cells per stored row: `nx`, or `nx + 1` with the wraparound column
    row_stride: usize,
    u: Vec<f32>,
    v: Vec<f32>,
}

impl VectorField {
    /// Build a field from parallel component arrays laid out as described by
    /// `header`. Non-finite samples become holes.
    pub fn new(header: GridHeader, u: &[f32], v: &[f32]) -> Result<Self, FieldError> {
        let expected = header.sample_count();
        if u.len() != v.len() || u.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                u_len: u.len(),
                v_len: v.len(),
            });
        }
        header.validate()?;

        let nx = header.column_count as usize;
        let ny = header.row_count as usize;
        let wraps = nx > 0 && header.wraps_longitude();
        let row_stride = if wraps { nx + 1 } else { nx };
        let south_up = header.cell_height > 0.0;

        let mut out_u = Vec::with_capacity(row_stride * ny);
        let mut out_v = Vec::with_capacity(row_stride * ny);

        for row in 0..ny {
            let src_row = if south_up { ny - 1 - row } else { row };
            let src = src_row * nx;
            for col in 0..nx {
                let (su, sv) = sanitize(u[src + col], v[src + col]);
                out_u.push(su);
                out_v.push(sv);
            }
            if wraps {
                let (su, sv) = sanitize(u[src], v[src]);
                out_u.push(su);
                out_v.push(sv);
            }
        }

        log::debug!(
            "vector field {}x{} built (wraps={}, south_up={})",
            nx,
            ny,
            wraps,
            south_up
        );

        Ok(Self {
            north_lat: header.north_lat(),
            header,
            wraps,
            row_stride,
            u: out_u,
            v: out_v,
        })
    }

    /// Field with no samples; every query misses.
    pub fn empty() -> Self {
        Self {
            header: GridHeader {
                origin_lon: 0.0,
                origin_lat: 0.0,
                cell_width: 1.0,
                cell_height: -1.0,
                column_count: 0,
                row_count: 0,
                reference_time: String::new(),
            },
            north_lat: 0.0,
            wraps: false,
            row_stride: 0,
            u: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Same as [`VectorField::new`] but with explicit holes (`None`).
    pub fn from_optional(
        header: GridHeader,
        u: &[Option<f32>],
        v: &[Option<f32>],
    ) -> Result<Self, FieldError> {
        let u: Vec<f32> = u.iter().map(|s| s.unwrap_or(f32::NAN)).collect();
        let v: Vec<f32> = v.iter().map(|s| s.unwrap_or(f32::NAN)).collect();
        Self::new(header, &u, &v)
    }

    #[inline]
    pub fn header(&self) -> &GridHeader {
        &self.header
    }

    #[inline]
    pub fn wraps_longitude(&self) -> bool {
        self.wraps
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Stored (u, v) at a normalized row (0 = north) and column, `None` for
    /// holes and out-of-range cells.
    pub fn sample(&self, row: usize, col: usize) -> Option<(f32, f32)> {
        if row >= self.header.row_count as usize || col >= self.row_stride {
            return None;
        }
        let idx = row * self.row_stride + col;
        let (u, v) = (self.u[idx], self.v[idx]);
        if u.is_nan() {
            None
        } else {
            Some((u, v))
        }
    }

    pub fn geo_bounds(&self) -> GeoBounds {
        let h = &self.header;
        let cols = h.column_count.saturating_sub(1) as f64;
        let rows = h.row_count.saturating_sub(1) as f64;
        GeoBounds {
            west: h.origin_lon,
            east: h.origin_lon + cols * h.cell_width,
            north: self.north_lat,
            south: self.north_lat - rows * h.cell_height.abs(),
        }
    }
}

#[inline]
fn sanitize(u: f32, v: f32) -> (f32, f32) {
    if u.is_finite() && v.is_finite() {
        (u, v)
    } else {
        (f32::NAN, f32::NAN)
    }
}
