//! WindDataset - decoding the backend's u/v JSON
//!
//! Two payload shapes are accepted:
//!
//! - the grib2json record pair the wind API returns:
//!   `[{ "header": { "lo1", "la1", "dx", "dy", "nx", "ny", "refTime", ... }, "data": [...] }, { ... }]`
//!   (u record first unless `parameterNumber` says otherwise: 2 = u, 3 = v)
//! - a compact form using the engine's own field names:
//!   `{ "header": { "originLon", ... }, "u": [...], "v": [...] }`
//!
//! `null` samples become holes.

use serde::Deserialize;

use crate::core::error::DatasetError;
use crate::spatial::field::{GridHeader, VectorField};

const PARAM_U: u32 = 2;
const PARAM_V: u32 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordHeader {
    lo1: f64,
    la1: f64,
    #[serde(default)]
    la2: Option<f64>,
    dx: f64,
    dy: f64,
    nx: u32,
    ny: u32,
    #[serde(default)]
    ref_time: String,
    #[serde(default)]
    parameter_number: Option<u32>,
}

impl RecordHeader {
    fn same_grid(&self, other: &RecordHeader) -> bool {
        self.lo1 == other.lo1
            && self.la1 == other.la1
            && self.dx == other.dx
            && self.dy == other.dy
            && self.nx == other.nx
            && self.ny == other.ny
    }

    fn to_grid_header(&self) -> GridHeader {
        // With `la2` the storage direction is explicit; otherwise a positive
        // dy means rows are stored south-up.
        let cell_height = match self.la2 {
            Some(la2) if la2 < self.la1 => -self.dy.abs(),
            Some(_) => self.dy.abs(),
            None => self.dy,
        };
        GridHeader {
            origin_lon: self.lo1,
            origin_lat: self.la1,
            cell_width: self.dx,
            cell_height,
            column_count: self.nx,
            row_count: self.ny,
            reference_time: self.ref_time.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Record {
    header: RecordHeader,
    data: Vec<Option<f32>>,
}

#[derive(Debug, Deserialize)]
struct CompactDataset {
    header: GridHeader,
    u: Vec<Option<f32>>,
    v: Vec<Option<f32>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Records(Vec<Record>),
    Compact(CompactDataset),
}

/// Decoded but not yet validated wind dataset.
#[derive(Debug, Clone)]
pub struct WindDataset {
    pub header: GridHeader,
    pub u: Vec<Option<f32>>,
    pub v: Vec<Option<f32>>,
}

impl WindDataset {
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        match serde_json::from_str::<Payload>(json)? {
            Payload::Compact(c) => Ok(Self {
                header: c.header,
                u: c.u,
                v: c.v,
            }),
            Payload::Records(records) => Self::from_records(records),
        }
    }

    fn from_records(mut records: Vec<Record>) -> Result<Self, DatasetError> {
        let u_pos = records
            .iter()
            .position(|r| r.header.parameter_number == Some(PARAM_U));
        let v_pos = records
            .iter()
            .position(|r| r.header.parameter_number == Some(PARAM_V));
        let (u_idx, v_idx) = match (u_pos, v_pos) {
            (Some(u), Some(v)) => (u, v),
            _ => (0, 1),
        };

        if records.len() <= u_idx {
            return Err(DatasetError::MissingComponent("u"));
        }
        if records.len() <= v_idx {
            return Err(DatasetError::MissingComponent("v"));
        }
        if !records[u_idx].header.same_grid(&records[v_idx].header) {
            return Err(DatasetError::HeaderMismatch);
        }

        let header = records[u_idx].header.to_grid_header();
        let v = std::mem::take(&mut records[v_idx].data);
        let u = std::mem::take(&mut records[u_idx].data);
        Ok(Self { header, u, v })
    }

    pub fn into_field(self) -> Result<VectorField, DatasetError> {
        Ok(VectorField::from_optional(self.header, &self.u, &self.v)?)
    }
}

/// Decode JSON straight into a field.
pub fn field_from_json(json: &str) -> Result<VectorField, DatasetError> {
    WindDataset::from_json(json)?.into_field()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FieldError;

    const RECORDS: &str = r#"[
        {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 2, "ny": 2,
                    "refTime": "2025-06-25T00:00:00.000Z", "parameterNumber": 2},
         "data": [1, 1, 1, null]},
        {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 2, "ny": 2,
                    "refTime": "2025-06-25T00:00:00.000Z", "parameterNumber": 3},
         "data": [0, 0, 0, 0]}
    ]"#;

    #[test]
    fn decodes_record_pair() {
        let ds = WindDataset::from_json(RECORDS).unwrap();
        assert_eq!(ds.header.column_count, 2);
        assert_eq!(ds.header.reference_time, "2025-06-25T00:00:00.000Z");
        assert_eq!(ds.u, vec![Some(1.0), Some(1.0), Some(1.0), None]);
        let field = ds.into_field().unwrap();
        // Stored row 1 (north) has the hole in column 1.
        assert_eq!(field.sample(0, 1), None);
        assert_eq!(field.sample(1, 1), Some((1.0, 0.0)));
    }

    #[test]
    fn parameter_numbers_pick_components_out_of_order() {
        let json = r#"[
            {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 1, "ny": 1, "parameterNumber": 3}, "data": [5]},
            {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 1, "ny": 1, "parameterNumber": 2}, "data": [7]}
        ]"#;
        let ds = WindDataset::from_json(json).unwrap();
        assert_eq!(ds.u, vec![Some(7.0)]);
        assert_eq!(ds.v, vec![Some(5.0)]);
    }

    #[test]
    fn la2_orders_rows_north_up() {
        // North-up GFS style: la1 = 10 (north), la2 = 0, positive dy.
        let json = r#"[
            {"header": {"lo1": 0, "la1": 10, "la2": 0, "dx": 1, "dy": 10, "nx": 1, "ny": 2}, "data": [3, 4]},
            {"header": {"lo1": 0, "la1": 10, "la2": 0, "dx": 1, "dy": 10, "nx": 1, "ny": 2}, "data": [0, 0]}
        ]"#;
        let field = field_from_json(json).unwrap();
        assert_eq!(field.header().cell_height, -10.0);
        assert_eq!(field.sample(0, 0), Some((3.0, 0.0)));
        assert_eq!(field.geo_bounds().north, 10.0);
    }

    #[test]
    fn decodes_compact_shape() {
        let json = r#"{"header": {"originLon": 0, "originLat": 0, "cellWidth": 1, "cellHeight": 1,
                                  "columnCount": 2, "rowCount": 1},
                       "u": [1, 2], "v": [0, null]}"#;
        let ds = WindDataset::from_json(json).unwrap();
        assert_eq!(ds.header.reference_time, "");
        assert_eq!(ds.v, vec![Some(0.0), None]);
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(WindDataset::from_json("{"), Err(DatasetError::Parse(_))));

        let one = r#"[{"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 1, "ny": 1}, "data": [1]}]"#;
        assert!(matches!(WindDataset::from_json(one), Err(DatasetError::MissingComponent("v"))));

        let mismatch = r#"[
            {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 1, "ny": 1}, "data": [1]},
            {"header": {"lo1": 0, "la1": 0, "dx": 2, "dy": 1, "nx": 1, "ny": 1}, "data": [1]}
        ]"#;
        assert!(matches!(WindDataset::from_json(mismatch), Err(DatasetError::HeaderMismatch)));

        let short = r#"[
            {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 2, "ny": 1}, "data": [1]},
            {"header": {"lo1": 0, "la1": 0, "dx": 1, "dy": 1, "nx": 2, "ny": 1}, "data": [1]}
        ]"#;
        assert!(matches!(
            field_from_json(short),
            Err(DatasetError::Field(FieldError::LengthMismatch { expected: 2, .. }))
        ));
    }
}
