//! CoordinateBridge - render-surface pixels to geographic coordinates
//!
//! The host map owns projection, pan and zoom. It hands the engine a bridge
//! that is consistent with its view at call time; when the view changes the
//! host supplies a new bridge (usually by restarting the loop).

/// Web Mercator latitude limit (degrees)
const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

pub trait CoordinateBridge {
    /// Geographic (lon, lat) under pixel (`x`, `y`), or `None` when the pixel
    /// is off the current view.
    fn pixel_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

impl<F> CoordinateBridge for F
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    #[inline]
    fn pixel_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self(x, y)
    }
}

/// Pixel (x, y) maps to (lon, lat) = (x, y).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityBridge;

impl CoordinateBridge for IdentityBridge {
    #[inline]
    fn pixel_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Some((x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Plate carrée: latitude linear in pixel rows
    Equirectangular,
    /// Spherical Web Mercator
    WebMercator,
}

/// Bridge for a simple north-up viewport showing a lon/lat box.
///
/// Useful for headless rendering and for hosts whose view is a plain
/// equirectangular or Web Mercator map.
#[derive(Debug, Clone, Copy)]
pub struct ViewportBridge {
    width: f64,
    height: f64,
    west: f64,
    east: f64,
    /// North/south edges in projected units (degrees or mercator y)
    top: f64,
    bottom: f64,
    projection: Projection,
}

impl ViewportBridge {
    pub fn new(
        width: u32,
        height: u32,
        (west, south, east, north): (f64, f64, f64, f64),
        projection: Projection,
    ) -> Self {
        let (top, bottom) = match projection {
            Projection::Equirectangular => (north, south),
            Projection::WebMercator => (mercator_y(north), mercator_y(south)),
        };
        Self {
            width: width as f64,
            height: height as f64,
            west,
            east,
            top,
            bottom,
            projection,
        }
    }
}

impl CoordinateBridge for ViewportBridge {
    fn pixel_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !(x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height) {
            return None;
        }
        let lon = self.west + (x / self.width) * (self.east - self.west);
        let py = self.top + (y / self.height) * (self.bottom - self.top);
        let lat = match self.projection {
            Projection::Equirectangular => py,
            Projection::WebMercator => inverse_mercator_lat(py),
        };
        Some((lon, lat))
    }
}

/// Unit-sphere mercator y for a latitude in degrees.
fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    (0.5 * (std::f64::consts::FRAC_PI_2 + lat)).tan().ln()
}

fn inverse_mercator_lat(y: f64) -> f64 {
    (2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees()
}
