//! Render targets
//!
//! The renderer only speaks the `Surface` vocabulary (composite mode, rect
//! fill, one path per stroke), which is the subset of a 2D canvas context
//! the trail effect needs.

pub mod canvas;
pub mod raster;
pub mod renderer;

pub use canvas::CanvasSurface;
pub use raster::RasterSurface;
pub use renderer::Renderer;

use crate::domain::palette::Rgba;

/// How a fill combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// Paint over
    SourceOver,
    /// Keep the destination where the source is, scaled by source alpha
    DestinationIn,
}

/// 2D draw target.
///
/// Colors come with their CSS form so canvas-backed targets need no
/// per-frame formatting.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_composite(&mut self, mode: Composite);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba, css: &str);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self, color: Rgba, css: &str, line_width: f64);
}
