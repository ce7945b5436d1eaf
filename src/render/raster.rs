//! RasterSurface - persistent RGBA framebuffer
//!
//! Pixels are packed ABGR (`0xAABBGGRR`), so the buffer can be handed to JS
//! as-is and viewed as `ImageData` bytes. Colors are straight (not
//! premultiplied) alpha.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{Composite, Surface};
use crate::domain::palette::Rgba;

pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    composite: Composite,
    path: Vec<[f64; 4]>,
    cursor: Option<(f64, f64)>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
            composite: Composite::SourceOver,
            path: Vec::new(),
            cursor: None,
        }
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize((width as usize) * (height as usize), 0);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        Rgba::from_abgr(self.pixels[(y * self.width + x) as usize])
    }

    /// Pixels with any coverage left
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p >> 24 != 0).count()
    }

    /// destination-in: keep pixels under the rect, alpha scaled by `alpha`;
    /// clear everything else.
    fn keep_inside(&mut self, rect: PixelRect, alpha: u8) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        let fade_row = |(y, row): (usize, &mut [u32])| {
            let inside_row = y >= rect.y0 && y < rect.y1;
            for (x, px) in row.iter_mut().enumerate() {
                if inside_row && x >= rect.x0 && x < rect.x1 {
                    *px = scale_alpha(*px, alpha);
                } else {
                    *px = 0;
                }
            }
        };

        #[cfg(feature = "parallel")]
        {
            self.pixels.par_chunks_mut(width).enumerate().for_each(fade_row);
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.pixels.chunks_mut(width).enumerate().for_each(fade_row);
        }
    }

    fn paint_rect(&mut self, rect: PixelRect, color: Rgba) {
        let width = self.width as usize;
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let px = &mut self.pixels[y * width + x];
                *px = blend_over(*px, color);
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, size: i64, color: Rgba) {
        let lo = -(size - 1) / 2;
        for dy in lo..lo + size {
            for dx in lo..lo + size {
                let (px, py) = (x + dx, y + dy);
                if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
                    continue;
                }
                let idx = (py as usize) * (self.width as usize) + px as usize;
                self.pixels[idx] = blend_over(self.pixels[idx], color);
            }
        }
    }

    /// DDA walk from (x0, y0) to (x1, y1), one plot per major-axis step.
    fn draw_segment(&mut self, seg: [f64; 4], size: i64, color: Rgba) {
        let [x0, y0, x1, y1] = seg;
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        // Far longer than the surface can only be garbage input
        let limit = (self.width as f64 + self.height as f64) * 4.0;
        if steps > limit {
            return;
        }
        let (sx, sy) = (dx / steps, dy / steps);
        let (mut x, mut y) = (x0, y0);
        for _ in 0..=(steps as i64) {
            self.plot(x.floor() as i64, y.floor() as i64, size, color);
            x += sx;
            y += sy;
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_composite(&mut self, mode: Composite) {
        self.composite = mode;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba, _css: &str) {
        let rect = PixelRect::clip(x, y, w, h, self.width, self.height);
        match self.composite {
            Composite::DestinationIn => self.keep_inside(rect, color.a),
            Composite::SourceOver => self.paint_rect(rect, color),
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some((cx, cy)) = self.cursor {
            self.path.push([cx, cy, x, y]);
        }
        self.cursor = Some((x, y));
    }

    fn stroke(&mut self, color: Rgba, _css: &str, line_width: f64) {
        // brush is never wider than the surface
        let max_size = self.width.max(self.height).max(1) as f64;
        let size = line_width.round().clamp(1.0, max_size) as i64;
        let path = std::mem::take(&mut self.path);
        for seg in &path {
            self.draw_segment(*seg, size, color);
        }
        // the path survives the stroke, as on a canvas
        self.path = path;
    }
}

/// Half-open pixel rectangle clipped to the surface.
#[derive(Debug, Clone, Copy)]
struct PixelRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl PixelRect {
    fn clip(x: f64, y: f64, w: f64, h: f64, width: u32, height: u32) -> Self {
        let clamp = |v: f64, max: u32| -> usize {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, max as f64) as usize
            }
        };
        PixelRect {
            x0: clamp(x, width),
            y0: clamp(y, height),
            x1: clamp(x + w, width),
            y1: clamp(y + h, height),
        }
    }
}

#[inline]
fn scale_alpha(px: u32, alpha: u8) -> u32 {
    let a = (px >> 24) * alpha as u32 / 255;
    if a == 0 {
        0
    } else {
        (a << 24) | (px & 0x00FF_FFFF)
    }
}

/// Straight-alpha source-over.
#[inline]
fn blend_over(dst: u32, src: Rgba) -> u32 {
    if src.a == 255 {
        return src.to_abgr();
    }
    if src.a == 0 {
        return dst;
    }
    let d = Rgba::from_abgr(dst);
    let sa = src.alpha();
    let da = d.alpha();
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| -> u8 {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
    };
    Rgba {
        r: mix(src.r, d.r),
        g: mix(src.g, d.g),
        b: mix(src.b, d.b),
        a: (out_a * 255.0).round() as u8,
    }
    .to_abgr()
}
