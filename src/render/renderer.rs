use super::{Composite, Surface};
use crate::domain::palette::{ColorScale, Rgba};
use crate::systems::particles::{ColorBuckets, ParticleSystem};

/// Draws one frame of trails.
///
/// The fade pass keeps `fade.alpha` of every existing pixel, so history
/// decays geometrically without ever being redrawn.
pub struct Renderer {
    fade: Rgba,
    fade_css: String,
    line_width: f32,
}

impl Renderer {
    pub fn new(fade: Rgba, line_width: f32) -> Self {
        Self {
            fade_css: fade.css(),
            fade,
            line_width,
        }
    }

    #[inline]
    pub fn fade(&self) -> Rgba {
        self.fade
    }

    pub fn set_fade(&mut self, fade: Rgba) {
        self.fade = fade;
        self.fade_css = fade.css();
    }

    #[inline]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    /// Fade, then stroke every non-empty bucket once. Particles in a bucket
    /// end up at their `next` position. Returns the number of strokes.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        particles: &mut ParticleSystem,
        buckets: &ColorBuckets,
        scale: &ColorScale,
    ) -> u32 {
        let w = surface.width() as f64;
        let h = surface.height() as f64;

        surface.set_composite(Composite::DestinationIn);
        surface.fill_rect(0.0, 0.0, w, h, self.fade, &self.fade_css);
        surface.set_composite(Composite::SourceOver);

        let mut strokes = 0;
        for (bucket, members) in buckets.non_empty() {
            surface.begin_path();
            for &idx in members {
                let idx = idx as usize;
                let (x, y) = particles.position(idx);
                let (nx, ny) = particles.next_position(idx);
                surface.move_to(x as f64, y as f64);
                surface.line_to(nx as f64, ny as f64);
                particles.commit(idx);
            }
            surface.stroke(scale.color(bucket), scale.css(bucket), self.line_width as f64);
            strokes += 1;
        }
        strokes
    }
}
