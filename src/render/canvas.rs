//! CanvasSurface - forwards to a browser `CanvasRenderingContext2d`
//!
//! The trail fade uses the canvas' native `destination-in` compositing.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Composite, Surface};
use crate::domain::palette::Rgba;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    composite: Composite,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            composite: Composite::SourceOver,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Wipe everything drawn so far.
    pub fn clear(&self) {
        self.ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_composite(&mut self, mode: Composite) {
        if self.composite == mode {
            return;
        }
        let op = match mode {
            Composite::SourceOver => "source-over",
            Composite::DestinationIn => "destination-in",
        };
        if let Err(err) = self.ctx.set_global_composite_operation(op) {
            log::warn!("globalCompositeOperation {} rejected: {:?}", op, err);
            return;
        }
        self.composite = mode;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, _color: Rgba, css: &str) {
        ctx_set_fill_style(&self.ctx, css);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self, _color: Rgba, css: &str, line_width: f64) {
        ctx_set_stroke_style(&self.ctx, css);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(value),
    );
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(value),
    );
}
