use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::prelude::*;

use super::perf_stats::PerfStats;
use super::WindCore;
use crate::animation::{AnimationFrameScheduler, AnimationLoop, LoopState};
use crate::domain::dataset::field_from_json;
use crate::domain::settings::WindSettings;
use crate::render::CanvasSurface;
use crate::spatial::bridge::{CoordinateBridge, Projection, ViewportBridge};
use crate::spatial::field::{GridHeader, VectorField};

/// Bridge backed by a JS function `(x, y) => [lon, lat] | null`.
pub(crate) struct JsBridge {
    func: js_sys::Function,
}

impl CoordinateBridge for JsBridge {
    fn pixel_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let out = self
            .func
            .call2(&JsValue::NULL, &JsValue::from_f64(x), &JsValue::from_f64(y))
            .ok()?;
        if out.is_null() || out.is_undefined() {
            return None;
        }
        let lon = js_sys::Reflect::get_u32(&out, 0).ok()?.as_f64()?;
        let lat = js_sys::Reflect::get_u32(&out, 1).ok()?.as_f64()?;
        Some((lon, lat))
    }
}

enum LayerBridge {
    Js(JsBridge),
    Viewport {
        bounds: (f64, f64, f64, f64),
        projection: Projection,
        bridge: ViewportBridge,
    },
}

impl CoordinateBridge for LayerBridge {
    fn pixel_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            LayerBridge::Js(b) => b.pixel_to_geo(x, y),
            LayerBridge::Viewport { bridge, .. } => bridge.pixel_to_geo(x, y),
        }
    }
}

struct LayerState {
    core: WindCore,
    animation: AnimationLoop<AnimationFrameScheduler>,
    bridge: Option<LayerBridge>,
    surface: Option<CanvasSurface>,
}

impl LayerState {
    fn new(core: WindCore) -> Self {
        Self {
            core,
            animation: AnimationLoop::new(AnimationFrameScheduler::new()),
            bridge: None,
            surface: None,
        }
    }

    fn frame(&mut self) {
        let LayerState { core, animation, bridge, surface } = self;
        match (bridge.as_ref(), surface.as_mut()) {
            (Some(bridge), Some(surface)) => {
                animation.on_frame(core, bridge, surface);
            }
            _ => animation.stop(),
        }
    }

    fn replace_field(&mut self, field: VectorField) {
        let field = Arc::new(field);
        let LayerState { core, animation, bridge, surface } = self;
        if let Some(surface) = surface.as_ref() {
            surface.clear();
        }
        match bridge.as_ref() {
            Some(bridge) => animation.replace_field(core, field, bridge),
            // seeded lazily once a bridge exists
            None => core.set_field(field),
        }
    }
}

/// Wind particle layer bound to a canvas.
///
/// Frames are driven by `requestAnimationFrame`; the frame callback only
/// holds a weak reference, so freeing the layer ends the loop.
#[wasm_bindgen]
pub struct WindLayer {
    inner: Rc<RefCell<LayerState>>,
}

impl WindLayer {
    fn from_core(core: WindCore) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LayerState::new(core))),
        }
    }

    fn install_frame_callback(&self) {
        let weak = Rc::downgrade(&self.inner);
        let callback = Closure::wrap(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut state) = inner.try_borrow_mut() {
                    state.frame();
                }
            }
        }) as Box<dyn FnMut()>);
        self.inner
            .borrow_mut()
            .animation
            .scheduler_mut()
            .set_callback(callback);
    }
}

#[wasm_bindgen]
impl WindLayer {
    /// Create a layer with default settings
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_core(WindCore::new(width, height))
    }

    /// Create a layer from a settings JSON object (missing keys take defaults)
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(width: u32, height: u32, settings_json: &str) -> Result<WindLayer, JsValue> {
        let settings = WindSettings::from_json(settings_json).map_err(|e| JsValue::from_str(&e))?;
        let core = WindCore::with_settings(width, height, settings).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self::from_core(core))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.inner.borrow().core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.inner.borrow().core.height() }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.inner.borrow().core.particle_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.inner.borrow().core.frame() }

    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool { self.inner.borrow().animation.is_running() }

    /// refTime of the loaded dataset (empty when unknown)
    #[wasm_bindgen(getter)]
    pub fn reference_time(&self) -> String {
        self.inner.borrow().core.field().header().reference_time.clone()
    }

    /// Use a JS `(x, y) => [lon, lat] | null` function as the coordinate bridge
    pub fn set_bridge(&self, func: js_sys::Function) {
        self.inner.borrow_mut().bridge = Some(LayerBridge::Js(JsBridge { func }));
    }

    /// Use a plain north-up viewport over a lon/lat box as the coordinate bridge
    pub fn set_viewport(&self, west: f64, south: f64, east: f64, north: f64, mercator: bool) {
        let mut state = self.inner.borrow_mut();
        let projection = if mercator { Projection::WebMercator } else { Projection::Equirectangular };
        let bounds = (west, south, east, north);
        let bridge = ViewportBridge::new(state.core.width(), state.core.height(), bounds, projection);
        state.bridge = Some(LayerBridge::Viewport { bounds, projection, bridge });
    }

    pub fn attach_canvas(&self, canvas: web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
        let surface = CanvasSurface::from_canvas(canvas)?;
        self.inner.borrow_mut().surface = Some(surface);
        Ok(())
    }

    /// Load a wind dataset (backend record pair or compact `{header, u, v}`)
    pub fn load_field_json(&self, json: &str) -> Result<(), JsValue> {
        let field = field_from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.borrow_mut().replace_field(field);
        Ok(())
    }

    /// Load a wind field from a header JSON and component arrays (NaN = hole)
    pub fn load_field(&self, header_json: &str, u: Vec<f32>, v: Vec<f32>) -> Result<(), JsValue> {
        let header: GridHeader = serde_json::from_str(header_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid grid header: {}", e)))?;
        let field = VectorField::new(header, &u, &v).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.borrow_mut().replace_field(field);
        Ok(())
    }

    pub fn start(&self) -> Result<(), JsValue> {
        let needs_callback = {
            let state = self.inner.borrow();
            if state.animation.state() == LoopState::Disposed {
                return Err(JsValue::from_str("Layer disposed"));
            }
            if state.bridge.is_none() {
                return Err(JsValue::from_str("No coordinate bridge set"));
            }
            if state.surface.is_none() {
                return Err(JsValue::from_str("No canvas attached"));
            }
            !state.animation.scheduler().has_callback()
        };
        if needs_callback {
            self.install_frame_callback();
        }

        let mut state = self.inner.borrow_mut();
        let LayerState { core, animation, bridge, .. } = &mut *state;
        if let Some(bridge) = bridge.as_ref() {
            animation.start(core, bridge);
        }
        Ok(())
    }

    /// Cancel the pending frame. Safe to call at any time.
    pub fn stop(&self) {
        self.inner.borrow_mut().animation.stop();
    }

    /// Stop for good and release the frame callback.
    pub fn dispose(&self) {
        let mut state = self.inner.borrow_mut();
        state.animation.dispose();
        state.animation.scheduler_mut().clear_callback();
        if let Some(surface) = state.surface.take() {
            surface.clear();
        }
    }

    /// Run one frame now, outside the animation schedule.
    pub fn tick(&self) -> Result<(), JsValue> {
        let mut state = self.inner.borrow_mut();
        let LayerState { core, bridge, surface, .. } = &mut *state;
        let bridge = bridge.as_ref().ok_or_else(|| JsValue::from_str("No coordinate bridge set"))?;
        let surface = surface.as_mut().ok_or_else(|| JsValue::from_str("No canvas attached"))?;
        core.tick(bridge, surface);
        Ok(())
    }

    /// New surface size; rebuilds the population (and the viewport bridge)
    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.inner.borrow_mut();
        let LayerState { core, bridge, surface, .. } = &mut *state;
        if let Some(LayerBridge::Viewport { bounds, projection, bridge }) = bridge.as_mut() {
            *bridge = ViewportBridge::new(width, height, *bounds, *projection);
        }
        if let Some(surface) = surface.as_ref() {
            surface.canvas().set_width(width);
            surface.canvas().set_height(height);
        }
        match bridge.as_ref() {
            Some(bridge) => core.resize(width, height, bridge),
            None => core.resize(width, height, &|_: f64, _: f64| -> Option<(f64, f64)> { None }),
        }
    }

    /// Replace all settings from JSON (missing keys take defaults)
    pub fn apply_settings(&self, settings_json: &str) -> Result<(), JsValue> {
        let settings = WindSettings::from_json(settings_json).map_err(|e| JsValue::from_str(&e))?;
        self.inner
            .borrow_mut()
            .core
            .apply_settings(settings)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Current settings as JSON
    pub fn settings_json(&self) -> String {
        self.inner.borrow().core.settings().to_json()
    }

    /// Pollutant overlay palette: `tmp`, `o3`, `pm10`, `pm2.5`
    pub fn set_theme(&self, key: &str) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .core
            .set_theme(key)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn set_max_age(&self, max_age: u32) {
        self.inner.borrow_mut().core.set_max_age(max_age);
    }

    pub fn set_velocity_scale(&self, scale: f32) {
        self.inner.borrow_mut().core.set_velocity_scale(scale);
    }

    pub fn set_fade(&self, r: u8, g: u8, b: u8, opacity: f32) {
        self.inner.borrow_mut().core.set_fade([r, g, b], opacity);
    }

    pub fn set_line_width(&self, width: f32) {
        self.inner.borrow_mut().core.set_line_width(width);
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&self, enabled: bool) {
        self.inner.borrow_mut().core.enable_perf_metrics(enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.inner.borrow().core.get_perf_stats()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn js_bridge(body: &str) -> JsBridge {
        JsBridge {
            func: js_sys::Function::new_with_args("x, y", body),
        }
    }

    fn error_text(result: Result<(), JsValue>) -> String {
        result.unwrap_err().as_string().unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn js_bridge_passes_lon_lat_through() {
        let bridge = js_bridge("return [x + 100, y - 10];");
        assert_eq!(bridge.pixel_to_geo(2.0, 3.0), Some((102.0, -7.0)));
    }

    #[wasm_bindgen_test]
    fn js_bridge_null_or_undefined_is_off_map() {
        assert_eq!(js_bridge("return null;").pixel_to_geo(1.0, 1.0), None);
        assert_eq!(js_bridge("return undefined;").pixel_to_geo(1.0, 1.0), None);
    }

    #[wasm_bindgen_test]
    fn js_bridge_short_or_non_numeric_result_is_off_map() {
        assert_eq!(js_bridge("return [1];").pixel_to_geo(1.0, 1.0), None);
        assert_eq!(js_bridge("return [];").pixel_to_geo(1.0, 1.0), None);
        assert_eq!(js_bridge("return ['a', 2];").pixel_to_geo(1.0, 1.0), None);
        assert_eq!(js_bridge("return [1, null];").pixel_to_geo(1.0, 1.0), None);
    }

    #[wasm_bindgen_test]
    fn js_bridge_that_throws_is_off_map() {
        assert_eq!(js_bridge("throw new Error('boom');").pixel_to_geo(1.0, 1.0), None);
    }

    #[wasm_bindgen_test]
    fn start_requires_bridge_then_canvas() {
        let layer = WindLayer::new(4, 4);
        assert_eq!(error_text(layer.start()), "No coordinate bridge set");

        layer.set_viewport(0.0, 0.0, 3.0, 3.0, false);
        assert_eq!(error_text(layer.start()), "No canvas attached");
        assert!(!layer.is_running());
    }

    #[wasm_bindgen_test]
    fn tick_requires_bridge_then_canvas() {
        let layer = WindLayer::new(4, 4);
        assert_eq!(error_text(layer.tick()), "No coordinate bridge set");
        layer.set_bridge(js_sys::Function::new_with_args("x, y", "return [x, y];"));
        assert_eq!(error_text(layer.tick()), "No canvas attached");
        assert_eq!(layer.frame(), 0);
    }

    #[wasm_bindgen_test]
    fn stop_before_start_is_harmless() {
        let layer = WindLayer::new(4, 4);
        layer.stop();
        layer.stop();
        assert!(!layer.is_running());
    }

    #[wasm_bindgen_test]
    fn start_after_dispose_fails() {
        let layer = WindLayer::new(4, 4);
        layer.set_viewport(0.0, 0.0, 3.0, 3.0, false);
        layer.dispose();
        assert_eq!(error_text(layer.start()), "Layer disposed");
        // dispose is idempotent and stop stays safe afterwards
        layer.dispose();
        layer.stop();
        assert!(!layer.is_running());
    }

    #[wasm_bindgen_test]
    fn field_loads_without_a_bridge_and_seeds_lazily() {
        let layer = WindLayer::new(4, 4);
        let header = r#"{"originLon":0,"originLat":0,"cellWidth":1,"cellHeight":1,"columnCount":2,"rowCount":2,"referenceTime":"2024-01-01T00:00:00Z"}"#;
        layer.load_field(header, vec![1.0; 4], vec![0.0; 4]).unwrap();
        assert_eq!(layer.reference_time(), "2024-01-01T00:00:00Z");
        assert_eq!(layer.particle_count(), 0);
        assert!(layer.load_field(header, vec![1.0; 3], vec![0.0; 4]).is_err());
    }
}
