//! Frame schedulers
//!
//! The loop asks for "one more frame" and may withdraw the request. Who
//! actually calls back is up to the host: the browser's
//! `requestAnimationFrame`, or a test pumping frames by hand.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub trait FrameScheduler {
    /// Request one frame. A second request while one is pending is a no-op.
    fn schedule_next(&mut self);
    /// Withdraw the pending request, if any.
    fn cancel(&mut self);
    fn is_pending(&self) -> bool;
    /// The pending frame has started running.
    fn fired(&mut self);
}

/// Scheduler for headless hosts: frames run only when the host pumps them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
    cancels: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested so far
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Pending requests withdrawn so far
    pub fn cancels(&self) -> u64 {
        self.cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) {
        if !self.pending {
            self.pending = true;
            self.requests += 1;
        }
    }

    fn cancel(&mut self) {
        if self.pending {
            self.pending = false;
            self.cancels += 1;
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
    }

    fn fired(&mut self) {
        self.pending = false;
    }
}

/// `requestAnimationFrame` driven scheduler (browser only).
///
/// The callback is installed once by the owner and reused for every frame.
#[derive(Default)]
pub struct AnimationFrameScheduler {
    callback: Option<Closure<dyn FnMut()>>,
    handle: Option<i32>,
}

impl AnimationFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn set_callback(&mut self, callback: Closure<dyn FnMut()>) {
        self.cancel();
        self.callback = Some(callback);
    }

    /// Drop the callback; nothing can be scheduled afterwards.
    pub fn clear_callback(&mut self) {
        self.cancel();
        self.callback = None;
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule_next(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(callback) = self.callback.as_ref() else {
            log::warn!("frame requested without a callback");
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.handle = Some(id),
            Err(err) => log::warn!("requestAnimationFrame failed: {:?}", err),
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    fn fired(&mut self) {
        self.handle = None;
    }
}

impl Drop for AnimationFrameScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_coalesces_requests() {
        let mut s = ManualScheduler::new();
        s.schedule_next();
        s.schedule_next();
        assert!(s.is_pending());
        assert_eq!(s.requests(), 1);

        s.fired();
        assert!(!s.is_pending());
        s.schedule_next();
        assert_eq!(s.requests(), 2);
    }

    #[test]
    fn manual_cancel_is_idempotent() {
        let mut s = ManualScheduler::new();
        s.cancel();
        assert_eq!(s.cancels(), 0);
        s.schedule_next();
        s.cancel();
        s.cancel();
        assert_eq!(s.cancels(), 1);
        assert!(!s.is_pending());
    }

    #[test]
    fn frame_scheduler_without_callback_stays_idle() {
        let mut s = AnimationFrameScheduler::new();
        s.cancel();
        assert!(!s.is_pending());
        assert!(!s.has_callback());
    }
}
