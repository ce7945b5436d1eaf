//! AnimationLoop - start/stop/dispose lifecycle around `WindCore::tick`
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//!   \                |
//!    +--dispose--> Disposed (terminal)
//! ```
//!
//! Each frame runs one tick and requests the next frame. A frame that fires
//! after `stop` does nothing.

use std::sync::Arc;

pub mod scheduler;

pub use scheduler::{AnimationFrameScheduler, FrameScheduler, ManualScheduler};

use crate::render::Surface;
use crate::simulation::WindCore;
use crate::spatial::bridge::CoordinateBridge;
use crate::spatial::field::VectorField;
use crate::systems::evolve::EvolveReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Disposed,
}

pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    frames: u64,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames run by this loop
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Seed the population if needed and request the first frame.
    /// Returns false when already running or disposed.
    pub fn start<B: CoordinateBridge + ?Sized>(&mut self, core: &mut WindCore, bridge: &B) -> bool {
        if self.state != LoopState::Idle {
            return false;
        }
        core.ensure_seeded(bridge);
        self.state = LoopState::Running;
        self.scheduler.schedule_next();
        log::debug!("animation started ({} particles)", core.particle_count());
        true
    }

    /// Run one scheduled frame. Returns the tick report, or `None` when the
    /// loop is not running.
    pub fn on_frame<B, F>(&mut self, core: &mut WindCore, bridge: &B, surface: &mut F) -> Option<EvolveReport>
    where
        B: CoordinateBridge + ?Sized,
        F: Surface + ?Sized,
    {
        self.scheduler.fired();
        if self.state != LoopState::Running {
            return None;
        }
        let report = core.tick(bridge, surface);
        self.frames += 1;
        self.scheduler.schedule_next();
        Some(report)
    }

    /// Cancel any pending frame. Safe in any state.
    pub fn stop(&mut self) {
        self.scheduler.cancel();
        if self.state == LoopState::Running {
            self.state = LoopState::Idle;
            log::debug!("animation stopped after {} frames", self.frames);
        }
    }

    pub fn dispose(&mut self) {
        self.stop();
        self.state = LoopState::Disposed;
    }

    /// Swap in a new dataset: stop, reseed the whole population against the
    /// new field, and resume if the loop was running.
    pub fn replace_field<B: CoordinateBridge + ?Sized>(
        &mut self,
        core: &mut WindCore,
        field: Arc<VectorField>,
        bridge: &B,
    ) {
        if self.state == LoopState::Disposed {
            return;
        }
        let resume = self.is_running();
        self.stop();
        core.replace_field(field, bridge);
        if resume {
            self.start(core, bridge);
        }
    }
}
