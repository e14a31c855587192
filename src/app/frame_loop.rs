use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::app::timer::Timer;
use crate::errors::{KennelError, Result};
use crate::render::RenderPipeline;
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Stopped by the stop handle or by host teardown.
    Stopped,
    /// A frame failed; no further frames run.
    Faulted,
}

/// Cancellation token for a [`FrameLoop`]. Cheap to clone and `Send`.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Host facility that paces frames.
pub trait FrameScheduler {
    /// Waits until the host is ready for another frame. Returns `false`
    /// once the host is going away.
    fn next_frame(&mut self) -> bool;
}

/// Per-frame driver: clock, controls, animation and render, in that order.
///
/// A loop is `Running` from construction until it is stopped or a frame
/// fails. Neither transition can be undone.
pub struct FrameLoop<P: RenderPipeline> {
    stage: Stage,
    pipeline: P,
    timer: Timer,
    state: LoopState,
    stop: StopHandle,
    frames: u64,
}

impl<P: RenderPipeline> FrameLoop<P> {
    #[must_use]
    pub fn new(stage: Stage, pipeline: P) -> Self {
        Self {
            stage,
            pipeline,
            timer: Timer::new(),
            state: LoopState::Running,
            stop: StopHandle::default(),
            frames: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames completed so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    #[must_use]
    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.stage.resize(width, height);
        self.pipeline.resize(width, height);
    }

    /// Runs one frame using the elapsed time since the previous one.
    pub fn tick(&mut self) -> Result<()> {
        let dt = self.timer.tick();
        self.tick_with_delta(dt)
    }

    /// Runs one frame with an explicit delta in seconds.
    pub fn tick_with_delta(&mut self, dt: f32) -> Result<()> {
        if self.state == LoopState::Running && self.stop.is_stopped() {
            log::info!("Frame loop stopped after {} frames", self.frames);
            self.state = LoopState::Stopped;
        }
        if self.state != LoopState::Running {
            return Err(KennelError::LoopStopped);
        }

        let dt = dt.max(0.0);
        self.stage.advance(dt);

        if let Err(err) = self
            .pipeline
            .render(self.stage.scene(), self.stage.camera(), dt)
        {
            log::error!("Frame {} failed, halting loop: {err}", self.frames);
            self.state = LoopState::Faulted;
            return Err(err);
        }

        self.frames += 1;
        Ok(())
    }

    /// Drives frames from `scheduler` until it reports teardown, the stop
    /// handle fires, or a frame fails.
    ///
    /// A loop that already left `Running` fails with
    /// [`KennelError::LoopStopped`] without asking the scheduler for a frame.
    pub fn run(&mut self, scheduler: &mut impl FrameScheduler) -> Result<()> {
        if self.state != LoopState::Running {
            return Err(KennelError::LoopStopped);
        }
        log::info!("Frame loop running");
        loop {
            if self.stop.is_stopped() {
                self.state = LoopState::Stopped;
                log::info!("Frame loop stopped after {} frames", self.frames);
                return Ok(());
            }
            // Ask for the next frame before doing this one's work.
            if !scheduler.next_frame() {
                self.state = LoopState::Stopped;
                log::info!("Host ended the frame loop after {} frames", self.frames);
                return Ok(());
            }
            self.tick()?;
        }
    }
}

/// Native scheduler that sleeps to hold a target frame rate.
#[cfg(not(target_arch = "wasm32"))]
pub struct PacedScheduler {
    interval: std::time::Duration,
    next_deadline: Option<std::time::Instant>,
    remaining: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
impl PacedScheduler {
    /// `target_fps` is clamped to at least 1.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            interval: std::time::Duration::from_secs(1) / target_fps.max(1),
            next_deadline: None,
            remaining: None,
        }
    }

    /// Ends the loop after `frames` frames.
    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameScheduler for PacedScheduler {
    fn next_frame(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        let now = std::time::Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        // Do not try to catch up after a long stall.
        self.next_deadline = Some(deadline.max(now) + self.interval);
        true
    }
}
