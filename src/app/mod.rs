//! Application layer: frame clock, the frame loop and host schedulers.
//!
//! - [`Timer`]: monotonic delta-time clock
//! - [`FrameLoop`]: per-frame driver with an explicit [`LoopState`] and a
//!   [`StopHandle`]
//! - [`FrameScheduler`]: the host's "call me for the next frame" facility
//! - `winit` (feature `winit`): windowed host that drives the loop from redraws

pub mod frame_loop;
pub mod timer;

#[cfg(feature = "winit")]
pub mod winit;

pub use frame_loop::{FrameLoop, FrameScheduler, LoopState, StopHandle};
#[cfg(not(target_arch = "wasm32"))]
pub use frame_loop::PacedScheduler;
pub use timer::Timer;
