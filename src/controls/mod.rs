//! Camera controls and the platform independent input state they read.

pub mod input;
pub mod orbit;

pub use input::{Input, PointerButton};
pub use orbit::OrbitControls;
