//! Render pipeline seam.
//!
//! Drawing is delegated to a [`RenderPipeline`] implementation. The crate
//! ships [`HeadlessPipeline`], which resolves what would be drawn each frame
//! without touching a GPU.

pub mod fps_counter;

use crate::errors::Result;
use crate::scene::{Camera, NodeHandle, Scene};

pub use fps_counter::FpsCounter;

/// Draws one frame of a scene as seen by a camera.
pub trait RenderPipeline {
    /// World matrices and the camera view are up to date when this is called.
    /// `dt` is the frame delta in seconds, for time-dependent effects.
    fn render(&mut self, scene: &Scene, camera: &Camera, dt: f32) -> Result<()>;

    /// The drawing surface changed size.
    #[allow(unused_variables)]
    fn resize(&mut self, width: u32, height: u32) {}
}

/// GPU-less pipeline that builds the per-frame draw list.
#[derive(Debug, Default)]
pub struct HeadlessPipeline {
    fps: FpsCounter,
    draw_list: Vec<NodeHandle>,
    frames_rendered: u64,
    surface_size: (u32, u32),
}

impl HeadlessPipeline {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface_size: (width, height),
            ..Self::default()
        }
    }

    /// Nodes that were visible in the last rendered frame.
    #[must_use]
    pub fn draw_list(&self) -> &[NodeHandle] {
        &self.draw_list
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }
}

impl RenderPipeline for HeadlessPipeline {
    fn render(&mut self, scene: &Scene, _camera: &Camera, dt: f32) -> Result<()> {
        self.draw_list.clear();
        self.draw_list.extend(scene.visible_nodes());
        self.frames_rendered += 1;

        if let Some(fps) = self.fps.update(dt) {
            log::info!(
                "{fps:.1} fps, {} visible nodes, {} lights",
                self.draw_list.len(),
                scene.iter_active_lights().count()
            );
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
    }
}
