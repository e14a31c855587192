/// Frame-rate meter fed with frame deltas.
///
/// Publishes a new reading once at least one second of frame time has
/// accumulated.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frame_count: u32,
    accumulated: f32,
    pub current_fps: f32,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame of `dt` seconds. Returns the new FPS when a
    /// one-second window completes.
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        self.frame_count += 1;
        self.accumulated += dt.max(0.0);

        if self.accumulated >= 1.0 {
            self.current_fps = self.frame_count as f32 / self.accumulated;
            self.accumulated = 0.0;
            self.frame_count = 0;
            return Some(self.current_fps);
        }

        None
    }
}
