use glam::Vec2;
use rustc_hash::FxHashSet;

/// Platform independent pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer state accumulated between two frames.
///
/// Hosts feed events in; [`end_frame`](Self::end_frame) clears the per-frame
/// deltas once the controls have consumed them.
#[derive(Default, Debug, Clone)]
pub struct Input {
    pub cursor_position: Vec2,
    pub cursor_delta: Vec2,
    pub scroll_delta: Vec2,
    pub screen_size: Vec2,
    buttons: FxHashSet<PointerButton>,
    has_cursor: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        // The first event only establishes the position.
        if self.has_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.has_cursor = true;
    }

    pub fn handle_button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Positive `y` scrolls away from the user (zoom in).
    pub fn handle_scroll(&mut self, x: f32, y: f32) {
        self.scroll_delta += Vec2::new(x, y);
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }
}
