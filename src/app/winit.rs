//! Winit host
//!
//! Opens a window and drives a [`FrameLoop`] from `RedrawRequested`. Each
//! redraw requests the next one before running its frame, so the loop keeps
//! itself scheduled until the window closes, the stop handle fires, or a
//! frame fails.
//!
//! ```rust,ignore
//! let frame_loop = FrameLoop::new(stage, pipeline);
//! App::new().with_title("Kennel").run(frame_loop)?;
//! ```

use std::sync::Arc;

use ::winit::application::ApplicationHandler;
use ::winit::dpi::LogicalSize;
use ::winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use ::winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use ::winit::window::{Window, WindowId};

use crate::app::frame_loop::{FrameLoop, LoopState};
use crate::controls::PointerButton;
use crate::errors::{KennelError, Result};
use crate::render::RenderPipeline;

/// Window settings for the winit host.
pub struct App {
    title: String,
    width: f64,
    height: f64,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Kennel".into(),
            width: 1280.0,
            height: 720.0,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_inner_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Runs the event loop until the window closes. Returns the frame error
    /// that ended the loop, if any.
    pub fn run<P: RenderPipeline>(self, frame_loop: FrameLoop<P>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = Runner {
            app: self,
            window: None,
            frame_loop,
            error: None,
        };
        event_loop.run_app(&mut runner)?;

        match runner.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Runner<P: RenderPipeline> {
    app: App,
    window: Option<Arc<Window>>,
    frame_loop: FrameLoop<P>,
    error: Option<KennelError>,
}

fn translate_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl<P: RenderPipeline> ApplicationHandler for Runner<P> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.app.title.clone())
            .with_inner_size(LogicalSize::new(self.app.width, self.app.height));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                self.frame_loop.resize(size.width, size.height);
                window.request_redraw();
                self.window = Some(Arc::new(window));
                log::info!("Window created ({}x{})", size.width, size.height);
            }
            Err(err) => {
                log::error!("Failed to create window: {err}");
                self.error = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop_handle().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.frame_loop.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.frame_loop
                    .stage_mut()
                    .input_mut()
                    .handle_cursor_move(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = translate_button(button) {
                    self.frame_loop
                        .stage_mut()
                        .input_mut()
                        .handle_button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    // Pixel deltas are much larger than line steps.
                    MouseScrollDelta::PixelDelta(pos) => (pos.x as f32 * 0.1, pos.y as f32 * 0.1),
                };
                self.frame_loop.stage_mut().input_mut().handle_scroll(x, y);
            }
            WindowEvent::RedrawRequested => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                match self.frame_loop.tick() {
                    Ok(()) => {}
                    Err(KennelError::LoopStopped) => event_loop.exit(),
                    Err(err) => {
                        self.error = Some(err);
                        event_loop.exit();
                    }
                }
                if self.frame_loop.state() != LoopState::Running {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}
