//! egui overlay drawn over the scene in the windowed loop.

use crate::scene::Scene;
use egui_glow::EguiGlow;
use glutin::event::WindowEvent;
use glutin::event_loop::EventLoopWindowTarget;
use glutin::window::Window;
use std::os::raw::c_void;
use std::sync::Arc;

/// Owns the egui context and its glow painter.
///
/// The painter shares the scene's OpenGL context and must be dropped while
/// that context is still current.
pub struct Overlay {
    egui: EguiGlow,
}

impl Overlay {
    /// Builds the painter over the current context, loading its own
    /// function table through `loader`.
    pub fn new<E, F>(event_loop: &EventLoopWindowTarget<E>, loader: F) -> Self
        where F: FnMut(&str) -> *const c_void
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        let egui = EguiGlow::new(event_loop, Arc::new(gl), None);
        debug!("egui overlay ready");
        Self { egui }
    }

    /// Feeds a window event to egui.
    ///
    /// Returns `true` if egui claims the event, in which case it must not
    /// reach the scene. Cursor motion and window events are never claimed.
    pub fn on_event(&mut self, event: &WindowEvent) -> bool {
        let _ = self.egui.on_event(event);
        let ctx = &self.egui.egui_ctx;
        match *event {
            WindowEvent::KeyboardInput { .. } | WindowEvent::ReceivedCharacter(_) => {
                ctx.wants_keyboard_input()
            }
            WindowEvent::MouseInput { .. } | WindowEvent::MouseWheel { .. } => {
                ctx.wants_pointer_input() || ctx.is_pointer_over_area()
            }
            _ => false,
        }
    }

    /// Lays out the scene's window and paints it over the current frame.
    pub fn draw<S: Scene>(&mut self, window: &Window, scene: &mut S) {
        self.egui.run(window, |ctx| scene.ui(ctx));
        self.egui.paint(window);
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.egui.destroy();
    }
}
