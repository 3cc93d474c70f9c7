use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by the window runtime.
///
/// Input has already been forwarded to the window's reconciler when
/// `on_window_event` runs; the hook is for app-level reactions only.
pub trait App {
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called before a window and its GPU surface are torn down; release
    /// device objects here.
    fn on_close(&mut self, window_id: WindowId) {
        let _ = window_id;
    }
}
