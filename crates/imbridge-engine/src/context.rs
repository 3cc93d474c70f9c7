//! Explicit backend context.
//!
//! One [`Context`] per GUI instance replaces process-wide backend state: it
//! owns the input reconciler, the frame clock and the [`Backend`].

use std::sync::Arc;

use crate::backend::Backend;
use crate::coords::{Vec2, Viewport};
use crate::draw::{BridgeError, DrawData, FrameStats};
use crate::font::AtlasImage;
use crate::input::{FrameInput, FrameParams, InputPolicy, InputReconciler, PointerPoll};
use crate::time::FrameClock;

pub struct Context<B: Backend> {
    input: Arc<InputReconciler>,
    backend: B,
    clock: FrameClock,
    frames: u64,
}

impl<B: Backend> Context<B> {
    pub fn new(policy: InputPolicy, backend: B) -> Self {
        Self::with_input(Arc::new(InputReconciler::new(policy)), backend)
    }

    /// Uses an existing reconciler, e.g. one the window runtime already feeds.
    pub fn with_input(input: Arc<InputReconciler>, backend: B) -> Self {
        Self {
            input,
            backend,
            clock: FrameClock::new(),
            frames: 0,
        }
    }

    /// Event sinks. Clone the `Arc` to feed input from another thread.
    #[inline]
    pub fn input(&self) -> &Arc<InputReconciler> {
        &self.input
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Frames started so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Starts a frame: ticks the clock and folds pending input into a snapshot.
    pub fn new_frame<P>(&mut self, poll: &P, display: Viewport, framebuffer_scale: Vec2) -> FrameInput
    where
        P: PointerPoll + ?Sized,
    {
        let dt = self.clock.tick().dt;
        self.frames += 1;
        self.input.begin_frame(
            poll,
            FrameParams {
                display_size: display,
                framebuffer_scale,
                delta_time: dt,
            },
        )
    }

    /// Replays the frame's draw data on the backend.
    pub fn render(&mut self, data: &DrawData) -> Result<FrameStats, BridgeError> {
        self.backend.render_frame(data)
    }

    /// Whether the GUI currently has a focused text field; gates char input.
    pub fn set_wants_text_input(&self, wants: bool) {
        self.input.set_wants_text_input(wants);
    }

    pub fn set_font_atlas(&mut self, image: AtlasImage) {
        self.backend.set_font_atlas(image);
    }

    pub fn clipboard_text(&mut self) -> Option<String> {
        self.backend.clipboard_text()
    }

    pub fn set_clipboard_text(&mut self, text: &str) {
        self.backend.set_clipboard_text(text);
    }

    /// Releases device objects; the context can be dropped afterwards.
    pub fn shutdown(&mut self) {
        self.backend.release_device_objects();
        log::debug!("context shut down after {} frames", self.frames);
    }
}
