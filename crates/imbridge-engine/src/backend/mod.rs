//! Backend capability set.
//!
//! A [`Backend`] bundles a draw bridge over some render device with a
//! clipboard. The [`Context`](crate::context::Context) is generic over it, so
//! the frame loop is identical for the wgpu window backend and the headless
//! recording backend used in tests and tooling.

mod clipboard;
pub mod headless;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use headless::HeadlessBackend;

use crate::draw::{BridgeError, DrawData, FrameStats};
use crate::font::AtlasImage;

pub trait Backend {
    /// Replays one frame of draw data.
    fn render_frame(&mut self, data: &DrawData) -> Result<FrameStats, BridgeError>;

    /// Current clipboard text, or `None` when the clipboard is unavailable.
    fn clipboard_text(&mut self) -> Option<String>;

    fn set_clipboard_text(&mut self, text: &str);

    /// Stores the font atlas; the texture is created on the next frame.
    fn set_font_atlas(&mut self, image: AtlasImage);

    /// Destroys every device object owned by the backend.
    fn release_device_objects(&mut self);
}
