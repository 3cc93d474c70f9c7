use crate::backend::{Backend, Clipboard, SystemClipboard};
use crate::draw::{BridgeError, DrawBridge, DrawData, FrameStats};
use crate::font::AtlasImage;

use super::{RenderCtx, RenderTarget, WgpuDevice};

/// [`Backend`] for a winit window rendered with wgpu.
///
/// `render_frame` only records; call [`encode`](Self::encode) with the
/// frame's encoder and color view to emit the GUI render pass.
pub struct WgpuBackend {
    bridge: DrawBridge<WgpuDevice>,
    clipboard: SystemClipboard,
}

impl WgpuBackend {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        Self {
            bridge: DrawBridge::new(WgpuDevice::new(ctx)),
            clipboard: SystemClipboard::new(),
        }
    }

    #[inline]
    pub fn bridge(&self) -> &DrawBridge<WgpuDevice> {
        &self.bridge
    }

    #[inline]
    pub fn bridge_mut(&mut self) -> &mut DrawBridge<WgpuDevice> {
        &mut self.bridge
    }

    /// Replays the recorded frame into `target`.
    pub fn encode(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.bridge.device_mut().encode(ctx.surface_format, target);
    }
}

impl Backend for WgpuBackend {
    fn render_frame(&mut self, data: &DrawData) -> Result<FrameStats, BridgeError> {
        // a frame recorded earlier but never encoded must not be replayed
        self.bridge.device_mut().discard_frame();
        self.bridge.render_frame(data)
    }

    fn clipboard_text(&mut self) -> Option<String> {
        self.clipboard.get_text()
    }

    fn set_clipboard_text(&mut self, text: &str) {
        self.clipboard.set_text(text);
    }

    fn set_font_atlas(&mut self, image: AtlasImage) {
        self.bridge.set_font_atlas(image);
    }

    fn release_device_objects(&mut self) {
        self.bridge.release_font_atlas();
    }
}
