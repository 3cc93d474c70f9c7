//! Headless backend: a fixed-function-style device that records every call.

use std::collections::HashMap;

use crate::coords::{ScissorOrigin, ScissorRect, Vec2, Viewport};
use crate::draw::{
    BridgeError, DeviceError, DrawBridge, DrawData, DrawIdx, DrawVert, FrameStats, GpuState,
    RenderDevice, TextureId,
};
use crate::font::{AtlasImage, PixelFormat};

use super::{Backend, Clipboard, MemoryClipboard};

/// One call received by a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateTexture {
        id: TextureId,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    DestroyTexture(TextureId),
    SaveState,
    RestoreState,
    SetupRenderState {
        display: Viewport,
        framebuffer_scale: Vec2,
    },
    BindVertexData {
        vertices: usize,
        indices: usize,
    },
    SetScissor(ScissorRect),
    BindTexture(TextureId),
    DrawIndexed {
        first_index: u32,
        count: u32,
    },
    EndBatch,
}

/// Render device that tracks a [`GpuState`] with a save stack, like the GL
/// fixed pipeline does with `glPushAttrib`, and logs every call.
///
/// Scissor rectangles use the bottom-left origin.
#[derive(Debug)]
pub struct RecordingDevice {
    state: GpuState,
    saved: Vec<GpuState>,
    calls: Vec<DeviceCall>,
    textures: HashMap<TextureId, (u32, u32)>,
    next_texture: u64,
    max_texture_size: u32,
    fail_next_texture: Option<DeviceError>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::with_max_texture_size(8192)
    }

    pub fn with_max_texture_size(max: u32) -> Self {
        Self {
            state: GpuState::default(),
            saved: Vec::new(),
            calls: Vec::new(),
            textures: HashMap::new(),
            next_texture: 1,
            max_texture_size: max,
            fail_next_texture: None,
        }
    }

    /// Makes the next `create_texture` fail with `err`.
    pub fn fail_next_texture(&mut self, err: DeviceError) {
        self.fail_next_texture = Some(err);
    }

    #[inline]
    pub fn state(&self) -> &GpuState {
        &self.state
    }

    /// Lets tests simulate host state that must survive a GUI frame.
    #[inline]
    pub fn state_mut(&mut self) -> &mut GpuState {
        &mut self.state
    }

    #[inline]
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// `(first_index, count)` of every recorded draw.
    pub fn draws(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.calls.iter().filter_map(|c| match *c {
            DeviceCall::DrawIndexed { first_index, count } => Some((first_index, count)),
            _ => None,
        })
    }

    #[inline]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn has_texture(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Number of unmatched `save_state` calls.
    #[inline]
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDevice for RecordingDevice {
    const SCISSOR_ORIGIN: ScissorOrigin = ScissorOrigin::BottomLeft;

    fn create_texture(&mut self, image: &AtlasImage) -> Result<TextureId, DeviceError> {
        image.check()?;
        if image.width > self.max_texture_size || image.height > self.max_texture_size {
            return Err(DeviceError::TextureTooLarge {
                width: image.width,
                height: image.height,
                max: self.max_texture_size,
            });
        }
        if let Some(err) = self.fail_next_texture.take() {
            return Err(err);
        }

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, (image.width, image.height));
        self.calls.push(DeviceCall::CreateTexture {
            id,
            width: image.width,
            height: image.height,
            format: image.format,
        });
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            if self.state.texture == Some(id) {
                self.state.texture = None;
            }
            self.calls.push(DeviceCall::DestroyTexture(id));
        }
    }

    fn save_state(&mut self) {
        self.saved.push(self.state.clone());
        self.calls.push(DeviceCall::SaveState);
    }

    fn restore_state(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => log::warn!("restore_state without matching save_state"),
        }
        self.calls.push(DeviceCall::RestoreState);
    }

    fn setup_render_state(&mut self, display: Viewport, framebuffer_scale: Vec2) {
        self.state.apply_gui_setup(display);
        self.calls.push(DeviceCall::SetupRenderState {
            display,
            framebuffer_scale,
        });
    }

    fn bind_vertex_data(&mut self, vertices: &[DrawVert], indices: &[DrawIdx]) {
        self.calls.push(DeviceCall::BindVertexData {
            vertices: vertices.len(),
            indices: indices.len(),
        });
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.calls.push(DeviceCall::SetScissor(rect));
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.state.texture = Some(id);
        self.calls.push(DeviceCall::BindTexture(id));
    }

    fn draw_indexed(&mut self, first_index: u32, count: u32) {
        self.calls.push(DeviceCall::DrawIndexed { first_index, count });
    }

    fn end_batch(&mut self) {
        self.calls.push(DeviceCall::EndBatch);
    }
}

/// [`Backend`] over a [`RecordingDevice`] and a [`MemoryClipboard`].
pub struct HeadlessBackend {
    bridge: DrawBridge<RecordingDevice>,
    clipboard: MemoryClipboard,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            bridge: DrawBridge::new(RecordingDevice::new()),
            clipboard: MemoryClipboard::new(),
        }
    }

    #[inline]
    pub fn bridge(&self) -> &DrawBridge<RecordingDevice> {
        &self.bridge
    }

    #[inline]
    pub fn bridge_mut(&mut self) -> &mut DrawBridge<RecordingDevice> {
        &mut self.bridge
    }

    #[inline]
    pub fn device(&self) -> &RecordingDevice {
        self.bridge.device()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HeadlessBackend {
    fn render_frame(&mut self, data: &DrawData) -> Result<FrameStats, BridgeError> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_restore_nest() {
        let mut dev = RecordingDevice::new();
        dev.save_state();
        dev.setup_render_state(Viewport::new(10.0, 10.0), Vec2::ONE);
        dev.save_state();
        dev.bind_texture(TextureId(5));
        dev.restore_state();
        assert!(dev.state().blend);
        assert_eq!(dev.state().texture, None);
        dev.restore_state();
        assert_eq!(dev.state(), &GpuState::default());
        assert_eq!(dev.save_depth(), 0);
    }

    #[test]
    fn host_state_survives_gui_setup() {
        let mut dev = RecordingDevice::new();
        dev.state_mut().texture = Some(TextureId(77));
        dev.state_mut().blend = true;
        let host = dev.state().clone();

        dev.save_state();
        dev.setup_render_state(Viewport::new(10.0, 10.0), Vec2::ONE);
        dev.bind_texture(TextureId(1));
        dev.restore_state();
        assert_eq!(dev.state(), &host);
    }

    #[test]
    fn destroying_unknown_texture_records_nothing() {
        let mut dev = RecordingDevice::new();
        dev.destroy_texture(TextureId(99));
        assert!(dev.calls().is_empty());
    }

    #[test]
    fn malformed_image_is_rejected_before_injection() {
        let mut dev = RecordingDevice::new();
        dev.fail_next_texture(DeviceError::Backend("x".into()));
        let bad = AtlasImage {
            width: 2,
            height: 2,
            format: PixelFormat::Alpha8,
            pixels: vec![0; 3],
        };
        assert!(matches!(
            dev.create_texture(&bad),
            Err(DeviceError::PixelSizeMismatch { .. })
        ));
        // injected failure is still pending
        assert!(dev.create_texture(&AtlasImage::filled(2, 2, PixelFormat::Alpha8, 0)).is_err());
        assert!(dev.create_texture(&AtlasImage::filled(2, 2, PixelFormat::Alpha8, 0)).is_ok());
    }

    // ── backend ───────────────────────────────────────────────────────────

    #[test]
    fn headless_clipboard_is_unavailable_until_set() {
        let mut backend = HeadlessBackend::new();
        assert_eq!(backend.clipboard_text(), None);
        backend.set_clipboard_text("hello");
        assert_eq!(backend.clipboard_text().as_deref(), Some("hello"));
    }

    #[test]
    fn release_device_objects_destroys_atlas() {
        let mut backend = HeadlessBackend::new();
        backend.set_font_atlas(AtlasImage::filled(8, 8, PixelFormat::Alpha8, 0));
        backend
            .render_frame(&DrawData::new(Viewport::new(8.0, 8.0), Vec2::ONE))
            .unwrap();
        assert_eq!(backend.device().live_textures(), 1);
        backend.release_device_objects();
        assert_eq!(backend.device().live_textures(), 0);
    }
}
