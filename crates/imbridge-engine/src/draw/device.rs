use std::ops::{Deref, DerefMut};

use crate::coords::{ScissorOrigin, ScissorRect, Vec2, Viewport};
use crate::font::AtlasImage;

use super::{DeviceError, DrawIdx, DrawVert, TextureId};

/// Column-major 4×4 matrix.
pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// `glOrtho`-equivalent projection.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = right - left;
    let tb = top - bottom;
    let fz = far - near;
    [
        [2.0 / rl, 0.0, 0.0, 0.0],
        [0.0, 2.0 / tb, 0.0, 0.0],
        [0.0, 0.0, -2.0 / fz, 0.0],
        [-(right + left) / rl, -(top + bottom) / tb, -(far + near) / fz, 1.0],
    ]
}

/// Projection mapping display pixels (top-left origin, +Y down) to clip space.
pub fn display_projection(display: Viewport) -> Mat4 {
    ortho(0.0, display.width, display.height, 0.0, -1.0, 1.0)
}

/// The fixed-function state the bridge changes while rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuState {
    pub blend: bool,
    pub depth_test: bool,
    pub cull_face: bool,
    pub scissor_test: bool,
    pub projection: Mat4,
    pub modelview: Mat4,
    pub texture: Option<TextureId>,
    pub vertex_array: bool,
    pub texcoord_array: bool,
    pub color_array: bool,
}

impl Default for GpuState {
    /// Typical 3D application state: depth test and culling on, no blending.
    fn default() -> Self {
        Self {
            blend: false,
            depth_test: true,
            cull_face: true,
            scissor_test: false,
            projection: IDENTITY,
            modelview: IDENTITY,
            texture: None,
            vertex_array: false,
            texcoord_array: false,
            color_array: false,
        }
    }
}

impl GpuState {
    /// Applies the GUI pass setup: blending on, culling and depth off, scissor
    /// on, client arrays enabled and an orthographic projection over `display`.
    pub fn apply_gui_setup(&mut self, display: Viewport) {
        self.blend = true;
        self.cull_face = false;
        self.depth_test = false;
        self.scissor_test = true;
        self.projection = display_projection(display);
        self.modelview = IDENTITY;
        self.vertex_array = true;
        self.texcoord_array = true;
        self.color_array = true;
    }
}

/// Graphics backend the [`DrawBridge`](super::DrawBridge) replays batches on.
///
/// Calls arrive in this order for every non-empty frame:
/// `save_state`, `setup_render_state`, then per batch `bind_vertex_data`
/// followed by `set_scissor`/`bind_texture`/`draw_indexed` triples and a
/// final `end_batch`, and at last `restore_state`.
pub trait RenderDevice {
    /// Orientation of the rectangles passed to [`set_scissor`](Self::set_scissor).
    const SCISSOR_ORIGIN: ScissorOrigin;

    fn create_texture(&mut self, image: &AtlasImage) -> Result<TextureId, DeviceError>;

    /// Destroying an unknown id is a no-op.
    fn destroy_texture(&mut self, id: TextureId);

    /// Pushes every piece of state that `setup_render_state` may change.
    fn save_state(&mut self);

    /// Pops the state pushed by the matching `save_state`.
    fn restore_state(&mut self);

    fn setup_render_state(&mut self, display: Viewport, framebuffer_scale: Vec2);

    fn bind_vertex_data(&mut self, vertices: &[DrawVert], indices: &[DrawIdx]);

    fn set_scissor(&mut self, rect: ScissorRect);

    fn bind_texture(&mut self, id: TextureId);

    /// Draws `count` indices starting at `first_index` of the bound batch.
    fn draw_indexed(&mut self, first_index: u32, count: u32);

    /// Flushes the current batch. Immediate-mode devices may ignore this.
    fn end_batch(&mut self) {}
}

/// Saves device state on creation and restores it on drop.
///
/// Restoration also happens when rendering unwinds, so a panicking callback
/// or a malformed batch never leaks GUI state into the host application.
pub struct StateGuard<'d, D: RenderDevice> {
    device: &'d mut D,
}

impl<'d, D: RenderDevice> StateGuard<'d, D> {
    pub fn new(device: &'d mut D) -> Self {
        device.save_state();
        Self { device }
    }
}

impl<D: RenderDevice> Deref for StateGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.device
    }
}

impl<D: RenderDevice> DerefMut for StateGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.device
    }
}

impl<D: RenderDevice> Drop for StateGuard<'_, D> {
    fn drop(&mut self) {
        self.device.restore_state();
    }
}
