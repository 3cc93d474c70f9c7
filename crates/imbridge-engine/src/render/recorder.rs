use crate::coords::{ScissorRect, Vec2, Viewport};
use crate::draw::{DrawIdx, DrawVert, IDENTITY, Mat4, TextureId, display_projection};

/// Draw recorded during the frame, replayed in [`WgpuDevice::encode`](super::WgpuDevice::encode).
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct RecordedDraw {
    pub scissor: ScissorRect,
    pub texture: TextureId,
    pub first_index: u32,
    pub count: u32,
    pub base_vertex: i32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct PassState {
    projection: Mat4,
    scissor: ScissorRect,
    texture: TextureId,
}

impl Default for PassState {
    fn default() -> Self {
        Self {
            projection: IDENTITY,
            scissor: ScissorRect::default(),
            texture: TextureId::NONE,
        }
    }
}

/// CPU side of the wgpu device: one frame-wide vertex/index stream, the
/// draws into it, and the pass state with its save stack.
///
/// Batches are appended; each draw stores absolute index offsets and the
/// base vertex of its batch.
#[derive(Debug, Default)]
pub(crate) struct FrameRecorder {
    vertices: Vec<DrawVert>,
    indices: Vec<DrawIdx>,
    draws: Vec<RecordedDraw>,
    batch_vertex_base: i32,
    batch_index_base: u32,
    state: PassState,
    saved: Vec<PassState>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[DrawVert] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[DrawIdx] {
        &self.indices
    }

    #[inline]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Projection the recorded frame is drawn with.
    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.state.projection
    }

    /// Drops whatever was recorded but never encoded.
    pub fn discard(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draws.clear();
        self.batch_vertex_base = 0;
        self.batch_index_base = 0;
    }

    /// Starts a new frame over `display`. A previous frame that was never
    /// encoded (e.g. the surface was lost) is discarded.
    pub fn begin_frame(&mut self, display: Viewport, framebuffer_scale: Vec2) {
        self.discard();
        let fb = display.scaled(framebuffer_scale);
        self.state.projection = display_projection(display);
        self.state.scissor = ScissorRect::new(0, 0, fb.width as i32, fb.height as i32);
        self.state.texture = TextureId::NONE;
    }

    /// Pads the index stream to an even length; buffer writes must be 4-byte aligned.
    pub fn align_indices(&mut self) {
        if self.indices.len() % 2 == 1 {
            self.indices.push(0);
        }
    }

    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            // encode still needs the recorded frame's projection
            let projection = self.state.projection;
            self.state = state;
            self.state.projection = projection;
        }
    }

    pub fn push_batch(&mut self, vertices: &[DrawVert], indices: &[DrawIdx]) {
        self.batch_vertex_base = self.vertices.len() as i32;
        self.batch_index_base = self.indices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend_from_slice(indices);
    }

    pub fn set_scissor(&mut self, rect: ScissorRect) {
        self.state.scissor = rect;
    }

    pub fn bind_texture(&mut self, id: TextureId) {
        self.state.texture = id;
    }

    pub fn draw(&mut self, first_index: u32, count: u32) {
        self.draws.push(RecordedDraw {
            scissor: self.state.scissor,
            texture: self.state.texture,
            first_index: self.batch_index_base + first_index,
            count,
            base_vertex: self.batch_vertex_base,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: Viewport = Viewport::new(1024.0, 576.0);

    fn verts(n: usize) -> Vec<DrawVert> {
        vec![DrawVert::new([0.0; 2], [0.0; 2], 0xffff_ffff); n]
    }

    // ── batches ───────────────────────────────────────────────────────────

    #[test]
    fn second_batch_draws_are_offset_into_the_frame_stream() {
        let mut rec = FrameRecorder::new();
        rec.begin_frame(DISPLAY, Vec2::ONE);

        rec.push_batch(&verts(4), &[0, 1, 2, 0, 2, 3]);
        rec.bind_texture(TextureId(1));
        rec.draw(0, 6);

        rec.push_batch(&verts(8), &[0, 1, 2, 4, 5, 6, 4, 6, 7]);
        rec.set_scissor(ScissorRect::new(5, 5, 10, 10));
        rec.draw(0, 3);
        rec.bind_texture(TextureId(2));
        rec.draw(3, 6);

        assert_eq!(rec.vertices().len(), 12);
        assert_eq!(rec.indices().len(), 15);
        let draws = rec.draws();
        assert_eq!(draws.len(), 3);
        assert_eq!((draws[0].first_index, draws[0].count, draws[0].base_vertex), (0, 6, 0));
        assert_eq!((draws[1].first_index, draws[1].count, draws[1].base_vertex), (6, 3, 4));
        assert_eq!((draws[2].first_index, draws[2].count, draws[2].base_vertex), (9, 6, 4));
        assert_eq!(draws[1].texture, TextureId(1));
        assert_eq!(draws[1].scissor, ScissorRect::new(5, 5, 10, 10));
        assert_eq!(draws[2].texture, TextureId(2));
    }

    #[test]
    fn first_draw_uses_full_framebuffer_scissor() {
        let mut rec = FrameRecorder::new();
        rec.begin_frame(DISPLAY, Vec2::new(2.0, 2.0));
        rec.push_batch(&verts(3), &[0, 1, 2]);
        rec.draw(0, 3);
        assert_eq!(rec.draws()[0].scissor, ScissorRect::new(0, 0, 2048, 1152));
        assert_eq!(rec.draws()[0].texture, TextureId::NONE);
    }

    #[test]
    fn odd_index_count_is_padded() {
        let mut rec = FrameRecorder::new();
        rec.push_batch(&verts(3), &[0, 1, 2]);
        rec.align_indices();
        assert_eq!(rec.indices(), &[0, 1, 2, 0]);
        rec.align_indices();
        assert_eq!(rec.indices().len(), 4);
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn unencoded_frame_is_dropped_by_the_next_one() {
        let mut rec = FrameRecorder::new();
        rec.begin_frame(DISPLAY, Vec2::ONE);
        rec.push_batch(&verts(4), &[0, 1, 2, 0, 2, 3]);
        rec.draw(0, 6);

        // surface lost: nothing encoded, next frame starts
        rec.begin_frame(DISPLAY, Vec2::ONE);
        rec.push_batch(&verts(3), &[0, 1, 2]);
        rec.draw(0, 3);

        assert_eq!(rec.vertices().len(), 3);
        assert_eq!(rec.indices().len(), 3);
        assert_eq!(rec.draws().len(), 1);
        assert_eq!(rec.draws()[0].first_index, 0);
        assert_eq!(rec.draws()[0].base_vertex, 0);
    }

    #[test]
    fn discard_clears_streams() {
        let mut rec = FrameRecorder::new();
        rec.push_batch(&verts(4), &[0, 1, 2]);
        rec.draw(0, 3);
        rec.discard();
        assert!(rec.vertices().is_empty());
        assert!(rec.indices().is_empty());
        assert!(rec.draws().is_empty());

        rec.push_batch(&verts(3), &[0, 1, 2]);
        rec.draw(0, 3);
        assert_eq!(rec.draws()[0].base_vertex, 0);
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn restore_keeps_the_frame_projection() {
        let mut rec = FrameRecorder::new();
        rec.bind_texture(TextureId(9));
        rec.save();
        rec.begin_frame(DISPLAY, Vec2::ONE);
        rec.bind_texture(TextureId(1));
        rec.restore();

        assert_eq!(rec.projection(), display_projection(DISPLAY));
        rec.draw(0, 0);
        assert_eq!(rec.draws()[0].texture, TextureId(9));
        assert_eq!(rec.draws()[0].scissor, ScissorRect::default());
    }

    #[test]
    fn unmatched_restore_is_ignored() {
        let mut rec = FrameRecorder::new();
        rec.begin_frame(DISPLAY, Vec2::ONE);
        rec.bind_texture(TextureId(3));
        rec.restore();
        rec.draw(0, 0);
        assert_eq!(rec.draws()[0].texture, TextureId(3));
    }
}
