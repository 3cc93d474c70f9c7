use imbridge_engine::coords::{ClipRect, ColorRgba, Rect, Vec2};
use imbridge_engine::draw::{DrawBatch, DrawCmd, DrawIdx, DrawVert, TextureId};
use imbridge_engine::font::FontAtlas;

/// Vertices one batch can address with 16-bit indices.
const MAX_VERTICES: usize = DrawIdx::MAX as usize + 1;

/// Handle to a quad already emitted, so its rect can be patched once the
/// final size is known (window backgrounds are sized after their content).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct QuadId(usize);

/// Geometry builder for one [`DrawBatch`].
///
/// Every quad lands in the command matching the current clip rect and
/// texture; a new [`DrawCmd`] starts only when either changes.
pub struct Painter<'a> {
    atlas: &'a FontAtlas,
    batch: DrawBatch,
    clip_stack: Vec<ClipRect>,
    texture: TextureId,
}

impl<'a> Painter<'a> {
    pub fn new(atlas: &'a FontAtlas, base_clip: ClipRect) -> Self {
        Self {
            atlas,
            batch: DrawBatch::new(),
            clip_stack: vec![base_clip],
            texture: TextureId::NONE,
        }
    }

    #[inline]
    pub fn atlas(&self) -> &'a FontAtlas {
        self.atlas
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Current clip rect: the intersection of every pushed rect.
    #[inline]
    pub fn clip(&self) -> ClipRect {
        self.clip_stack.last().copied().unwrap_or_default()
    }

    /// Begin a scissor region. Must be paired with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        let next = rect.to_clip().intersect(self.clip());
        self.clip_stack.push(next);
    }

    /// End the most recent scissor region. The base clip is never popped.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.len() > 1 {
            self.clip_stack.pop();
        } else {
            log::warn!("pop_clip without matching push_clip");
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Solid rectangle, sampled from the atlas' white texel.
    ///
    /// Returns `None` when the batch is full and the quad was dropped.
    pub fn fill_rect(&mut self, rect: Rect, color: ColorRgba) -> Option<QuadId> {
        let uv = self.atlas.white_uv();
        self.quad(rect.min(), rect.max(), uv, uv, color.to_packed())
    }

    /// One-pixel-style outline made of four fills.
    pub fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: ColorRgba) {
        let (min, max) = (rect.min(), rect.max());
        let t = thickness.min(rect.size.x * 0.5).min(rect.size.y * 0.5);
        self.fill_rect(Rect::new(min.x, min.y, rect.size.x, t), color);
        self.fill_rect(Rect::new(min.x, max.y - t, rect.size.x, t), color);
        self.fill_rect(Rect::new(min.x, min.y + t, t, rect.size.y - 2.0 * t), color);
        self.fill_rect(Rect::new(max.x - t, min.y + t, t, rect.size.y - 2.0 * t), color);
    }

    /// Textured rectangle from another texture; starts a new command.
    pub fn image(&mut self, rect: Rect, texture: TextureId, uv_min: [f32; 2], uv_max: [f32; 2], tint: ColorRgba) {
        let prev = std::mem::replace(&mut self.texture, texture);
        self.quad(rect.min(), rect.max(), uv_min, uv_max, tint.to_packed());
        self.texture = prev;
    }

    /// Single line of text with its top-left at `origin`. Returns the pen advance.
    ///
    /// Characters missing from the atlas are drawn as placeholder boxes.
    pub fn text(&mut self, origin: Vec2, text: &str, color: ColorRgba) -> f32 {
        let atlas = self.atlas;
        let col = color.to_packed();
        let mut pen = origin.x;

        for ch in text.chars() {
            match atlas.glyph(ch) {
                Some(g) => {
                    if g.size.x > 0.0 && g.size.y > 0.0 {
                        let min = Vec2::new(pen + g.offset.x, origin.y + g.offset.y);
                        self.quad(min, min + g.size, g.uv_min, g.uv_max, col);
                    }
                    pen += g.advance;
                }
                None => {
                    let adv = atlas.advance(ch);
                    if !ch.is_whitespace() {
                        let h = atlas.pixel_size() * 0.7;
                        let top = origin.y + (atlas.line_height() - h) * 0.5;
                        let boxed = Rect::new(pen + 1.0, top, (adv - 2.0).max(1.0), h);
                        self.stroke_rect(boxed, 1.0, color);
                    }
                    pen += adv;
                }
            }
        }

        pen - origin.x
    }

    /// Moves an emitted quad to `rect`.
    pub fn set_quad_rect(&mut self, id: QuadId, rect: Rect) {
        let Some(v) = self.batch.vertices.get_mut(id.0..id.0 + 4) else {
            return;
        };
        let (min, max) = (rect.min(), rect.max());
        v[0].pos = [min.x, min.y];
        v[1].pos = [max.x, min.y];
        v[2].pos = [max.x, max.y];
        v[3].pos = [min.x, max.y];
    }

    pub fn finish(self) -> DrawBatch {
        self.batch
    }

    // ── internal ──────────────────────────────────────────────────────────

    fn quad(&mut self, min: Vec2, max: Vec2, uv_min: [f32; 2], uv_max: [f32; 2], col: u32) -> Option<QuadId> {
        let base = self.batch.vertices.len();
        if base + 4 > MAX_VERTICES {
            log::trace!("batch full; dropping quad");
            return None;
        }

        self.batch.vertices.extend_from_slice(&[
            DrawVert::new([min.x, min.y], [uv_min[0], uv_min[1]], col),
            DrawVert::new([max.x, min.y], [uv_max[0], uv_min[1]], col),
            DrawVert::new([max.x, max.y], [uv_max[0], uv_max[1]], col),
            DrawVert::new([min.x, max.y], [uv_min[0], uv_max[1]], col),
        ]);

        let b = base as DrawIdx;
        self.batch
            .indices
            .extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);

        self.current_cmd().elem_count += 6;
        Some(QuadId(base))
    }

    fn current_cmd(&mut self) -> &mut DrawCmd {
        let clip = self.clip();
        let texture = self.texture;
        let reuse = self.batch.commands.last().is_some_and(|c| {
            c.callback.is_none() && c.clip_rect == clip && c.texture == texture
        });
        if !reuse {
            self.batch.commands.push(DrawCmd::new(0, clip, texture));
        }
        let last = self.batch.commands.len() - 1;
        &mut self.batch.commands[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painter(atlas: &FontAtlas) -> Painter<'_> {
        Painter::new(atlas, ClipRect::full(800.0, 600.0))
    }

    // ── commands ──────────────────────────────────────────────────────────

    #[test]
    fn quads_under_same_clip_share_one_command() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ColorRgba::white());
        p.fill_rect(Rect::new(20.0, 0.0, 10.0, 10.0), ColorRgba::white());
        let batch = p.finish();

        assert_eq!(batch.commands.len(), 1);
        assert_eq!(batch.commands[0].elem_count, 12);
        assert_eq!(batch.vertices.len(), 8);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn clip_change_starts_new_command() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ColorRgba::white());
        p.push_clip(Rect::new(5.0, 5.0, 50.0, 50.0));
        p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ColorRgba::white());
        p.pop_clip();
        p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), ColorRgba::white());
        let batch = p.finish();

        let clips: Vec<ClipRect> = batch.commands.iter().map(|c| c.clip_rect).collect();
        assert_eq!(
            clips,
            vec![
                ClipRect::full(800.0, 600.0),
                ClipRect::new(5.0, 5.0, 55.0, 55.0),
                ClipRect::full(800.0, 600.0),
            ]
        );
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn texture_change_starts_new_command_and_reverts() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ColorRgba::white());
        p.image(Rect::new(0.0, 0.0, 4.0, 4.0), TextureId(9), [0.0; 2], [1.0; 2], ColorRgba::white());
        p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ColorRgba::white());
        let batch = p.finish();

        let tex: Vec<TextureId> = batch.commands.iter().map(|c| c.texture).collect();
        assert_eq!(tex, vec![TextureId::NONE, TextureId(9), TextureId::NONE]);
    }

    #[test]
    fn nested_clips_intersect() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        p.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        p.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(p.clip(), ClipRect::new(50.0, 50.0, 100.0, 100.0));
        p.pop_clip();
        p.pop_clip();
        p.pop_clip(); // extra pop keeps the base clip
        assert_eq!(p.clip(), ClipRect::full(800.0, 600.0));
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn patched_quad_moves_all_corners() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        let q = p.fill_rect(Rect::default(), ColorRgba::white()).unwrap();
        p.set_quad_rect(q, Rect::new(10.0, 20.0, 30.0, 40.0));
        let batch = p.finish();

        let pos: Vec<[f32; 2]> = batch.vertices.iter().map(|v| v.pos).collect();
        assert_eq!(pos, vec![[10.0, 20.0], [40.0, 20.0], [40.0, 60.0], [10.0, 60.0]]);
    }

    #[test]
    fn fills_sample_the_white_texel() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        p.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
        let batch = p.finish();
        assert!(batch.vertices.iter().all(|v| v.uv == atlas.white_uv()));
        assert!(batch.vertices.iter().all(|v| v.col == 0xFF00_00FF));
    }

    #[test]
    fn missing_glyphs_become_boxes_and_spaces_advance_only() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        let w = p.text(Vec2::zero(), "a b", ColorRgba::white());
        let batch = p.finish();

        assert_eq!(w, atlas.measure("a b").x);
        // two outlined boxes, four quads each
        assert_eq!(batch.vertices.len(), 2 * 4 * 4);
    }

    #[test]
    fn full_batch_drops_quads_without_breaking_partition() {
        let atlas = FontAtlas::solid_only();
        let mut p = painter(&atlas);
        let mut last = None;
        for _ in 0..(MAX_VERTICES / 4) {
            last = p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ColorRgba::white());
        }
        assert!(last.is_some());
        for _ in 0..3 {
            assert_eq!(p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), ColorRgba::white()), None);
        }

        // quads that made it in can still be patched
        let kept = last.unwrap();
        p.set_quad_rect(kept, Rect::new(5.0, 5.0, 2.0, 2.0));
        let batch = p.finish();
        assert_eq!(batch.vertices[MAX_VERTICES - 4].pos, [5.0, 5.0]);
        assert_eq!(batch.vertices.len(), MAX_VERTICES);
        assert!(batch.validate().is_ok());
    }
}
