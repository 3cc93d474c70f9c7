use super::{ClipRect, Vec2};

/// Axis-aligned rectangle in display pixels (top-left origin), origin + size form.
///
/// Widgets lay out with `Rect`; the draw path works with [`ClipRect`] (min/max form).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// Shrinks every edge by `by` (negative grows). Size never goes below zero.
    #[inline]
    pub fn inset(self, by: f32) -> Rect {
        Rect::new(
            self.origin.x + by,
            self.origin.y + by,
            (self.size.x - by * 2.0).max(0.0),
            (self.size.y - by * 2.0).max(0.0),
        )
    }

    /// Converts to the min/max clip form carried by draw commands.
    #[inline]
    pub fn to_clip(self) -> ClipRect {
        let max = self.max();
        ClipRect::new(self.origin.x, self.origin.y, max.x, max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn no_pointer_sentinel_is_never_contained() {
        assert!(!r(0.0, 0.0, 100.0, 100.0).contains(Vec2::NO_POINTER));
    }

    // ── conversion ────────────────────────────────────────────────────────

    #[test]
    fn to_clip_uses_min_max_edges() {
        let c = r(10.0, 20.0, 100.0, 200.0).to_clip();
        assert_eq!(c, ClipRect::new(10.0, 20.0, 110.0, 220.0));
    }

    #[test]
    fn inset_never_produces_negative_size() {
        let i = r(0.0, 0.0, 4.0, 4.0).inset(3.0);
        assert_eq!(i.size, Vec2::zero());
        assert!(i.is_empty());
    }
}
