use super::Vec2;

/// Display size in pixels.
///
/// The draw bridge uses this as the basis of the orthographic projection and
/// of the vertical flip applied to bottom-left-origin scissor rectangles.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Size in framebuffer pixels for the given framebuffer scale.
    #[inline]
    pub fn scaled(self, scale: Vec2) -> Viewport {
        Viewport::new(self.width * scale.x, self.height * scale.y)
    }
}
