use super::Vec2;

/// Clip rectangle carried by a draw command, in display pixels with a
/// top-left origin (`left`, `top`, `right`, `bottom`).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClipRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Where the device places the scissor origin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScissorOrigin {
    /// OpenGL-style: y grows upward from the bottom edge of the framebuffer.
    BottomLeft,
    /// wgpu/D3D-style: same orientation as the clip rectangle.
    TopLeft,
}

/// Scissor rectangle in device pixels, as handed to the GPU.
///
/// Values are signed and unclamped: a clip rectangle outside the display
/// produces an off-screen scissor, and the device decides how to clip.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ClipRect {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Clip rectangle covering a whole display of the given size.
    #[inline]
    pub const fn full(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    /// Scales all edges by the framebuffer scale (retina displays).
    #[inline]
    pub fn scaled(self, scale: Vec2) -> ClipRect {
        ClipRect::new(
            self.left * scale.x,
            self.top * scale.y,
            self.right * scale.x,
            self.bottom * scale.y,
        )
    }

    /// Intersection with `other`; degenerate results collapse to zero area.
    #[inline]
    pub fn intersect(self, other: ClipRect) -> ClipRect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        ClipRect::new(
            left,
            top,
            self.right.min(other.right).max(left),
            self.bottom.min(other.bottom).max(top),
        )
    }

    /// Converts to a device scissor rectangle.
    ///
    /// `framebuffer_height` is only consulted for [`ScissorOrigin::BottomLeft`],
    /// where `y = framebuffer_height - bottom`.
    pub fn to_scissor(self, framebuffer_height: f32, origin: ScissorOrigin) -> ScissorRect {
        let y = match origin {
            ScissorOrigin::BottomLeft => framebuffer_height - self.bottom,
            ScissorOrigin::TopLeft => self.top,
        };
        ScissorRect {
            x: self.left as i32,
            y: y as i32,
            width: self.width() as i32,
            height: self.height() as i32,
        }
    }
}

impl ScissorRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// True when the rectangle lies inside a `width` × `height` target.
    #[inline]
    pub fn fits_within(self, width: i32, height: i32) -> bool {
        // far off-screen clips can exceed i32 once offset and extent are summed
        let right = self.x as i64 + self.width as i64;
        let bottom = self.y as i64 + self.height as i64;
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && right <= width as i64
            && bottom <= height as i64
    }
}
