/// Row-based ("shelf") rectangle packer for a fixed-width atlas.
///
/// Rectangles are placed left to right; when one does not fit horizontally a
/// new shelf starts below the tallest rectangle of the current one.
#[derive(Debug, Clone)]
pub(crate) struct ShelfPacker {
    width: u32,
    max_height: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub(crate) fn new(width: u32, max_height: u32, padding: u32) -> Self {
        Self {
            width,
            max_height,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
        }
    }

    /// Returns the top-left corner for a `w` × `h` rectangle, or `None` when
    /// the atlas is full.
    pub(crate) fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * self.padding > self.width {
            return None;
        }

        if self.cursor_x + w + self.padding > self.width {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_y + h + self.padding > self.max_height {
            return None;
        }

        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }

    /// Height actually covered so far, including trailing padding.
    pub(crate) fn used_height(&self) -> u32 {
        self.cursor_y + self.row_height + self.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_left_to_right_then_wraps() {
        let mut p = ShelfPacker::new(16, 64, 1);
        assert_eq!(p.place(6, 4), Some((1, 1)));
        assert_eq!(p.place(6, 8), Some((8, 1)));
        // 15 + 6 + 1 > 16: next shelf starts below the 8-pixel glyph
        assert_eq!(p.place(6, 2), Some((1, 10)));
        assert_eq!(p.used_height(), 13);
    }

    #[test]
    fn rejects_when_height_exhausted() {
        let mut p = ShelfPacker::new(8, 8, 1);
        assert!(p.place(6, 6).is_some());
        assert_eq!(p.place(6, 6), None);
    }

    #[test]
    fn rejects_rect_wider_than_atlas() {
        let mut p = ShelfPacker::new(8, 64, 1);
        assert_eq!(p.place(7, 1), None);
    }
}
