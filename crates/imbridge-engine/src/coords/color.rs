/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Vertex colors travel as packed RGBA8 (see [`ColorRgba::to_packed`]); this type
/// is the editable form used by widgets and clear colors.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Packs into a `u32` with red in the lowest byte (RGBA8 in memory order).
    #[inline]
    pub fn to_packed(self) -> u32 {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
        q(self.r) | (q(self.g) << 8) | (q(self.b) << 16) | (q(self.a) << 24)
    }

    /// Inverse of [`to_packed`](Self::to_packed).
    #[inline]
    pub fn from_packed(c: u32) -> Self {
        let f = |shift: u32| ((c >> shift) & 0xFF) as f32 / 255.0;
        Self::new(f(0), f(8), f(16), f(24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_puts_red_in_low_byte() {
        assert_eq!(ColorRgba::new(1.0, 0.0, 0.0, 0.0).to_packed(), 0x0000_00FF);
        assert_eq!(ColorRgba::new(0.0, 0.0, 0.0, 1.0).to_packed(), 0xFF00_0000);
    }

    #[test]
    fn packed_clamps_out_of_range_channels() {
        assert_eq!(ColorRgba::new(2.0, -1.0, 0.0, 1.0).to_packed(), 0xFF00_00FF);
    }

    #[test]
    fn from_packed_recovers_byte_values() {
        let c = ColorRgba::from_packed(0x80FF_0000);
        assert_eq!(c.b, 1.0);
        assert_eq!(c.r, 0.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }
}
