use crate::draw::DeviceError;

/// Pixel layout of an [`AtlasImage`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    /// One coverage byte per pixel.
    Alpha8,
    /// Four bytes per pixel, `r g b a` order.
    Rgba32,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Alpha8 => 1,
            PixelFormat::Rgba32 => 4,
        }
    }
}

/// CPU-side font atlas pixels, as produced by the GUI's font baker.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl AtlasImage {
    /// Wraps existing pixel data, rejecting zero sizes and mismatched lengths.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, DeviceError> {
        let image = Self { width, height, format, pixels };
        image.check()?;
        Ok(image)
    }

    /// Image where every byte is `value`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: u8) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            pixels: vec![value; len],
        }
    }

    #[inline]
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * self.format.bytes_per_pixel() as u32
    }

    /// Verifies that the image can be turned into a texture.
    pub fn check(&self) -> Result<(), DeviceError> {
        if self.width == 0 || self.height == 0 {
            return Err(DeviceError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.pixels.len() != self.expected_len() {
            return Err(DeviceError::PixelSizeMismatch {
                expected: self.expected_len(),
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Expands coverage into white RGBA texels; RGBA images are cloned.
    pub fn to_rgba32(&self) -> AtlasImage {
        match self.format {
            PixelFormat::Rgba32 => self.clone(),
            PixelFormat::Alpha8 => {
                let mut pixels = Vec::with_capacity(self.pixels.len() * 4);
                for &a in &self.pixels {
                    pixels.extend_from_slice(&[255, 255, 255, a]);
                }
                AtlasImage {
                    width: self.width,
                    height: self.height,
                    format: PixelFormat::Rgba32,
                    pixels,
                }
            }
        }
    }
}

impl std::fmt::Debug for AtlasImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_size() {
        let err = AtlasImage::new(0, 4, PixelFormat::Alpha8, vec![]).unwrap_err();
        assert!(matches!(err, DeviceError::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn new_rejects_short_pixel_buffer() {
        let err = AtlasImage::new(2, 2, PixelFormat::Rgba32, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::PixelSizeMismatch { expected: 16, actual: 15 }
        ));
    }

    #[test]
    fn alpha8_expands_to_white_rgba() {
        let img = AtlasImage::new(2, 1, PixelFormat::Alpha8, vec![0, 200]).unwrap();
        let rgba = img.to_rgba32();
        assert_eq!(rgba.format, PixelFormat::Rgba32);
        assert_eq!(rgba.pixels, vec![255, 255, 255, 0, 255, 255, 255, 200]);
        assert!(rgba.check().is_ok());
    }

    #[test]
    fn bytes_per_row_accounts_for_format() {
        assert_eq!(AtlasImage::filled(256, 1, PixelFormat::Alpha8, 0).bytes_per_row(), 256);
        assert_eq!(AtlasImage::filled(256, 1, PixelFormat::Rgba32, 0).bytes_per_row(), 1024);
    }
}
