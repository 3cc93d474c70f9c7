use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::coords::Vec2;

use super::image::{AtlasImage, PixelFormat};
use super::packer::ShelfPacker;

/// Error returned when baking a [`FontAtlas`].
#[derive(Debug, thiserror::Error)]
pub enum FontAtlasError {
    #[error("font load error: {0}")]
    Parse(String),

    #[error("glyphs do not fit in a {width}x{max_height} atlas")]
    Full { width: u32, max_height: u32 },
}

/// Baking parameters.
#[derive(Debug, Clone)]
pub struct FontAtlasConfig {
    /// Rasterization size in pixels.
    pub pixel_size: f32,
    /// Atlas width; height grows to the next power of two that fits.
    pub width: u32,
    pub max_height: u32,
    /// Empty pixels around each glyph, so linear sampling never bleeds.
    pub padding: u32,
    pub chars: RangeInclusive<char>,
}

impl Default for FontAtlasConfig {
    fn default() -> Self {
        Self {
            pixel_size: 13.0,
            width: 512,
            max_height: 4096,
            padding: 1,
            chars: ' '..='~',
        }
    }
}

/// Placement of one baked glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Bitmap offset from the pen position, +Y down, relative to the line top.
    pub offset: Vec2,
    /// Bitmap size in pixels; zero for whitespace.
    pub size: Vec2,
    pub advance: f32,
}

/// Alpha8 font atlas with a glyph table and a solid white texel.
///
/// The white texel lets untextured fills share the atlas texture, so a whole
/// overlay can be drawn with a single texture bind.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    image: AtlasImage,
    glyphs: HashMap<char, Glyph>,
    white_uv: [f32; 2],
    pixel_size: f32,
    line_height: f32,
}

const WHITE_BLOCK: u32 = 2;

impl FontAtlas {
    /// Parses a TrueType/OpenType font and bakes `config.chars`.
    pub fn from_font_bytes(bytes: &[u8], config: &FontAtlasConfig) -> Result<Self, FontAtlasError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontAtlasError::Parse(e.to_string()))?;
        Self::from_font(&font, config)
    }

    pub fn from_font(font: &fontdue::Font, config: &FontAtlasConfig) -> Result<Self, FontAtlasError> {
        let px = config.pixel_size;
        let full = || FontAtlasError::Full {
            width: config.width,
            max_height: config.max_height,
        };

        let (ascent, line_height) = font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.new_line_size))
            .unwrap_or((px, px * 1.2));

        let mut packer = ShelfPacker::new(config.width, config.max_height, config.padding);
        let white_pos = packer.place(WHITE_BLOCK, WHITE_BLOCK).ok_or_else(full)?;

        struct Placed {
            ch: char,
            pos: (u32, u32),
            metrics: fontdue::Metrics,
            bitmap: Vec<u8>,
        }

        let mut placed = Vec::new();
        for ch in config.chars.clone() {
            let (metrics, bitmap) = font.rasterize(ch, px);
            let pos = if metrics.width == 0 || metrics.height == 0 {
                (0, 0)
            } else {
                packer
                    .place(metrics.width as u32, metrics.height as u32)
                    .ok_or_else(full)?
            };
            placed.push(Placed { ch, pos, metrics, bitmap });
        }

        let height = packer.used_height().next_power_of_two().min(config.max_height);
        let mut image = AtlasImage::filled(config.width, height, PixelFormat::Alpha8, 0);
        blit_white(&mut image, white_pos);

        let (aw, ah) = (config.width as f32, height as f32);
        let mut glyphs = HashMap::with_capacity(placed.len());
        for p in placed {
            let (w, h) = (p.metrics.width as u32, p.metrics.height as u32);
            if w > 0 && h > 0 {
                blit_alpha(&mut image, p.pos, w, &p.bitmap);
            }
            let (gx, gy) = (p.pos.0 as f32, p.pos.1 as f32);
            glyphs.insert(
                p.ch,
                Glyph {
                    uv_min: [gx / aw, gy / ah],
                    uv_max: [(gx + w as f32) / aw, (gy + h as f32) / ah],
                    offset: Vec2::new(
                        p.metrics.xmin as f32,
                        ascent - (p.metrics.ymin as f32 + h as f32),
                    ),
                    size: Vec2::new(w as f32, h as f32),
                    advance: p.metrics.advance_width,
                },
            );
        }

        log::debug!(
            "baked font atlas {}x{} with {} glyphs at {px}px",
            config.width,
            height,
            glyphs.len()
        );

        Ok(Self {
            image,
            glyphs,
            white_uv: white_uv(white_pos, aw, ah),
            pixel_size: px,
            line_height,
        })
    }

    /// Atlas holding only the white texel; text falls back to placeholder boxes.
    pub fn solid_only() -> Self {
        let size = 4;
        let mut image = AtlasImage::filled(size, size, PixelFormat::Alpha8, 0);
        blit_white(&mut image, (1, 1));
        let pixel_size = FontAtlasConfig::default().pixel_size;
        Self {
            image,
            glyphs: HashMap::new(),
            white_uv: white_uv((1, 1), size as f32, size as f32),
            pixel_size,
            line_height: pixel_size * 1.2,
        }
    }

    #[inline]
    pub fn image(&self) -> &AtlasImage {
        &self.image
    }

    #[inline]
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// UV of a texel that is fully opaque white.
    #[inline]
    pub fn white_uv(&self) -> [f32; 2] {
        self.white_uv
    }

    #[inline]
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Pen advance for `ch`, with a half-em fallback for missing glyphs.
    #[inline]
    pub fn advance(&self, ch: char) -> f32 {
        self.glyph(ch)
            .map_or(self.pixel_size * 0.5, |g| g.advance)
    }

    /// Single-line text extent.
    pub fn measure(&self, text: &str) -> Vec2 {
        let w = text.chars().map(|c| self.advance(c)).sum();
        Vec2::new(w, self.line_height)
    }
}

fn white_uv(pos: (u32, u32), aw: f32, ah: f32) -> [f32; 2] {
    let half = WHITE_BLOCK as f32 * 0.5;
    [(pos.0 as f32 + half) / aw, (pos.1 as f32 + half) / ah]
}

fn blit_white(image: &mut AtlasImage, pos: (u32, u32)) {
    let block = vec![255u8; (WHITE_BLOCK * WHITE_BLOCK) as usize];
    blit_alpha(image, pos, WHITE_BLOCK, &block);
}

fn blit_alpha(image: &mut AtlasImage, pos: (u32, u32), w: u32, src: &[u8]) {
    let stride = image.width as usize;
    for (row, line) in src.chunks_exact(w as usize).enumerate() {
        let start = (pos.1 as usize + row) * stride + pos.0 as usize;
        image.pixels[start..start + line.len()].copy_from_slice(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_only_has_white_texel_and_no_glyphs() {
        let atlas = FontAtlas::solid_only();
        let img = atlas.image();
        assert_eq!(img.format, PixelFormat::Alpha8);
        assert!(img.check().is_ok());

        let [u, v] = atlas.white_uv();
        let x = (u * img.width as f32) as usize;
        let y = (v * img.height as f32) as usize;
        assert_eq!(img.pixels[y * img.width as usize + x], 255);
        assert!(atlas.glyph('A').is_none());
    }

    #[test]
    fn missing_glyphs_advance_half_em() {
        let atlas = FontAtlas::solid_only();
        let m = atlas.measure("abcd");
        assert_eq!(m.x, atlas.pixel_size() * 2.0);
        assert_eq!(m.y, atlas.line_height());
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let err = FontAtlas::from_font_bytes(b"not a font", &FontAtlasConfig::default()).unwrap_err();
        assert!(matches!(err, FontAtlasError::Parse(_)));
    }

    #[test]
    fn blit_writes_rows_at_offset() {
        let mut img = AtlasImage::filled(4, 4, PixelFormat::Alpha8, 0);
        blit_alpha(&mut img, (1, 2), 2, &[1, 2, 3, 4]);
        assert_eq!(&img.pixels[9..11], &[1, 2]);
        assert_eq!(&img.pixels[13..15], &[3, 4]);
        assert_eq!(img.pixels.iter().filter(|&&p| p != 0).count(), 4);
    }
}
