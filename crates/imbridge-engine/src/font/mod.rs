//! Font atlas images and baking.
//!
//! [`AtlasImage`] is what the draw bridge uploads. [`FontAtlas`] bakes one
//! from a font file with fontdue and keeps the glyph table the overlay needs
//! for text layout.

mod atlas;
mod image;
mod packer;

pub use atlas::{FontAtlas, FontAtlasConfig, FontAtlasError, Glyph};
pub use image::{AtlasImage, PixelFormat};
