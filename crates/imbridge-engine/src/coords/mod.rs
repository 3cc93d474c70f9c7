//! Coordinate and geometry types shared by the input and draw paths.
//!
//! Canonical CPU space:
//! - Display pixels as reported by the platform
//! - Origin top-left
//! - +X right, +Y down
//!
//! Scissor rectangles are the only device-space type; see [`ScissorOrigin`].

mod clip;
mod color;
mod rect;
mod vec2;
mod viewport;

pub use clip::{ClipRect, ScissorOrigin, ScissorRect};
pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
