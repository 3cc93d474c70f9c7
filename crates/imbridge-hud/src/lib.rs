//! Debug overlay for imbridge.
//!
//! [`Overlay`] is a small immediate-mode widget builder that turns a
//! [`FrameInput`](imbridge_engine::input::FrameInput) into
//! [`DrawData`](imbridge_engine::draw::DrawData) for the engine's draw bridge;
//! [`DebugHud`] is the stock pair of windows built on it.
//!
//! ```rust,ignore
//! let input = context.new_frame(pointer, display, scale);
//! let mut ui = Overlay::new(&input, &atlas, &mut memory, &style);
//! hud.do_interface(&mut ui);
//! context.render(&ui.finish())?;
//! ```

mod hud;
mod overlay;
mod painter;
mod widgets;

pub use hud::{DebugHud, diagnostics};
pub use overlay::{Overlay, OverlayMemory, OverlayStyle, WidgetId};
pub use painter::{Painter, QuadId};
