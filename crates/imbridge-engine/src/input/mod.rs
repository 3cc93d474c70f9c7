//! Input reconciliation.
//!
//! Platform glue translates native events into [`InputEvent`]s and feeds them
//! to the [`InputReconciler`] sinks (discrete latches) and to a [`PointerPoll`]
//! (continuous device state). Once per frame `begin_frame` folds both into an
//! immutable [`FrameInput`].
//!
//! Public API does not expose winit types; see [`platform`] for the glue.

mod keys;
mod policy;
mod poll;
mod reconciler;
mod snapshot;
mod types;

pub mod platform;

pub use keys::KeyTable;
pub use policy::{InputPolicy, WheelMode};
pub use poll::{PointerPoll, PointerTracker, StaticPoll};
pub use reconciler::{FrameParams, InputReconciler, MAX_INPUT_CODEPOINT};
pub use snapshot::FrameInput;
pub use types::{InputEvent, KEY_TABLE_SIZE, Key, Modifiers, MouseButton};
