//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and windows, wires each window's events into
//! its input reconciler and drives one frame per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
