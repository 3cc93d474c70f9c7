//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per frame and pass `dt`
//! into the input snapshot.

mod frame_clock;

pub use frame_clock::{FIRST_FRAME_DT, FrameClock, FrameTime};
