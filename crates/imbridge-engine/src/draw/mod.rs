//! Draw bridge: replays GUI draw batches on a render device.
//!
//! The GUI produces [`DrawData`] (vertex/index streams partitioned into
//! commands). [`DrawBridge`] walks it, converts clip rectangles into scissor
//! rectangles for the device's origin convention and issues indexed draws,
//! bracketed by a state save/restore. It also owns the font atlas texture.

mod bridge;
mod data;
mod device;
mod error;

pub use bridge::{AtlasState, DrawBridge, FrameStats};
pub use data::{DrawBatch, DrawCmd, DrawData, DrawIdx, DrawVert, TextureId, UserCallback};
pub use device::{GpuState, IDENTITY, Mat4, RenderDevice, StateGuard, display_projection, ortho};
pub use error::{BatchError, BridgeError, DeviceError};
