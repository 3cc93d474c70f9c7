//! wgpu render backend.
//!
//! [`WgpuDevice`] implements the draw bridge's device contract by recording
//! draws and replaying them in one render pass; [`WgpuBackend`] pairs it with
//! the system clipboard.
//!
//! Convention:
//! - CPU geometry is in display pixels (top-left origin, +Y down).
//! - The vertex shader applies the bridge's orthographic projection.

mod backend;
mod ctx;
mod device;
mod recorder;

pub use backend::WgpuBackend;
pub use ctx::{RenderCtx, RenderTarget};
pub use device::WgpuDevice;
