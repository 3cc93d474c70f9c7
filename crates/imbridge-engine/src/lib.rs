//! imbridge engine crate.
//!
//! Backend glue between an immediate-mode GUI and a host: input
//! reconciliation, the draw bridge that replays GUI draw lists on a render
//! device, font atlas building, and a winit + wgpu runtime to host it.

pub mod backend;
pub mod context;
pub mod coords;
pub mod core;
pub mod device;
pub mod draw;
pub mod font;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

pub use context::Context;
