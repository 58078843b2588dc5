//! Common types shared by render contexts and shader programs.
//!
//! This module contains handle newtypes, usage flags, and the fog state
//! read by fog hooks.

mod buffer;
mod fog;
mod handles;

pub use buffer::{BufferHandle, BufferUsage};
pub use fog::{FogMode, FogState};
pub use handles::{ProgramHandle, TextureUnit, UniformLocation};
