//! Render-context backends.
//!
//! # Available Backends
//!
//! - `dummy`: records every call without touching a GPU, for testing
//!
//! Host applications implement [`RenderContext`](crate::context::RenderContext)
//! over their own GPU API.

pub mod dummy;

pub use dummy::{DummyContext, RecordedCall, UniformValue};
