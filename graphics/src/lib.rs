//! # Tessera Graphics
//!
//! Render-context facade and shader program binding for the Tessera
//! batching renderer.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RenderContext`] - Trait through which all GPU calls are issued
//! - [`DummyContext`] - Records every call without a GPU (for testing)
//! - [`ShaderProgram`] / [`ForwardProgram`] - Program handles with per-draw uniform setup
//! - [`FogHook`] - Fog uniform setup chosen by the host's fog mode
//!
//! ## Example
//!
//! ```ignore
//! use tessera_graphics::{DummyContext, ForwardProgram, RenderContext, fog_factory};
//!
//! let mut ctx = DummyContext::new();
//! let handle = ctx.create_program("chunk", &["u_ModelViewProjectionMatrix"]);
//! let program = ForwardProgram::new(&ctx, handle, "chunk", fog_factory(ctx.fog_state().mode));
//! program.bind(&mut ctx);
//! program.setup(&mut ctx, &model_view, [1.0; 3], [1.0; 2]);
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod shader;
pub mod types;

// Re-export main types for convenience
pub use backend::{DummyContext, RecordedCall, UniformValue};
pub use context::RenderContext;
pub use error::GraphicsError;
pub use shader::{
    ExpSquaredFog, FogFactory, FogHook, ForwardProgram, LinearFog, NoFog, ShaderProgram,
    fog_factory,
};
pub use types::{
    BufferHandle, BufferUsage, FogMode, FogState, ProgramHandle, TextureUnit, UniformLocation,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    tessera_core::init();
    log::info!("Tessera Graphics v{} initialized", VERSION);
}

static_assertions::assert_impl_all!(GraphicsError: Send, Sync, std::error::Error);
static_assertions::assert_impl_all!(DummyContext: Send);
static_assertions::assert_obj_safe!(RenderContext, FogHook);
