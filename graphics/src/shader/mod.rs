//! Shader program binding.
//!
//! - [`ShaderProgram`] - linked program handle plus diagnostic name
//! - [`ForwardProgram`] - resolves per-draw uniforms once and uploads them in `setup`
//! - [`FogHook`] - pluggable fog uniform setup, built by a factory at program creation
//!
//! # Example
//!
//! ```ignore
//! let program = ForwardProgram::new(&ctx, handle, "chunk", fog_factory(ctx.fog_state().mode));
//! program.bind(&mut ctx);
//! program.setup(&mut ctx, &model_view, [1.0; 3], [1.0; 2]);
//! ctx.draw_arrays(buffer, &format, topology, 0, count)?;
//! ```

pub mod fog;
pub mod forward;
pub mod program;
pub mod uniforms;

pub use fog::{ExpSquaredFog, FogFactory, FogHook, LinearFog, NoFog, fog_factory};
pub use forward::ForwardProgram;
pub use program::ShaderProgram;
