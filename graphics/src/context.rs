//! Render-context facade.
//!
//! Every component that issues GPU calls receives a `&mut dyn RenderContext`
//! instead of reaching for global state. The trait covers exactly what the
//! batching pipeline needs: program binding, uniform uploads, the projection
//! and fog state owned by the host, and non-indexed vertex uploads and draws.
//!
//! Implementations:
//! - [`DummyContext`](crate::backend::dummy::DummyContext) - records calls, for tests
//! - host renderers wrap their own GPU API

use tessera_core::math::Mat4;
use tessera_core::mesh::{PrimitiveTopology, VertexFormat};

use crate::error::GraphicsError;
use crate::types::{BufferHandle, BufferUsage, FogState, ProgramHandle, UniformLocation};

/// Object-safe GPU state facade.
pub trait RenderContext {
    /// Human-readable backend name.
    fn name(&self) -> &'static str;

    // Programs and uniforms

    /// Resolve a uniform by name. Returns [`UniformLocation::ABSENT`] when the
    /// program does not declare it.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> UniformLocation;

    /// Bind a program, or unbind with `None`.
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Delete a linked program.
    fn delete_program(&mut self, program: ProgramHandle);

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32);

    fn set_uniform_f32(&mut self, location: UniformLocation, value: f32);

    fn set_uniform_vec2(&mut self, location: UniformLocation, value: [f32; 2]);

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]);

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]);

    /// Upload a column-major 4x4 matrix.
    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]);

    // Host-owned state

    /// Current projection matrix.
    fn projection_matrix(&self) -> Mat4;

    /// Current fog parameters.
    fn fog_state(&self) -> FogState;

    // Buffers and drawing

    /// Upload vertex bytes into a new buffer.
    fn upload_vertices(
        &mut self,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<BufferHandle, GraphicsError>;

    /// Draw `count` vertices starting at `first` from an uploaded buffer.
    fn draw_arrays(
        &mut self,
        buffer: BufferHandle,
        format: &VertexFormat,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    ) -> Result<(), GraphicsError>;

    /// Release an uploaded buffer.
    fn release_buffer(&mut self, buffer: BufferHandle);
}

impl UniformLocation {
    /// Upload an integer unless the location is absent.
    pub fn set_i32(self, ctx: &mut dyn RenderContext, value: i32) {
        if !self.is_absent() {
            ctx.set_uniform_i32(self, value);
        }
    }

    /// Upload a float unless the location is absent.
    pub fn set_f32(self, ctx: &mut dyn RenderContext, value: f32) {
        if !self.is_absent() {
            ctx.set_uniform_f32(self, value);
        }
    }

    /// Upload a vec2 unless the location is absent.
    pub fn set_vec2(self, ctx: &mut dyn RenderContext, value: [f32; 2]) {
        if !self.is_absent() {
            ctx.set_uniform_vec2(self, value);
        }
    }

    /// Upload a vec3 unless the location is absent.
    pub fn set_vec3(self, ctx: &mut dyn RenderContext, value: [f32; 3]) {
        if !self.is_absent() {
            ctx.set_uniform_vec3(self, value);
        }
    }

    /// Upload a vec4 unless the location is absent.
    pub fn set_vec4(self, ctx: &mut dyn RenderContext, value: [f32; 4]) {
        if !self.is_absent() {
            ctx.set_uniform_vec4(self, value);
        }
    }

    /// Upload a matrix unless the location is absent.
    pub fn set_mat4(self, ctx: &mut dyn RenderContext, value: &[f32; 16]) {
        if !self.is_absent() {
            ctx.set_uniform_mat4(self, value);
        }
    }
}
