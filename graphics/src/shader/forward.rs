//! Forward program: per-draw transform, scale and sampler setup.

use tessera_core::math::{Mat4, mat4_write_cols};

use crate::context::RenderContext;
use crate::shader::fog::FogHook;
use crate::shader::program::ShaderProgram;
use crate::shader::uniforms;
use crate::types::{FogMode, ProgramHandle, TextureUnit, UniformLocation};

/// Program wrapper used to draw batched geometry.
///
/// All uniform locations are resolved once in [`ForwardProgram::new`]. The
/// fog hook is built by a caller-supplied factory that receives the wrapped
/// program, so it can resolve its own uniforms without this type knowing
/// which ones they are.
#[derive(Debug)]
pub struct ForwardProgram {
    program: ShaderProgram,
    model_view_projection: UniformLocation,
    model_scale: UniformLocation,
    texture_scale: UniformLocation,
    block_texture: UniformLocation,
    light_texture: UniformLocation,
    fog: Box<dyn FogHook>,
}

impl ForwardProgram {
    pub fn new<F>(
        ctx: &dyn RenderContext,
        handle: ProgramHandle,
        name: impl Into<String>,
        fog_factory: F,
    ) -> Self
    where
        F: FnOnce(&ShaderProgram, &dyn RenderContext) -> Box<dyn FogHook>,
    {
        let program = ShaderProgram::new(handle, name);

        let model_view_projection = program.uniform_location(ctx, uniforms::MODEL_VIEW_PROJECTION);
        if model_view_projection.is_absent() {
            log::warn!(
                "Program {:?} does not declare {}",
                program.name(),
                uniforms::MODEL_VIEW_PROJECTION
            );
        }

        let fog = fog_factory(&program, ctx);
        log::debug!(
            "Created forward program {:?} with fog {:?}",
            program.name(),
            fog.mode()
        );

        Self {
            model_view_projection,
            model_scale: program.uniform_location(ctx, uniforms::MODEL_SCALE),
            texture_scale: program.uniform_location(ctx, uniforms::TEXTURE_SCALE),
            block_texture: program.uniform_location(ctx, uniforms::BLOCK_TEXTURE),
            light_texture: program.uniform_location(ctx, uniforms::LIGHT_TEXTURE),
            program,
            fog,
        }
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn name(&self) -> &str {
        self.program.name()
    }

    pub fn fog_mode(&self) -> FogMode {
        self.fog.mode()
    }

    pub fn bind(&self, ctx: &mut dyn RenderContext) {
        self.program.bind(ctx);
    }

    pub fn unbind(&self, ctx: &mut dyn RenderContext) {
        self.program.unbind(ctx);
    }

    /// Upload per-draw state. Call with this program bound, before each draw.
    pub fn setup(
        &self,
        ctx: &mut dyn RenderContext,
        transform: &Mat4,
        model_scale: [f32; 3],
        texture_scale: [f32; 2],
    ) {
        self.block_texture
            .set_i32(ctx, TextureUnit::BLOCK.as_sampler_value());
        self.light_texture
            .set_i32(ctx, TextureUnit::LIGHT.as_sampler_value());

        self.model_scale.set_vec3(ctx, model_scale);
        self.texture_scale.set_vec2(ctx, texture_scale);

        self.fog.setup(ctx);

        let mvp = ctx.projection_matrix() * transform;
        let mut cols = [0.0f32; 16];
        mat4_write_cols(&mvp, &mut cols);
        self.model_view_projection.set_mat4(ctx, &cols);
    }

    /// Delete the GPU program.
    pub fn delete(self, ctx: &mut dyn RenderContext) {
        self.program.delete(ctx);
    }
}
