//! Fog hooks.
//!
//! A fog hook resolves its own uniforms against the program it is built for
//! and uploads the context's current fog parameters once per draw. The
//! falloff itself is evaluated in shader code.

use std::fmt::Debug;

use crate::context::RenderContext;
use crate::shader::program::ShaderProgram;
use crate::shader::uniforms;
use crate::types::{FogMode, UniformLocation};

/// Per-draw fog setup injected into a program wrapper.
pub trait FogHook: Debug {
    /// Upload fog state for the next draw. The owning program is bound.
    fn setup(&self, ctx: &mut dyn RenderContext);

    /// Fog equation this hook feeds.
    fn mode(&self) -> FogMode;
}

/// Builds a fog hook for a program.
pub type FogFactory = fn(&ShaderProgram, &dyn RenderContext) -> Box<dyn FogHook>;

/// Pick the factory for a fog mode.
pub fn fog_factory(mode: FogMode) -> FogFactory {
    match mode {
        FogMode::Disabled => NoFog::create,
        FogMode::Linear => LinearFog::create,
        FogMode::Exp | FogMode::Exp2 => ExpSquaredFog::create,
    }
}

/// Hook for programs compiled without fog.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFog;

impl NoFog {
    pub fn create(_program: &ShaderProgram, _ctx: &dyn RenderContext) -> Box<dyn FogHook> {
        Box::new(NoFog)
    }
}

impl FogHook for NoFog {
    fn setup(&self, _ctx: &mut dyn RenderContext) {}

    fn mode(&self) -> FogMode {
        FogMode::Disabled
    }
}

/// Linear fog: color, ramp length and end distance.
#[derive(Debug, Clone, Copy)]
pub struct LinearFog {
    color: UniformLocation,
    length: UniformLocation,
    end: UniformLocation,
}

impl LinearFog {
    pub fn new(program: &ShaderProgram, ctx: &dyn RenderContext) -> Self {
        Self {
            color: program.uniform_location(ctx, uniforms::FOG_COLOR),
            length: program.uniform_location(ctx, uniforms::FOG_LENGTH),
            end: program.uniform_location(ctx, uniforms::FOG_END),
        }
    }

    pub fn create(program: &ShaderProgram, ctx: &dyn RenderContext) -> Box<dyn FogHook> {
        Box::new(Self::new(program, ctx))
    }
}

impl FogHook for LinearFog {
    fn setup(&self, ctx: &mut dyn RenderContext) {
        let fog = ctx.fog_state();
        self.color.set_vec4(ctx, fog.color);
        self.length.set_f32(ctx, fog.length());
        self.end.set_f32(ctx, fog.end);
    }

    fn mode(&self) -> FogMode {
        FogMode::Linear
    }
}

/// Density-driven fog: color and density.
///
/// Serves both exponential modes; they read the same uniforms.
#[derive(Debug, Clone, Copy)]
pub struct ExpSquaredFog {
    color: UniformLocation,
    density: UniformLocation,
}

impl ExpSquaredFog {
    pub fn new(program: &ShaderProgram, ctx: &dyn RenderContext) -> Self {
        Self {
            color: program.uniform_location(ctx, uniforms::FOG_COLOR),
            density: program.uniform_location(ctx, uniforms::FOG_DENSITY),
        }
    }

    pub fn create(program: &ShaderProgram, ctx: &dyn RenderContext) -> Box<dyn FogHook> {
        Box::new(Self::new(program, ctx))
    }
}

impl FogHook for ExpSquaredFog {
    fn setup(&self, ctx: &mut dyn RenderContext) {
        let fog = ctx.fog_state();
        self.color.set_vec4(ctx, fog.color);
        self.density.set_f32(ctx, fog.density);
    }

    fn mode(&self) -> FogMode {
        FogMode::Exp2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyContext, UniformValue};
    use crate::types::FogState;

    const FOG_UNIFORMS: &[&str] = &[
        uniforms::FOG_COLOR,
        uniforms::FOG_DENSITY,
        uniforms::FOG_LENGTH,
        uniforms::FOG_END,
    ];

    #[test]
    fn test_linear_fog_uploads_length_and_end() {
        let mut ctx = DummyContext::new();
        let handle = ctx.create_program("fog", FOG_UNIFORMS);
        let program = ShaderProgram::new(handle, "fog");
        ctx.set_fog_state(FogState::linear([0.5, 0.6, 0.7, 1.0], 16.0, 64.0));

        let hook = fog_factory(FogMode::Linear)(&program, &ctx);
        program.bind(&mut ctx);
        hook.setup(&mut ctx);

        assert_eq!(hook.mode(), FogMode::Linear);
        assert_eq!(
            ctx.last_uniform(handle, uniforms::FOG_COLOR),
            Some(UniformValue::Vec4([0.5, 0.6, 0.7, 1.0]))
        );
        assert_eq!(
            ctx.last_uniform(handle, uniforms::FOG_LENGTH),
            Some(UniformValue::Float(48.0))
        );
        assert_eq!(
            ctx.last_uniform(handle, uniforms::FOG_END),
            Some(UniformValue::Float(64.0))
        );
        assert_eq!(ctx.last_uniform(handle, uniforms::FOG_DENSITY), None);
    }

    #[test]
    fn test_exp2_fog_uploads_density() {
        let mut ctx = DummyContext::new();
        let handle = ctx.create_program("fog", FOG_UNIFORMS);
        let program = ShaderProgram::new(handle, "fog");
        ctx.set_fog_state(FogState::exp2([1.0; 4], 0.25));

        let hook = fog_factory(FogMode::Exp2)(&program, &ctx);
        program.bind(&mut ctx);
        hook.setup(&mut ctx);

        assert_eq!(
            ctx.last_uniform(handle, uniforms::FOG_DENSITY),
            Some(UniformValue::Float(0.25))
        );
        assert_eq!(ctx.last_uniform(handle, uniforms::FOG_END), None);
    }

    #[test]
    fn test_no_fog_issues_no_calls() {
        let mut ctx = DummyContext::new();
        let program = ShaderProgram::new(ctx.create_program("fog", FOG_UNIFORMS), "fog");
        let hook = fog_factory(FogMode::Disabled)(&program, &ctx);
        hook.setup(&mut ctx);
        assert!(ctx.calls().is_empty());
    }

    #[test]
    fn test_fog_uniforms_absent_in_program() {
        let mut ctx = DummyContext::new();
        let program = ShaderProgram::new(ctx.create_program("plain", &[]), "plain");
        ctx.set_fog_state(FogState::linear([1.0; 4], 0.0, 10.0));
        let hook = LinearFog::new(&program, &ctx);
        program.bind(&mut ctx);
        ctx.clear_calls();
        hook.setup(&mut ctx);
        assert!(ctx.calls().is_empty());
    }
}
