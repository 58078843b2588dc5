//! Shared fixtures for program binding tests.

use tessera_graphics::shader::uniforms;
use tessera_graphics::{DummyContext, FogState, ProgramHandle, RecordedCall, UniformValue};

/// Every uniform a fully featured chunk shader declares.
pub const CHUNK_UNIFORMS: &[&str] = &[
    uniforms::MODEL_VIEW_PROJECTION,
    uniforms::MODEL_SCALE,
    uniforms::TEXTURE_SCALE,
    uniforms::BLOCK_TEXTURE,
    uniforms::LIGHT_TEXTURE,
    uniforms::FOG_COLOR,
    uniforms::FOG_DENSITY,
    uniforms::FOG_LENGTH,
    uniforms::FOG_END,
];

/// Initialize logging once; repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A dummy context with one chunk program linked and the given fog.
pub fn chunk_context(fog: FogState) -> (DummyContext, ProgramHandle) {
    init_logging();
    let mut ctx = DummyContext::new();
    ctx.set_fog_state(fog);
    let handle = ctx.create_program("chunk", CHUNK_UNIFORMS);
    (ctx, handle)
}

/// Uniform values uploaded while `program` was bound, in call order.
pub fn uniforms_for(ctx: &DummyContext, program: ProgramHandle) -> Vec<UniformValue> {
    ctx.calls()
        .iter()
        .filter_map(|call| match call {
            RecordedCall::Uniform {
                program: Some(bound),
                value,
                ..
            } if *bound == program => Some(*value),
            _ => None,
        })
        .collect()
}
