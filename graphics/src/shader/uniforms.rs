//! Uniform names shared with shader sources.
//!
//! Shader variants that don't declare one of these simply lose the
//! corresponding feature; lookups resolve to an absent location.

/// Combined model-view-projection matrix (mat4).
pub const MODEL_VIEW_PROJECTION: &str = "u_ModelViewProjectionMatrix";
/// Per-draw model scale (vec3).
pub const MODEL_SCALE: &str = "u_ModelScale";
/// Per-draw texture coordinate scale (vec2).
pub const TEXTURE_SCALE: &str = "u_TextureScale";
/// Block/albedo atlas sampler.
pub const BLOCK_TEXTURE: &str = "u_BlockTex";
/// Lightmap sampler.
pub const LIGHT_TEXTURE: &str = "u_LightTex";

/// Fog color (vec4).
pub const FOG_COLOR: &str = "u_FogColor";
/// Exponential fog density (float).
pub const FOG_DENSITY: &str = "u_FogDensity";
/// Linear fog ramp length, `end - start` (float).
pub const FOG_LENGTH: &str = "u_FogLength";
/// Linear fog end distance (float).
pub const FOG_END: &str = "u_FogEnd";
