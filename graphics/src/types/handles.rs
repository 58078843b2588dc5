//! Program, uniform and texture-unit handles.

/// Handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) u64);

impl ProgramHandle {
    /// Create a handle from a raw backend id.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw backend id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Location of a uniform inside a linked program.
///
/// Lookups for names the program does not declare resolve to
/// [`UniformLocation::ABSENT`]; uploads to an absent location are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub(crate) i32);

impl UniformLocation {
    /// Sentinel for a uniform the program does not declare.
    pub const ABSENT: Self = Self(-1);

    /// Create a location from a raw backend value. Negative values are absent.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 { Self::ABSENT } else { Self(raw) }
    }

    /// Raw backend value (`-1` when absent).
    pub fn raw(&self) -> i32 {
        self.0
    }

    /// Whether the uniform was not found.
    pub fn is_absent(&self) -> bool {
        self.0 < 0
    }
}

/// Fixed texture unit index a sampler uniform is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureUnit(pub u32);

impl TextureUnit {
    /// Unit for the block/albedo atlas.
    pub const BLOCK: Self = Self(0);
    /// Unit for the lightmap.
    pub const LIGHT: Self = Self(2);

    /// Value uploaded to a sampler uniform.
    pub fn as_sampler_value(&self) -> i32 {
        self.0 as i32
    }
}
