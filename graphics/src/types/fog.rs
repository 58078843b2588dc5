//! Fog state read by fog hooks.

/// Fog equation currently configured on the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FogMode {
    /// No fog.
    #[default]
    Disabled,
    /// Linear falloff between `start` and `end`.
    Linear,
    /// Exponential falloff driven by `density`.
    Exp,
    /// Squared exponential falloff driven by `density`.
    Exp2,
}

/// Snapshot of the fog parameters owned by the context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogState {
    pub mode: FogMode,
    /// RGBA fog color.
    pub color: [f32; 4],
    pub density: f32,
    pub start: f32,
    pub end: f32,
}

impl Default for FogState {
    fn default() -> Self {
        Self {
            mode: FogMode::Disabled,
            color: [0.0, 0.0, 0.0, 0.0],
            density: 1.0,
            start: 0.0,
            end: 1.0,
        }
    }
}

impl FogState {
    /// Linear fog between `start` and `end`.
    pub fn linear(color: [f32; 4], start: f32, end: f32) -> Self {
        Self {
            mode: FogMode::Linear,
            color,
            start,
            end,
            ..Self::default()
        }
    }

    /// Squared exponential fog with the given density.
    pub fn exp2(color: [f32; 4], density: f32) -> Self {
        Self {
            mode: FogMode::Exp2,
            color,
            density,
            ..Self::default()
        }
    }

    /// Distance over which linear fog ramps up.
    pub fn length(&self) -> f32 {
        self.end - self.start
    }
}
