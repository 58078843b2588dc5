//! Accumulator configuration.

/// Initial vertex buffer size: 2 MiB.
pub const DEFAULT_INITIAL_CAPACITY: usize = 2 * 1024 * 1024;

/// Number of layers reserved up front in the per-session layer list.
pub const DEFAULT_EXPECTED_LAYERS: usize = 256;

/// Settings for a [`SegmentedAccumulator`](crate::SegmentedAccumulator).
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorConfig {
    /// Bytes allocated for the vertex buffer at construction.
    pub initial_capacity: usize,
    /// Layers reserved in the layer list.
    pub expected_layers: usize,
    /// Reference point for back-to-front sorting, usually the camera.
    pub sort_origin: [f32; 3],
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            expected_layers: DEFAULT_EXPECTED_LAYERS,
            sort_origin: [0.0; 3],
        }
    }
}

impl AccumulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = bytes;
        self
    }

    pub fn with_expected_layers(mut self, count: usize) -> Self {
        self.expected_layers = count;
        self
    }

    pub fn with_sort_origin(mut self, origin: [f32; 3]) -> Self {
        self.sort_origin = origin;
        self
    }
}
