//! Batching error types.

use std::fmt;

use tessera_graphics::GraphicsError;

/// Errors reported by the accumulator and the segment renderer.
///
/// Everything except [`BatchError::OutOfMemory`] and
/// [`BatchError::Graphics`] is a caller precondition violation.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    /// A layer that was already sealed this session was acquired again.
    LayerReuse(String),
    /// A vertex write did not follow the open layer's vertex format.
    FormatMismatch(String),
    /// A vertex run is not a whole number of vertices or primitives.
    MalformedRun(String),
    /// A layer asks for sorting but its primitives cannot be reordered.
    UnsortableLayer(String),
    /// A layer descriptor is not usable.
    InvalidLayer(String),
    /// Growing the vertex buffer failed.
    OutOfMemory {
        /// Total capacity that was requested.
        requested: usize,
    },
    /// The render context rejected an upload or draw.
    Graphics(GraphicsError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerReuse(layer) => {
                write!(f, "layer {layer:?} was already sealed in this session")
            }
            Self::FormatMismatch(msg) => write!(f, "vertex format mismatch: {msg}"),
            Self::MalformedRun(msg) => write!(f, "malformed vertex run: {msg}"),
            Self::UnsortableLayer(msg) => write!(f, "layer cannot be sorted: {msg}"),
            Self::InvalidLayer(msg) => write!(f, "invalid layer: {msg}"),
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory growing vertex buffer to {requested} bytes")
            }
            Self::Graphics(err) => write!(f, "graphics error: {err}"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graphics(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GraphicsError> for BatchError {
    fn from(err: GraphicsError) -> Self {
        Self::Graphics(err)
    }
}
