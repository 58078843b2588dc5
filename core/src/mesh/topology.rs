//! Primitive topology.

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Every four vertices form a quad.
    QuadList,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::QuadList => Some(4),
            Self::LineStrip | Self::TriangleStrip => None, // Variable
        }
    }

    /// Whether consecutive primitives share vertices.
    pub fn is_strip(&self) -> bool {
        matches!(self, Self::LineStrip | Self::TriangleStrip)
    }

    /// Whether this is a triangle strip.
    pub fn is_triangle_strip(&self) -> bool {
        matches!(self, Self::TriangleStrip)
    }

    /// Whether this is a line strip.
    pub fn is_line_strip(&self) -> bool {
        matches!(self, Self::LineStrip)
    }
}
