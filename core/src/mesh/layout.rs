//! Vertex format definitions.
//!
//! A [`VertexFormat`] describes one interleaved vertex: an ordered list of
//! typed attributes, each at a fixed byte offset, plus the total stride.
//! Attribute order matters: vertex sinks expect elements to be written in
//! exactly this order.
//!
//! # Example
//!
//! ```ignore
//! let format = Arc::new(VertexFormat::new(24)
//!     .with_attribute(VertexAttribute::position(0))
//!     .with_attribute(VertexAttribute::color(12))
//!     .with_attribute(VertexAttribute::texcoord0(16))
//!     .with_label("position_color_tex"));
//! assert_eq!(format.position_offset(), Some(0));
//! ```

use std::sync::Arc;

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Vertex position (typically float3).
    Position,
    /// Vertex color (typically unorm8x4).
    Color,
    /// Texture coordinates set 0 (typically float2).
    TexCoord0,
    /// Texture coordinates set 1, used for lightmap coordinates (typically short2).
    TexCoord1,
    /// Vertex normal (typically snorm8x4, w unused).
    Normal,
    /// Unused bytes kept for alignment.
    Padding,
}

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Single 32-bit signed integer.
    Int,
    /// Two 32-bit signed integers.
    Int2,
    /// Single 32-bit unsigned integer.
    Uint,
    /// Two 32-bit unsigned integers.
    Uint2,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
    /// Four 8-bit signed integers (normalized to -1.0-1.0).
    Snorm8x4,
    /// Two 16-bit signed integers.
    Short2,
    /// Two 16-bit unsigned integers.
    Ushort2,
}

impl VertexAttributeFormat {
    /// Get the size in bytes of this format.
    pub fn size(&self) -> usize {
        match self {
            Self::Float | Self::Int | Self::Uint => 4,
            Self::Float2 | Self::Int2 | Self::Uint2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
            Self::Unorm8x4 | Self::Snorm8x4 => 4,
            Self::Short2 | Self::Ushort2 => 4,
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Semantic meaning of this attribute.
    pub semantic: VertexAttributeSemantic,
    /// Data format of this attribute.
    pub format: VertexAttributeFormat,
    /// Byte offset within the vertex.
    pub offset: u32,
}

impl VertexAttribute {
    /// Create a new vertex attribute.
    pub fn new(
        semantic: VertexAttributeSemantic,
        format: VertexAttributeFormat,
        offset: u32,
    ) -> Self {
        Self {
            semantic,
            format,
            offset,
        }
    }

    /// Create a position attribute (float3).
    pub fn position(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Position,
            VertexAttributeFormat::Float3,
            offset,
        )
    }

    /// Create a color attribute (unorm8x4).
    pub fn color(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Color,
            VertexAttributeFormat::Unorm8x4,
            offset,
        )
    }

    /// Create a texcoord0 attribute (float2).
    pub fn texcoord0(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::TexCoord0,
            VertexAttributeFormat::Float2,
            offset,
        )
    }

    /// Create a lightmap coordinate attribute (short2).
    pub fn light(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::TexCoord1,
            VertexAttributeFormat::Short2,
            offset,
        )
    }

    /// Create a normal attribute (snorm8x4).
    pub fn normal(offset: u32) -> Self {
        Self::new(
            VertexAttributeSemantic::Normal,
            VertexAttributeFormat::Snorm8x4,
            offset,
        )
    }

    /// Byte range covered by this attribute.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.format.size()
    }
}

/// Describes the layout of one interleaved vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexFormat {
    /// Stride in bytes between consecutive vertices.
    pub stride: u32,
    /// The vertex attributes, in write order.
    pub attributes: Vec<VertexAttribute>,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl VertexFormat {
    /// Create a new empty vertex format with the given stride.
    pub fn new(stride: u32) -> Self {
        Self {
            stride,
            attributes: Vec::new(),
            label: None,
        }
    }

    /// Build a tightly packed format from `(semantic, format)` pairs.
    ///
    /// Offsets follow declaration order; the stride is the sum of sizes.
    pub fn packed(slots: &[(VertexAttributeSemantic, VertexAttributeFormat)]) -> Self {
        let mut offset = 0u32;
        let mut attributes = Vec::with_capacity(slots.len());
        for &(semantic, format) in slots {
            attributes.push(VertexAttribute::new(semantic, format, offset));
            offset += format.size() as u32;
        }
        Self {
            stride: offset,
            attributes,
            label: None,
        }
    }

    /// Add a vertex attribute.
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Stride in bytes as `usize`.
    pub fn stride(&self) -> usize {
        self.stride as usize
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Get an attribute by write-order index.
    pub fn attribute(&self, index: usize) -> Option<&VertexAttribute> {
        self.attributes.get(index)
    }

    /// Check if this format has a specific semantic.
    pub fn has_semantic(&self, semantic: VertexAttributeSemantic) -> bool {
        self.attributes.iter().any(|attr| attr.semantic == semantic)
    }

    /// Get an attribute by semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.semantic == semantic)
    }

    /// Byte offset of a float3 position, if the format has one.
    ///
    /// Depth sorting reads positions through this offset.
    pub fn position_offset(&self) -> Option<usize> {
        self.get_attribute(VertexAttributeSemantic::Position)
            .filter(|attr| attr.format == VertexAttributeFormat::Float3)
            .map(|attr| attr.offset as usize)
    }

    /// Validate the format.
    ///
    /// Every attribute must fit inside the stride, attributes must not
    /// overlap, and at most one position is allowed.
    pub fn validate(&self) -> Result<(), String> {
        if self.stride == 0 {
            return Err("Vertex format stride must be non-zero".to_string());
        }

        let mut positions = 0;
        for (i, attr) in self.attributes.iter().enumerate() {
            if attr.range().end > self.stride() {
                return Err(format!(
                    "Attribute {:?} at offset {} ({} bytes) exceeds stride {}",
                    attr.semantic,
                    attr.offset,
                    attr.format.size(),
                    self.stride
                ));
            }
            if attr.semantic == VertexAttributeSemantic::Position {
                positions += 1;
            }
            for other in &self.attributes[i + 1..] {
                let (a, b) = (attr.range(), other.range());
                if a.start < b.end && b.start < a.end {
                    return Err(format!(
                        "Attributes {:?} and {:?} overlap",
                        attr.semantic, other.semantic
                    ));
                }
            }
        }

        if positions > 1 {
            return Err(format!("Vertex format declares {positions} positions"));
        }
        Ok(())
    }
}

// ============================================================================
// Common Formats
// ============================================================================

impl VertexFormat {
    /// Position + packed color (16 bytes).
    pub fn position_color() -> Arc<Self> {
        Arc::new(
            Self::new(16)
                .with_attribute(VertexAttribute::position(0))
                .with_attribute(VertexAttribute::color(12))
                .with_label("position_color"),
        )
    }

    /// Position + texcoord (20 bytes).
    pub fn position_tex() -> Arc<Self> {
        Arc::new(
            Self::new(20)
                .with_attribute(VertexAttribute::position(0))
                .with_attribute(VertexAttribute::texcoord0(12))
                .with_label("position_tex"),
        )
    }

    /// Position + packed color + texcoord (24 bytes).
    pub fn position_color_tex() -> Arc<Self> {
        Arc::new(
            Self::new(24)
                .with_attribute(VertexAttribute::position(0))
                .with_attribute(VertexAttribute::color(12))
                .with_attribute(VertexAttribute::texcoord0(16))
                .with_label("position_color_tex"),
        )
    }

    /// Position + color + texcoord + lightmap + normal (32 bytes).
    ///
    /// The layout used by block and entity geometry.
    pub fn position_color_tex_light_normal() -> Arc<Self> {
        Arc::new(
            Self::new(32)
                .with_attribute(VertexAttribute::position(0))
                .with_attribute(VertexAttribute::color(12))
                .with_attribute(VertexAttribute::texcoord0(16))
                .with_attribute(VertexAttribute::light(24))
                .with_attribute(VertexAttribute::normal(28))
                .with_label("position_color_tex_light_normal"),
        )
    }
}
