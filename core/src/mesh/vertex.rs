//! Plain-old-data vertex structs for the common formats.
//!
//! Each struct matches the byte layout of the corresponding
//! [`VertexFormat`](super::VertexFormat) so it can be pushed into a vertex
//! sink with a single copy.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Matches [`VertexFormat::position_color`](super::VertexFormat::position_color).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PositionColorVertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
}

/// Matches [`VertexFormat::position_color_tex`](super::VertexFormat::position_color_tex).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PositionColorTexVertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub uv: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<PositionColorVertex>(), 16);
const_assert_eq!(std::mem::size_of::<PositionColorTexVertex>(), 24);

impl PositionColorVertex {
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            color: pack_color(color),
        }
    }
}

impl PositionColorTexVertex {
    pub fn new(position: [f32; 3], color: [f32; 4], uv: [f32; 2]) -> Self {
        Self {
            position,
            color: pack_color(color),
            uv,
        }
    }
}

/// Pack a float RGBA color into unorm8x4.
#[inline]
pub fn pack_color(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
