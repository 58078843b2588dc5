//! Vertex formats and primitive topology.
//!
//! - [`VertexFormat`] - Ordered, typed attribute slots of one interleaved vertex
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - Plain-old-data vertex structs matching the common formats
//!
//! Formats are shared via `Arc` since there are only a few of them across
//! many render layers.

mod layout;
mod topology;
mod vertex;

pub use layout::{VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexFormat};
pub use topology::PrimitiveTopology;
pub use vertex::{PositionColorTexVertex, PositionColorVertex, pack_color};
