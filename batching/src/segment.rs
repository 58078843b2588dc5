//! Extracted segments.

use std::sync::Arc;

use tessera_core::mesh::{PrimitiveTopology, VertexFormat};

use crate::layer::RenderLayer;

/// How to interpret a segment's bytes when drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawState {
    pub vertex_count: usize,
    pub topology: PrimitiveTopology,
    pub format: Arc<VertexFormat>,
}

impl DrawState {
    pub fn new(vertex_count: usize, topology: PrimitiveTopology, format: Arc<VertexFormat>) -> Self {
        Self {
            vertex_count,
            topology,
            format,
        }
    }

    /// Bytes covered by `vertex_count` vertices.
    pub fn byte_len(&self) -> usize {
        self.vertex_count * self.format.stride()
    }
}

/// One layer's vertex bytes, ready for a single upload and draw.
///
/// Borrows the accumulator it was extracted from, so the accumulator cannot
/// be written to until every segment is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSegment<'a> {
    bytes: &'a [u8],
    draw_state: DrawState,
    layer: RenderLayer,
}

impl<'a> BufferSegment<'a> {
    pub(crate) fn new(bytes: &'a [u8], draw_state: DrawState, layer: RenderLayer) -> Self {
        debug_assert_eq!(bytes.len(), draw_state.byte_len());
        Self {
            bytes,
            draw_state,
            layer,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draw_state
    }

    /// Layer the bytes were written under.
    pub fn layer(&self) -> &RenderLayer {
        &self.layer
    }

    pub fn vertex_count(&self) -> usize {
        self.draw_state.vertex_count
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copy the bytes out so the segment outlives the session.
    pub fn into_owned(self) -> OwnedSegment {
        OwnedSegment {
            bytes: self.bytes.to_vec(),
            draw_state: self.draw_state,
            layer: self.layer,
        }
    }
}

/// A segment detached from its accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedSegment {
    bytes: Vec<u8>,
    draw_state: DrawState,
    layer: RenderLayer,
}

impl OwnedSegment {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draw_state
    }

    pub fn layer(&self) -> &RenderLayer {
        &self.layer
    }

    pub fn vertex_count(&self) -> usize {
        self.draw_state.vertex_count
    }

    /// Borrow as a [`BufferSegment`], e.g. to draw it.
    pub fn as_segment(&self) -> BufferSegment<'_> {
        BufferSegment {
            bytes: &self.bytes,
            draw_state: self.draw_state.clone(),
            layer: self.layer.clone(),
        }
    }
}
