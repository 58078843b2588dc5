//! Vertex sink: typed writes into the open layer.
//!
//! Elements are written in the order the layer's [`VertexFormat`] declares
//! its attributes, then committed with [`VertexSink::end_vertex`]. A vertex
//! only reaches the buffer once complete, so a failed write never leaves a
//! partial vertex behind.
//!
//! ```ignore
//! let mut sink = accumulator.acquire(&layer)?;
//! sink.position(0.0, 1.0, 0.0)?
//!     .color(1.0, 1.0, 1.0, 1.0)?
//!     .tex(0.0, 0.0)?
//!     .end_vertex()?;
//! ```

use std::sync::Arc;

use bytemuck::Pod;
use tessera_core::mesh::{
    VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexFormat, pack_color,
};

use crate::buffer::VertexBuffer;
use crate::error::BatchError;
use crate::stitch::StripStitcher;

/// Staging state for the vertex being assembled.
#[derive(Debug)]
pub(crate) struct VertexWriter {
    format: Arc<VertexFormat>,
    staging: Vec<u8>,
    next: usize,
}

impl VertexWriter {
    pub(crate) fn new(format: Arc<VertexFormat>) -> Self {
        Self {
            staging: vec![0; format.stride()],
            format,
            next: 0,
        }
    }

    /// Switch to a new format and drop any pending elements.
    pub(crate) fn reset(&mut self, format: Arc<VertexFormat>) {
        self.staging.clear();
        self.staging.resize(format.stride(), 0);
        self.format = format;
        self.next = 0;
    }

    /// Drop any pending elements.
    pub(crate) fn clear(&mut self) {
        self.staging.fill(0);
        self.next = 0;
    }

    /// Fail if a vertex was started but not committed.
    pub(crate) fn ensure_idle(&self) -> Result<(), BatchError> {
        if self.next != 0 {
            return Err(BatchError::FormatMismatch(format!(
                "vertex left incomplete after {} of {} attributes",
                self.next,
                self.format.attribute_count()
            )));
        }
        Ok(())
    }

    fn next_attribute(
        &mut self,
        semantic: VertexAttributeSemantic,
    ) -> Result<VertexAttribute, BatchError> {
        let attribute = self.format.attribute(self.next).copied().ok_or_else(|| {
            BatchError::FormatMismatch(format!(
                "{:?} written past the last attribute of {:?}",
                semantic, self.format.label
            ))
        })?;
        if attribute.semantic != semantic {
            return Err(BatchError::FormatMismatch(format!(
                "expected {:?} at attribute {}, got {:?}",
                attribute.semantic, self.next, semantic
            )));
        }
        Ok(attribute)
    }

    fn put(&mut self, attribute: VertexAttribute, bytes: &[u8]) {
        let start = attribute.offset as usize;
        self.staging[start..start + bytes.len()].copy_from_slice(bytes);
        self.next += 1;
    }

    fn unsupported(attribute: VertexAttribute) -> BatchError {
        BatchError::FormatMismatch(format!(
            "{:?} stored as {:?} is not writable from this element",
            attribute.semantic, attribute.format
        ))
    }
}

/// Write access to the open layer.
///
/// Borrows the accumulator; acquire again to keep writing after it is dropped.
#[derive(Debug)]
pub struct VertexSink<'a> {
    buffer: &'a mut VertexBuffer,
    writer: &'a mut VertexWriter,
    stitcher: &'a mut StripStitcher,
}

impl<'a> VertexSink<'a> {
    pub(crate) fn new(
        buffer: &'a mut VertexBuffer,
        writer: &'a mut VertexWriter,
        stitcher: &'a mut StripStitcher,
    ) -> Self {
        Self {
            buffer,
            writer,
            stitcher,
        }
    }

    /// Format of the open layer.
    pub fn format(&self) -> &VertexFormat {
        &self.writer.format
    }

    /// Vertices committed to the open run so far, including stitching.
    pub fn vertex_count(&self) -> usize {
        self.buffer.run_len() / self.writer.format.stride()
    }

    /// Write a float3 position.
    pub fn position(&mut self, x: f32, y: f32, z: f32) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::Position)?;
        match attribute.format {
            VertexAttributeFormat::Float3 => {
                self.writer.put(attribute, bytemuck::bytes_of(&[x, y, z]))
            }
            _ => return Err(VertexWriter::unsupported(attribute)),
        }
        Ok(self)
    }

    /// Write an RGBA color in `0.0..=1.0`.
    pub fn color(&mut self, r: f32, g: f32, b: f32, a: f32) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::Color)?;
        match attribute.format {
            VertexAttributeFormat::Unorm8x4 => {
                self.writer.put(attribute, &pack_color([r, g, b, a]))
            }
            VertexAttributeFormat::Float4 => {
                self.writer.put(attribute, bytemuck::bytes_of(&[r, g, b, a]))
            }
            _ => return Err(VertexWriter::unsupported(attribute)),
        }
        Ok(self)
    }

    /// Write an already packed RGBA color.
    pub fn color_u8(&mut self, rgba: [u8; 4]) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::Color)?;
        match attribute.format {
            VertexAttributeFormat::Unorm8x4 => self.writer.put(attribute, &rgba),
            _ => return Err(VertexWriter::unsupported(attribute)),
        }
        Ok(self)
    }

    /// Write texture coordinates.
    pub fn tex(&mut self, u: f32, v: f32) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::TexCoord0)?;
        match attribute.format {
            VertexAttributeFormat::Float2 => {
                self.writer.put(attribute, bytemuck::bytes_of(&[u, v]))
            }
            _ => return Err(VertexWriter::unsupported(attribute)),
        }
        Ok(self)
    }

    /// Write lightmap coordinates.
    pub fn light(&mut self, u: i16, v: i16) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::TexCoord1)?;
        match attribute.format {
            VertexAttributeFormat::Short2 => {
                self.writer.put(attribute, bytemuck::bytes_of(&[u, v]))
            }
            VertexAttributeFormat::Ushort2 => {
                let (Ok(u), Ok(v)) = (u16::try_from(u), u16::try_from(v)) else {
                    return Err(BatchError::FormatMismatch(format!(
                        "lightmap ({u}, {v}) out of range for unsigned {:?}",
                        attribute.format
                    )));
                };
                self.writer.put(attribute, bytemuck::bytes_of(&[u, v]))
            }
            _ => return Err(VertexWriter::unsupported(attribute)),
        }
        Ok(self)
    }

    /// Write a unit normal.
    pub fn normal(&mut self, x: f32, y: f32, z: f32) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::Normal)?;
        match attribute.format {
            VertexAttributeFormat::Snorm8x4 => {
                let packed = [x, y, z, 0.0].map(|c| (c.clamp(-1.0, 1.0) * 127.0).round() as i8);
                self.writer.put(attribute, bytemuck::bytes_of(&packed))
            }
            VertexAttributeFormat::Float3 => {
                self.writer.put(attribute, bytemuck::bytes_of(&[x, y, z]))
            }
            _ => return Err(VertexWriter::unsupported(attribute)),
        }
        Ok(self)
    }

    /// Skip a padding attribute; its bytes are zeroed.
    pub fn padding(&mut self) -> Result<&mut Self, BatchError> {
        let attribute = self.writer.next_attribute(VertexAttributeSemantic::Padding)?;
        let zeros = [0u8; 16];
        self.writer.put(attribute, &zeros[..attribute.format.size()]);
        Ok(self)
    }

    /// Commit the vertex assembled from element writes.
    pub fn end_vertex(&mut self) -> Result<(), BatchError> {
        let expected = self.writer.format.attribute_count();
        if self.writer.next != expected {
            return Err(BatchError::FormatMismatch(format!(
                "vertex ended after {} of {} attributes",
                self.writer.next, expected
            )));
        }
        self.buffer.write(&self.writer.staging)?;
        self.writer.clear();
        self.stitcher
            .on_vertex(self.buffer, self.writer.format.stride())
    }

    /// Write one whole vertex whose layout matches the format.
    pub fn push_vertex<V: Pod>(&mut self, vertex: &V) -> Result<(), BatchError> {
        self.writer.ensure_idle()?;
        let bytes = bytemuck::bytes_of(vertex);
        let stride = self.writer.format.stride();
        if bytes.len() != stride {
            return Err(BatchError::FormatMismatch(format!(
                "{} byte vertex written to a {} byte format",
                bytes.len(),
                stride
            )));
        }
        self.buffer.write(bytes)?;
        self.stitcher.on_vertex(self.buffer, stride)
    }

    /// Write whole vertices in order.
    pub fn push_vertices<V: Pod>(&mut self, vertices: &[V]) -> Result<(), BatchError> {
        vertices.iter().try_for_each(|v| self.push_vertex(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoryTracking;
    use tessera_core::mesh::PositionColorVertex;

    struct Parts {
        buffer: VertexBuffer,
        writer: VertexWriter,
        stitcher: StripStitcher,
    }

    impl Parts {
        fn new(format: Arc<VertexFormat>) -> Self {
            Self {
                buffer: VertexBuffer::new(64).unwrap(),
                writer: VertexWriter::new(format),
                stitcher: StripStitcher::new(),
            }
        }

        fn sink(&mut self) -> VertexSink<'_> {
            VertexSink::new(&mut self.buffer, &mut self.writer, &mut self.stitcher)
        }
    }

    #[test]
    fn test_element_writes_match_pod_vertex() {
        let mut parts = Parts::new(VertexFormat::position_color());
        let mut sink = parts.sink();
        sink.position(1.0, 2.0, 3.0)
            .unwrap()
            .color(1.0, 0.0, 0.0, 1.0)
            .unwrap()
            .end_vertex()
            .unwrap();
        sink.push_vertex(&PositionColorVertex::new([1.0, 2.0, 3.0], [1.0, 0.0, 0.0, 1.0]))
            .unwrap();
        assert_eq!(sink.vertex_count(), 2);

        let bytes = parts.buffer.as_slice();
        assert_eq!(&bytes[..16], &bytes[16..]);
    }

    #[test]
    fn test_out_of_order_write_rejected() {
        let mut parts = Parts::new(VertexFormat::position_color_tex());
        let mut sink = parts.sink();
        sink.position(0.0, 0.0, 0.0).unwrap();
        let err = sink.tex(0.0, 0.0).unwrap_err();
        assert!(matches!(err, BatchError::FormatMismatch(_)));
    }

    #[test]
    fn test_incomplete_vertex_rejected() {
        let mut parts = Parts::new(VertexFormat::position_color());
        let mut sink = parts.sink();
        sink.position(0.0, 0.0, 0.0).unwrap();
        assert!(sink.end_vertex().is_err());
        assert!(sink.push_vertex(&[0u8; 16]).is_err());
        assert_eq!(parts.buffer.used_bytes(), 0);
    }

    #[test]
    fn test_wrong_size_vertex_rejected() {
        let mut parts = Parts::new(VertexFormat::position_color_tex());
        let mut sink = parts.sink();
        let err = sink
            .push_vertex(&PositionColorVertex::new([0.0; 3], [1.0; 4]))
            .unwrap_err();
        assert!(matches!(err, BatchError::FormatMismatch(_)));
    }

    #[test]
    fn test_full_block_vertex() {
        let mut parts = Parts::new(VertexFormat::position_color_tex_light_normal());
        let mut sink = parts.sink();
        sink.position(1.0, 0.0, 0.0)
            .unwrap()
            .color_u8([10, 20, 30, 255])
            .unwrap()
            .tex(0.5, 0.5)
            .unwrap()
            .light(240, 15)
            .unwrap()
            .normal(0.0, 1.0, 0.0)
            .unwrap()
            .end_vertex()
            .unwrap();

        let bytes = parts.buffer.as_slice();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[12..16], &[10, 20, 30, 255]);
        assert_eq!(&bytes[24..26], &240i16.to_ne_bytes());
        assert_eq!(bytes[29] as i8, 127);
    }

    #[test]
    fn test_negative_unsigned_light_rejected() {
        let format = Arc::new(VertexFormat::packed(&[
            (VertexAttributeSemantic::Position, VertexAttributeFormat::Float3),
            (VertexAttributeSemantic::TexCoord1, VertexAttributeFormat::Ushort2),
        ]));
        let mut parts = Parts::new(format);
        let mut sink = parts.sink();
        sink.position(0.0, 0.0, 0.0).unwrap();

        let err = sink.light(-1, 15).unwrap_err();
        match err {
            BatchError::FormatMismatch(msg) => assert!(msg.contains("out of range"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }

        sink.light(240, 15).unwrap().end_vertex().unwrap();
        assert_eq!(&parts.buffer.as_slice()[12..14], &240u16.to_ne_bytes());
    }

    #[test]
    fn test_padding_zeroed() {
        let format = Arc::new(VertexFormat::packed(&[
            (VertexAttributeSemantic::Position, VertexAttributeFormat::Float3),
            (VertexAttributeSemantic::Padding, VertexAttributeFormat::Float),
        ]));
        let mut parts = Parts::new(format);
        let mut sink = parts.sink();
        sink.position(1.0, 1.0, 1.0)
            .unwrap()
            .padding()
            .unwrap()
            .end_vertex()
            .unwrap();
        assert_eq!(&parts.buffer.as_slice()[12..16], &[0; 4]);
    }
}
