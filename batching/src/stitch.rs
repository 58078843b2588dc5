//! Strip stitcher.
//!
//! Several triangle strips drawn through one open layer end up back to back
//! in the same run. Without separation the rasterizer would connect the end
//! of one strip to the start of the next. The stitcher repeats the last
//! vertex of the previous strip and the first vertex of the next one, so the
//! triangles spanning the seam have zero area:
//!
//! ```text
//! a b c d | e f g   ->   a b c d d e e f g
//! ```
//!
//! Two vertices are inserted per seam whatever the strip length, so a strip
//! with an odd vertex count leaves the next strip starting on an odd
//! triangle index and its winding flipped:
//!
//! ```text
//! a b c | e f g   ->   a b c c e e f g     (e f g is triangle 5)
//! ```
//!
//! Layers drawn with back-face culling should submit even-length strips.

use tessera_core::math::Vec3;
use tessera_core::mesh::VertexFormat;

use crate::buffer::VertexBuffer;
use crate::error::BatchError;

/// Inserts degenerate vertices between triangle strips sharing a run.
#[derive(Debug, Default)]
pub struct StripStitcher {
    /// Repeat the next committed vertex.
    armed: bool,
}

impl StripStitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next committed vertex will be repeated.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Called on every triangle-strip acquisition.
    ///
    /// Repeats the last vertex of the open run, if there is one, and arms
    /// the stitcher so the next committed vertex is repeated too.
    pub fn on_acquire(&mut self, buffer: &mut VertexBuffer, stride: usize) -> Result<(), BatchError> {
        let run_len = buffer.run_len();
        if run_len == 0 || self.armed {
            return Ok(());
        }
        if run_len % stride != 0 {
            return Err(BatchError::MalformedRun(format!(
                "{run_len} bytes is not a whole number of {stride} byte vertices"
            )));
        }
        buffer.repeat_tail(stride)?;
        self.armed = true;
        Ok(())
    }

    /// Called after each committed vertex.
    pub fn on_vertex(&mut self, buffer: &mut VertexBuffer, stride: usize) -> Result<(), BatchError> {
        if self.armed {
            self.armed = false;
            buffer.repeat_tail(stride)?;
        }
        Ok(())
    }

    /// Called before the run is sealed.
    ///
    /// A seam with no strip after it is dropped again.
    pub fn finish(&mut self, buffer: &mut VertexBuffer, stride: usize) {
        if self.armed {
            self.armed = false;
            buffer.truncate_run(stride);
        }
    }

    pub fn reset(&mut self) {
        self.armed = false;
    }
}

/// Area of every triangle a strip of vertices rasterizes to.
///
/// Triangle `i` is formed by vertices `i`, `i + 1` and `i + 2`.
pub fn strip_triangle_areas(bytes: &[u8], format: &VertexFormat) -> Result<Vec<f32>, BatchError> {
    let stride = format.stride();
    let offset = format.position_offset().ok_or_else(|| {
        BatchError::FormatMismatch("format has no float3 position".to_string())
    })?;
    if stride == 0 || bytes.len() % stride != 0 {
        return Err(BatchError::MalformedRun(format!(
            "{} bytes is not a whole number of {} byte vertices",
            bytes.len(),
            stride
        )));
    }

    let positions: Vec<Vec3> = bytes
        .chunks_exact(stride)
        .map(|vertex| Vec3::from(read_position(vertex, offset)))
        .collect();

    Ok(positions
        .windows(3)
        .map(|t| (t[1] - t[0]).cross(&(t[2] - t[0])).norm() * 0.5)
        .collect())
}

/// Read a float3 position at `offset` within one vertex.
#[inline]
pub(crate) fn read_position(vertex: &[u8], offset: usize) -> [f32; 3] {
    bytemuck::pod_read_unaligned(&vertex[offset..offset + 12])
}
