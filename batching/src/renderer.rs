//! Segment submission.
//!
//! Each segment is uploaded as its own vertex buffer and drawn with one
//! non-indexed draw call, in extraction order. The buffer is released right
//! after the draw.

use tessera_core::profiling::{profile_plot, profile_scope};
use tessera_graphics::{BufferUsage, RenderContext};

use crate::error::BatchError;
use crate::layer::RenderLayer;
use crate::segment::BufferSegment;

/// Counters for one [`SegmentRenderer::draw_segments`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub segments_drawn: usize,
    pub vertices: usize,
    pub bytes_uploaded: usize,
    /// Segments with no vertices; nothing is uploaded for them.
    pub segments_skipped: usize,
}

impl FrameStats {
    /// Add another call's counters to these.
    pub fn accumulate(&mut self, other: &FrameStats) {
        self.segments_drawn += other.segments_drawn;
        self.vertices += other.vertices;
        self.bytes_uploaded += other.bytes_uploaded;
        self.segments_skipped += other.segments_skipped;
    }
}

/// Uploads and draws extracted segments.
#[derive(Debug)]
pub struct SegmentRenderer {
    usage: BufferUsage,
    last_frame: FrameStats,
}

impl Default for SegmentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentRenderer {
    /// Create a renderer that uploads with streaming vertex buffers.
    pub fn new() -> Self {
        Self {
            usage: BufferUsage::streaming_vertices(),
            last_frame: FrameStats::default(),
        }
    }

    /// Override the usage flags passed to uploads.
    pub fn with_usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Counters from the most recent call.
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Draw `segments` in order.
    ///
    /// `setup` runs before each non-empty segment is drawn and must bind
    /// the layer's program and upload its per-draw uniforms. Segments are
    /// consumed; the first error stops submission.
    pub fn draw_segments<'a, I, F>(
        &mut self,
        ctx: &mut dyn RenderContext,
        segments: I,
        mut setup: F,
    ) -> Result<FrameStats, BatchError>
    where
        I: IntoIterator<Item = BufferSegment<'a>>,
        F: FnMut(&mut dyn RenderContext, &RenderLayer) -> Result<(), BatchError>,
    {
        profile_scope!("draw_segments");

        let mut stats = FrameStats::default();
        for segment in segments {
            if segment.is_empty() {
                stats.segments_skipped += 1;
                continue;
            }
            let count = u32::try_from(segment.vertex_count()).map_err(|_| {
                BatchError::MalformedRun(format!(
                    "{} vertices exceed a single draw",
                    segment.vertex_count()
                ))
            })?;

            setup(ctx, segment.layer())?;

            let state = segment.draw_state();
            let buffer = ctx.upload_vertices(segment.bytes(), self.usage)?;
            let drawn = ctx.draw_arrays(buffer, &state.format, state.topology, 0, count);
            ctx.release_buffer(buffer);
            drawn?;

            stats.segments_drawn += 1;
            stats.vertices += segment.vertex_count();
            stats.bytes_uploaded += segment.byte_len();
        }

        profile_plot!("batching: segments drawn", stats.segments_drawn);
        log::trace!(
            "Drew {} segments, {} vertices, {} skipped",
            stats.segments_drawn,
            stats.vertices,
            stats.segments_skipped
        );
        self.last_frame = stats;
        Ok(stats)
    }
}
