//! Segmented accumulator: one growable buffer, sliced per render layer.
//!
//! Consumers acquire a [`VertexSink`] for a layer and write vertices. When
//! the requested layer differs from the open one, the open layer is sealed
//! first: sorted if it asks for it, then closed as a run. [`extract`]
//! seals the last layer and returns one [`BufferSegment`] per run, in
//! first-use order, ending the session.
//!
//! ```ignore
//! let mut accumulator = SegmentedAccumulator::new(AccumulatorConfig::default())?;
//!
//! accumulator.acquire(&opaque)?.push_vertices(&quads)?;
//! accumulator.acquire(&translucent)?.push_vertices(&water)?;
//!
//! for segment in accumulator.extract()? {
//!     // upload and draw
//! }
//! ```
//!
//! [`extract`]: SegmentedAccumulator::extract

use tessera_core::mesh::VertexFormat;
use tessera_core::profiling::{profile_plot, profile_scope};

use crate::buffer::{MemoryTracking, VertexBuffer};
use crate::config::AccumulatorConfig;
use crate::error::BatchError;
use crate::layer::{BatchingPolicy, RenderLayer};
use crate::segment::{BufferSegment, DrawState};
use crate::sink::{VertexSink, VertexWriter};
use crate::sort::SortScheduler;
use crate::stitch::StripStitcher;
use crate::tracker::LayerTracker;

/// Batches vertices from many draws into per-layer segments.
#[derive(Debug)]
pub struct SegmentedAccumulator {
    buffer: VertexBuffer,
    tracker: LayerTracker,
    writer: VertexWriter,
    stitcher: StripStitcher,
    sorter: SortScheduler,
}

impl SegmentedAccumulator {
    /// Create an accumulator, allocating its initial buffer.
    pub fn new(config: AccumulatorConfig) -> Result<Self, BatchError> {
        log::debug!(
            "Creating accumulator: {} bytes, {} layers reserved",
            config.initial_capacity,
            config.expected_layers
        );
        Ok(Self {
            buffer: VertexBuffer::new(config.initial_capacity)?,
            tracker: LayerTracker::with_capacity(config.expected_layers),
            writer: VertexWriter::new(VertexFormat::position_color()),
            stitcher: StripStitcher::new(),
            sorter: SortScheduler::new(config.sort_origin),
        })
    }

    /// Get a sink for `layer`, sealing the open layer if it differs.
    ///
    /// Acquiring the open layer again is free, except for triangle strips
    /// (a stitching seam is inserted) and line strips (each acquisition is
    /// its own segment). Acquiring a layer already sealed this session
    /// fails with [`BatchError::LayerReuse`] and leaves the session intact.
    pub fn acquire(&mut self, layer: &RenderLayer) -> Result<VertexSink<'_>, BatchError> {
        if self.tracker.is_current(layer) {
            if layer.batching_policy() == BatchingPolicy::SealPerDraw && self.buffer.run_len() > 0
            {
                self.seal_current()?;
                self.open(layer);
            }
        } else {
            self.tracker.check_reuse(layer)?;
            layer.validate()?;
            self.seal_current()?;
            self.open(layer);
        }

        if layer.topology().is_triangle_strip() {
            self.stitcher.on_acquire(&mut self.buffer, layer.stride())?;
        }

        Ok(VertexSink::new(
            &mut self.buffer,
            &mut self.writer,
            &mut self.stitcher,
        ))
    }

    /// Seal the open layer and return every run as a segment.
    ///
    /// Returns an empty list if nothing was acquired. Afterwards the session
    /// is reset: no open layer, no runs, zero used bytes. Capacity is kept.
    pub fn extract(&mut self) -> Result<Vec<BufferSegment<'_>>, BatchError> {
        profile_scope!("extract_segments");

        if self.tracker.current().is_none() {
            return Ok(Vec::new());
        }
        self.seal_current()?;

        let used = self.buffer.used_bytes();
        let allocated = self.buffer.allocated_bytes();
        profile_plot!("batching: used bytes", used);
        profile_plot!("batching: allocated bytes", allocated);

        self.buffer.reset();
        self.stitcher.reset();

        let storage = self.buffer.storage();
        let segments: Vec<BufferSegment<'_>> = self
            .tracker
            .drain_runs()
            .map(|run| {
                let draw_state = DrawState::new(
                    run.vertex_count,
                    run.layer.topology(),
                    run.layer.format().clone(),
                );
                BufferSegment::new(&storage[run.range], draw_state, run.layer)
            })
            .collect();

        log::debug!(
            "Extracted {} segments ({} of {} bytes used)",
            segments.len(),
            used,
            allocated
        );
        Ok(segments)
    }

    /// Drop everything written this session without producing segments.
    pub fn discard(&mut self) {
        log::debug!(
            "Discarding session with {} bytes",
            self.buffer.used_bytes()
        );
        self.tracker.reset();
        self.buffer.reset();
        self.stitcher.reset();
        self.writer.clear();
    }

    /// The open layer.
    pub fn current_layer(&self) -> Option<&RenderLayer> {
        self.tracker.current()
    }

    /// Layers used this session in first-use order, open layer last.
    ///
    /// Line-strip layers appear once per draw.
    pub fn used_layers(&self) -> impl Iterator<Item = &RenderLayer> {
        self.tracker
            .runs()
            .iter()
            .map(|run| &run.layer)
            .chain(self.tracker.current())
    }

    pub fn sort_origin(&self) -> [f32; 3] {
        self.sorter.origin()
    }

    /// Set the reference point translucent layers are sorted against.
    ///
    /// Applies to every layer sealed afterwards, including the open one.
    pub fn set_sort_origin(&mut self, origin: [f32; 3]) {
        self.sorter.set_origin(origin);
    }

    fn open(&mut self, layer: &RenderLayer) {
        log::trace!("Opening layer {:?}", layer.name());
        self.buffer.begin_run();
        self.writer.reset(layer.format().clone());
        self.stitcher.reset();
        self.tracker.open(layer.clone());
    }

    fn seal_current(&mut self) -> Result<(), BatchError> {
        let Some(layer) = self.tracker.current() else {
            return Ok(());
        };
        self.writer.ensure_idle()?;

        let stride = layer.stride();
        if layer.topology().is_triangle_strip() {
            self.stitcher.finish(&mut self.buffer, stride);
        }
        if self.buffer.run_len() % stride != 0 {
            return Err(BatchError::MalformedRun(format!(
                "layer {:?} holds {} bytes, not a multiple of {}",
                layer.name(),
                self.buffer.run_len(),
                stride
            )));
        }
        if self.sorter.seal(layer, self.buffer.run_mut())? {
            log::trace!("Sorted layer {:?}", layer.name());
        }

        let range = self.buffer.end_run();
        let vertex_count = range.len() / stride;
        self.tracker.seal(range, vertex_count);
        Ok(())
    }
}

impl MemoryTracking for SegmentedAccumulator {
    fn allocated_bytes(&self) -> usize {
        self.buffer.allocated_bytes()
    }

    fn used_bytes(&self) -> usize {
        self.buffer.used_bytes()
    }
}
