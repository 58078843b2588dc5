//! # Tessera Batching
//!
//! Batched geometry submission: vertex data from many independent draws is
//! accumulated into one buffer, grouped by [`RenderLayer`], and sliced into
//! upload-ready [`BufferSegment`]s once per frame.
//!
//! ## Overview
//!
//! - [`SegmentedAccumulator`] - acquires [`VertexSink`]s per layer and extracts segments
//! - [`StripStitcher`] - degenerate vertices between triangle strips sharing a layer
//! - [`SortScheduler`] - back-to-front primitive order for translucent layers
//! - [`MemoryTracking`] - allocated vs. used bytes
//! - [`SegmentRenderer`] - uploads and draws segments through a [`RenderContext`](tessera_graphics::RenderContext)
//!
//! ## Example
//!
//! ```ignore
//! use tessera_batching::{AccumulatorConfig, RenderLayer, SegmentRenderer, SegmentedAccumulator};
//!
//! let mut accumulator = SegmentedAccumulator::new(AccumulatorConfig::default())?;
//! accumulator.set_sort_origin(camera_position);
//!
//! accumulator.acquire(&solid)?.push_vertices(&terrain)?;
//! accumulator.acquire(&water)?.push_vertices(&water_quads)?;
//!
//! let segments = accumulator.extract()?;
//! renderer.draw_segments(&mut ctx, segments, |ctx, layer| {
//!     let program = &programs[layer.name()];
//!     program.bind(ctx);
//!     program.setup(ctx, &model_view, [1.0; 3], [1.0; 2]);
//!     Ok(())
//! })?;
//! ```

pub mod accumulator;
pub mod buffer;
pub mod config;
pub mod error;
pub mod layer;
pub mod renderer;
pub mod segment;
pub mod sink;
pub mod sort;
pub mod stitch;
pub mod tracker;

pub use accumulator::SegmentedAccumulator;
pub use buffer::{MemoryTracking, VertexBuffer};
pub use config::{AccumulatorConfig, DEFAULT_EXPECTED_LAYERS, DEFAULT_INITIAL_CAPACITY};
pub use error::BatchError;
pub use layer::{BatchingPolicy, RenderLayer};
pub use renderer::{FrameStats, SegmentRenderer};
pub use segment::{BufferSegment, DrawState, OwnedSegment};
pub use sink::VertexSink;
pub use sort::SortScheduler;
pub use stitch::{StripStitcher, strip_triangle_areas};
pub use tracker::{LayerTracker, Run};

/// Batching library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the batching subsystem.
pub fn init() {
    tessera_graphics::init();
    log::info!("Tessera Batching v{} initialized", VERSION);
}

static_assertions::assert_impl_all!(SegmentedAccumulator: Send, Sync);
static_assertions::assert_impl_all!(OwnedSegment: Send, Sync, Clone);
static_assertions::assert_impl_all!(BatchError: Send, Sync, std::error::Error);
