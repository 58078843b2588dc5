//! Shared layers and vertex helpers for batching integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tessera_batching::{AccumulatorConfig, RenderLayer, SegmentedAccumulator};
use tessera_core::mesh::{PositionColorVertex, PrimitiveTopology, VertexFormat};

/// Initialize logging once; repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Small accumulator so growth happens within a test.
pub fn accumulator() -> SegmentedAccumulator {
    init_logging();
    SegmentedAccumulator::new(AccumulatorConfig::new().with_initial_capacity(256))
        .expect("accumulator allocation")
}

pub fn layer(name: &str, topology: PrimitiveTopology) -> RenderLayer {
    RenderLayer::new(name, topology, VertexFormat::position_color())
}

pub fn triangles(name: &str) -> RenderLayer {
    layer(name, PrimitiveTopology::TriangleList)
}

pub fn format() -> Arc<VertexFormat> {
    VertexFormat::position_color()
}

/// A vertex whose red channel carries `tag`, so it can be recognized later.
pub fn tagged(position: [f32; 3], tag: u8) -> PositionColorVertex {
    PositionColorVertex {
        position,
        color: [tag, 0, 0, 255],
    }
}

/// `count` vertices along the x axis, tagged by index.
pub fn run_of(count: usize) -> Vec<PositionColorVertex> {
    (0..count)
        .map(|i| tagged([i as f32, 0.0, 0.0], i as u8))
        .collect()
}

/// A triangle centered near `(0, 0, z)`.
pub fn triangle_at(z: f32, tag: u8) -> [PositionColorVertex; 3] {
    [
        tagged([-1.0, -1.0, z], tag),
        tagged([1.0, -1.0, z], tag),
        tagged([0.0, 1.0, z], tag),
    ]
}

/// A quad centered at `center`.
pub fn quad_at(center: [f32; 3], tag: u8) -> [PositionColorVertex; 4] {
    let [x, y, z] = center;
    [
        tagged([x - 0.5, y - 0.5, z], tag),
        tagged([x + 0.5, y - 0.5, z], tag),
        tagged([x + 0.5, y + 0.5, z], tag),
        tagged([x - 0.5, y + 0.5, z], tag),
    ]
}

/// Decode segment bytes back into vertices.
pub fn decode(bytes: &[u8]) -> Vec<PositionColorVertex> {
    bytes
        .chunks_exact(std::mem::size_of::<PositionColorVertex>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

/// Tag of every vertex in `bytes`.
pub fn tags(bytes: &[u8]) -> Vec<u8> {
    decode(bytes).iter().map(|v| v.color[0]).collect()
}
