//! End-to-end tests: accumulate, extract, then draw through the dummy
//! context with a forward program per layer.

mod common;

use std::collections::HashMap;

use rstest::rstest;

use common::{accumulator, layer, run_of, triangle_at};
use tessera_batching::{BatchError, FrameStats, RenderLayer, SegmentRenderer};
use tessera_core::math::Mat4;
use tessera_core::mesh::PrimitiveTopology;
use tessera_graphics::shader::uniforms;
use tessera_graphics::{
    BufferUsage, DummyContext, FogMode, FogState, ForwardProgram, GraphicsError, RecordedCall,
    RenderContext, UniformValue, fog_factory,
};

const CHUNK_UNIFORMS: &[&str] = &[
    uniforms::MODEL_VIEW_PROJECTION,
    uniforms::MODEL_SCALE,
    uniforms::TEXTURE_SCALE,
    uniforms::BLOCK_TEXTURE,
    uniforms::LIGHT_TEXTURE,
    uniforms::FOG_COLOR,
    uniforms::FOG_LENGTH,
    uniforms::FOG_END,
];

struct Scene {
    ctx: DummyContext,
    programs: HashMap<String, ForwardProgram>,
}

impl Scene {
    fn new(layers: &[&RenderLayer], fog: FogState) -> Self {
        let mut ctx = DummyContext::new();
        ctx.set_fog_state(fog);
        let programs = layers
            .iter()
            .map(|layer| {
                let handle = ctx.create_program(layer.name(), CHUNK_UNIFORMS);
                let program = ForwardProgram::new(&ctx, handle, layer.name(), fog_factory(fog.mode));
                (layer.name().to_string(), program)
            })
            .collect();
        Self { ctx, programs }
    }

    fn draw(
        &mut self,
        renderer: &mut SegmentRenderer,
        segments: Vec<tessera_batching::BufferSegment<'_>>,
    ) -> Result<FrameStats, BatchError> {
        let programs = &self.programs;
        renderer.draw_segments(&mut self.ctx, segments, |ctx, layer| {
            let program = programs.get(layer.name()).ok_or_else(|| {
                BatchError::InvalidLayer(format!("no program for {}", layer.name()))
            })?;
            program.bind(ctx);
            program.setup(ctx, &Mat4::identity(), [1.0; 3], [1.0; 2]);
            Ok(())
        })
    }
}

/// Segments are bound and drawn in extraction order, and every buffer is released.
#[rstest]
fn test_frame_draws_segments_in_order() {
    let solid = layer("solid", PrimitiveTopology::TriangleList);
    let glass = layer("glass", PrimitiveTopology::TriangleList).translucent();
    let mut scene = Scene::new(&[&solid, &glass], FogState::default());
    let mut renderer = SegmentRenderer::new();
    let mut acc = accumulator();

    acc.acquire(&solid).unwrap().push_vertices(&run_of(6)).unwrap();
    let mut glass_triangles = Vec::new();
    glass_triangles.extend(triangle_at(-2.0, 1));
    glass_triangles.extend(triangle_at(-8.0, 2));
    acc.acquire(&glass)
        .unwrap()
        .push_vertices(&glass_triangles)
        .unwrap();

    let segments = acc.extract().unwrap();
    let stats = scene.draw(&mut renderer, segments).unwrap();

    assert_eq!(
        stats,
        FrameStats {
            segments_drawn: 2,
            vertices: 12,
            bytes_uploaded: 12 * 16,
            segments_skipped: 0,
        }
    );
    assert_eq!(renderer.last_frame(), stats);

    // Program binds and draws alternate in extraction order
    let bound: Vec<&str> = scene
        .ctx
        .calls()
        .iter()
        .filter_map(|call| match call {
            RecordedCall::UseProgram(Some(handle)) => scene.ctx.program_name(*handle),
            _ => None,
        })
        .collect();
    assert_eq!(bound, vec!["solid", "glass"]);
    assert_eq!(scene.ctx.draw_calls().count(), 2);
    assert_eq!(scene.ctx.live_buffer_count(), 0);
}

/// All per-draw uniforms, fog included, are uploaded before the draw call.
#[rstest]
fn test_uniforms_set_before_each_draw() {
    let solid = layer("solid", PrimitiveTopology::TriangleList);
    let fog = FogState::linear([0.5; 4], 8.0, 40.0);
    let mut scene = Scene::new(&[&solid], fog);
    let mut acc = accumulator();

    acc.acquire(&solid).unwrap().push_vertices(&run_of(3)).unwrap();
    let segments = acc.extract().unwrap();
    scene.draw(&mut SegmentRenderer::new(), segments).unwrap();

    let calls = scene.ctx.calls();
    let draw_index = calls
        .iter()
        .position(|call| matches!(call, RecordedCall::Draw { .. }))
        .unwrap();
    let uniforms_before = calls[..draw_index]
        .iter()
        .filter(|call| matches!(call, RecordedCall::Uniform { .. }))
        .count();
    // Two samplers, two scales, three fog values, one matrix
    assert_eq!(uniforms_before, 8);

    let handle = scene.programs["solid"].program().handle();
    assert_eq!(
        scene.ctx.last_uniform(handle, uniforms::FOG_LENGTH),
        Some(UniformValue::Float(32.0))
    );
    assert_eq!(scene.programs["solid"].fog_mode(), FogMode::Linear);
}

/// The uploaded byte count and draw state match the extracted segment.
#[rstest]
fn test_uploaded_bytes_match_segments() {
    let solid = layer("solid", PrimitiveTopology::TriangleList);
    let mut scene = Scene::new(&[&solid], FogState::default());
    let mut acc = accumulator();
    let vertices = run_of(9);

    acc.acquire(&solid).unwrap().push_vertices(&vertices).unwrap();
    let segments = acc.extract().unwrap();
    let expected = segments[0].bytes().to_vec();
    scene.draw(&mut SegmentRenderer::new(), segments).unwrap();

    let upload = scene.ctx.calls().iter().find_map(|call| match call {
        RecordedCall::Upload { len, usage, .. } => Some((*len, *usage)),
        _ => None,
    });
    assert_eq!(
        upload,
        Some((expected.len(), BufferUsage::streaming_vertices()))
    );
    assert_eq!(
        scene.ctx.calls().iter().find_map(|call| match call {
            RecordedCall::Draw {
                count, topology, ..
            } => Some((*count, *topology)),
            _ => None,
        }),
        Some((9, PrimitiveTopology::TriangleList))
    );
}

/// A renderer configured with explicit usage flags uploads every segment with them.
#[rstest]
fn test_custom_usage_passed_to_upload() {
    let a = layer("a", PrimitiveTopology::TriangleList);
    let b = layer("b", PrimitiveTopology::TriangleList);
    let mut scene = Scene::new(&[&a, &b], FogState::default());
    let mut renderer = SegmentRenderer::new().with_usage(BufferUsage::VERTEX);
    let mut acc = accumulator();

    acc.acquire(&a).unwrap().push_vertices(&run_of(3)).unwrap();
    acc.acquire(&b).unwrap().push_vertices(&run_of(6)).unwrap();
    let segments = acc.extract().unwrap();
    scene.draw(&mut renderer, segments).unwrap();

    let uploads: Vec<(usize, BufferUsage)> = scene
        .ctx
        .take_calls()
        .into_iter()
        .filter_map(|call| match call {
            RecordedCall::Upload { len, usage, .. } => Some((len, usage)),
            _ => None,
        })
        .collect();
    assert_eq!(
        uploads,
        vec![(3 * 16, BufferUsage::VERTEX), (6 * 16, BufferUsage::VERTEX)]
    );
    assert!(scene.ctx.calls().is_empty());
}

/// Empty segments are counted as skipped and never uploaded.
#[rstest]
fn test_empty_layers_skipped() {
    let empty = layer("empty", PrimitiveTopology::TriangleList);
    let solid = layer("solid", PrimitiveTopology::TriangleList);
    let mut scene = Scene::new(&[&empty, &solid], FogState::default());
    let mut acc = accumulator();

    acc.acquire(&empty).unwrap();
    acc.acquire(&solid).unwrap().push_vertices(&run_of(3)).unwrap();
    let segments = acc.extract().unwrap();
    assert_eq!(segments.len(), 2);

    let stats = scene.draw(&mut SegmentRenderer::new(), segments).unwrap();
    assert_eq!(stats.segments_drawn, 1);
    assert_eq!(stats.segments_skipped, 1);
}

/// A failed upload ends the frame with the context error and leaks no buffers.
#[rstest]
#[case::first_upload(0, 0)]
#[case::second_upload(1, 1)]
fn test_upload_failure_stops_frame(#[case] successful: usize, #[case] drawn: usize) {
    let a = layer("a", PrimitiveTopology::TriangleList);
    let b = layer("b", PrimitiveTopology::TriangleList);
    let mut scene = Scene::new(&[&a, &b], FogState::default());
    scene.ctx.fail_uploads_after(successful);
    let mut acc = accumulator();

    acc.acquire(&a).unwrap().push_vertices(&run_of(3)).unwrap();
    acc.acquire(&b).unwrap().push_vertices(&run_of(3)).unwrap();
    let segments = acc.extract().unwrap();

    let err = scene.draw(&mut SegmentRenderer::new(), segments).unwrap_err();
    assert_eq!(err, BatchError::Graphics(GraphicsError::OutOfMemory));
    assert_eq!(scene.ctx.draw_calls().count(), drawn);
    assert_eq!(scene.ctx.live_buffer_count(), 0);
}

/// An error from the layer setup callback stops the frame before any GPU call.
#[rstest]
fn test_setup_error_stops_frame() {
    let known = layer("known", PrimitiveTopology::TriangleList);
    let unknown = layer("unknown", PrimitiveTopology::TriangleList);
    let mut scene = Scene::new(&[&known], FogState::default());
    let mut acc = accumulator();

    acc.acquire(&unknown).unwrap().push_vertices(&run_of(3)).unwrap();
    let segments = acc.extract().unwrap();

    let err = scene.draw(&mut SegmentRenderer::new(), segments).unwrap_err();
    assert!(matches!(err, BatchError::InvalidLayer(_)));
    assert!(scene.ctx.calls().is_empty());
    assert_eq!(scene.ctx.name(), "Dummy");
}

/// Owned segments can be drawn while the accumulator is already refilling.
#[rstest]
fn test_owned_segments_can_be_drawn_later() {
    let solid = layer("solid", PrimitiveTopology::TriangleList);
    let mut scene = Scene::new(&[&solid], FogState::default());
    let mut acc = accumulator();

    acc.acquire(&solid).unwrap().push_vertices(&run_of(3)).unwrap();
    let owned: Vec<_> = acc
        .extract()
        .unwrap()
        .into_iter()
        .map(|s| s.into_owned())
        .collect();

    // Next session already under way
    acc.acquire(&solid).unwrap().push_vertices(&run_of(6)).unwrap();

    let stats = scene
        .draw(
            &mut SegmentRenderer::new(),
            owned.iter().map(|s| s.as_segment()).collect(),
        )
        .unwrap();
    assert_eq!(stats.vertices, 3);
}
