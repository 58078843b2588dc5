//! Sort scheduler: back-to-front ordering of translucent runs.

use std::cmp::Ordering;

use tessera_core::math::distance_squared;
use tessera_core::mesh::{PrimitiveTopology, VertexFormat};
use tessera_core::profiling::profile_scope;

use crate::error::BatchError;
use crate::layer::RenderLayer;
use crate::stitch::read_position;

#[derive(Debug, Clone, Copy)]
struct PrimitiveKey {
    distance: f32,
    index: usize,
}

/// Reorders whole primitives of a run by distance to a reference point.
///
/// Farther primitives come first. Primitives at equal distance keep their
/// submission order. Scratch storage is kept between runs.
#[derive(Debug, Default)]
pub struct SortScheduler {
    origin: [f32; 3],
    keys: Vec<PrimitiveKey>,
    scratch: Vec<u8>,
}

impl SortScheduler {
    pub fn new(origin: [f32; 3]) -> Self {
        Self {
            origin,
            keys: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn origin(&self) -> [f32; 3] {
        self.origin
    }

    pub fn set_origin(&mut self, origin: [f32; 3]) {
        self.origin = origin;
    }

    /// Sort `run` if `layer` asks for it. Returns whether it was sorted.
    pub fn seal(&mut self, layer: &RenderLayer, run: &mut [u8]) -> Result<bool, BatchError> {
        if !layer.sort_on_upload() {
            return Ok(false);
        }
        self.sort_primitives(run, layer.format(), layer.topology())?;
        Ok(true)
    }

    /// Reorder the primitives in `run` back-to-front.
    pub fn sort_primitives(
        &mut self,
        run: &mut [u8],
        format: &VertexFormat,
        topology: PrimitiveTopology,
    ) -> Result<(), BatchError> {
        profile_scope!("sort_primitives");

        let per_primitive = topology.vertices_per_primitive().ok_or_else(|| {
            BatchError::UnsortableLayer(format!("{topology:?} has no fixed primitive size"))
        })? as usize;
        let position = format.position_offset().ok_or_else(|| {
            BatchError::UnsortableLayer("format has no float3 position".to_string())
        })?;
        let stride = format.stride();
        let primitive_size = per_primitive * stride;
        if primitive_size == 0 || run.len() % primitive_size != 0 {
            return Err(BatchError::MalformedRun(format!(
                "{} bytes is not a whole number of {} byte primitives",
                run.len(),
                primitive_size
            )));
        }

        let origin = self.origin;
        self.keys.clear();
        self.keys
            .extend(run.chunks_exact(primitive_size).enumerate().map(|(index, primitive)| {
                let mut centroid = [0.0f32; 3];
                for vertex in primitive.chunks_exact(stride) {
                    let p = read_position(vertex, position);
                    centroid[0] += p[0];
                    centroid[1] += p[1];
                    centroid[2] += p[2];
                }
                let n = per_primitive as f32;
                let centroid = [centroid[0] / n, centroid[1] / n, centroid[2] / n];
                PrimitiveKey {
                    distance: distance_squared(centroid, origin),
                    index,
                }
            }));

        // Stable, so equal distances keep submission order
        self.keys.sort_by(|a, b| {
            b.distance
                .partial_cmp(&a.distance)
                .unwrap_or(Ordering::Equal)
        });

        if self.keys.iter().enumerate().all(|(i, key)| key.index == i) {
            return Ok(());
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(run);
        for (slot, key) in self.keys.iter().enumerate() {
            let src = key.index * primitive_size;
            let dst = slot * primitive_size;
            run[dst..dst + primitive_size]
                .copy_from_slice(&self.scratch[src..src + primitive_size]);
        }
        log::trace!(
            "Sorted {} primitives against {:?}",
            self.keys.len(),
            origin
        );
        Ok(())
    }
}
