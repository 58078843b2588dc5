//! Render layers: the key geometry is grouped by.

use std::sync::Arc;

use tessera_core::mesh::{PrimitiveTopology, VertexFormat};

use crate::error::BatchError;

/// How acquisitions of a layer map onto segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchingPolicy {
    /// Consecutive draws share one segment.
    Batched,
    /// Every acquisition starts a new segment.
    ///
    /// Used for line strips: no degenerate vertex can separate two of them,
    /// so each draw is sealed on its own.
    SealPerDraw,
}

/// A material/pipeline configuration geometry is batched under.
///
/// Layers are compared by value. Two layers with the same name, topology,
/// format and sort flag are the same layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderLayer {
    name: Arc<str>,
    topology: PrimitiveTopology,
    format: Arc<VertexFormat>,
    sort_on_upload: bool,
}

impl RenderLayer {
    /// Create an opaque layer.
    pub fn new(
        name: impl Into<Arc<str>>,
        topology: PrimitiveTopology,
        format: Arc<VertexFormat>,
    ) -> Self {
        Self {
            name: name.into(),
            topology,
            format,
            sort_on_upload: false,
        }
    }

    /// Set whether primitives are reordered back-to-front before sealing.
    pub fn with_sort_on_upload(mut self, sort: bool) -> Self {
        self.sort_on_upload = sort;
        self
    }

    /// Shorthand for `with_sort_on_upload(true)`.
    pub fn translucent(self) -> Self {
        self.with_sort_on_upload(true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn format(&self) -> &Arc<VertexFormat> {
        &self.format
    }

    pub fn stride(&self) -> usize {
        self.format.stride()
    }

    pub fn sort_on_upload(&self) -> bool {
        self.sort_on_upload
    }

    pub fn batching_policy(&self) -> BatchingPolicy {
        if self.topology.is_line_strip() {
            BatchingPolicy::SealPerDraw
        } else {
            BatchingPolicy::Batched
        }
    }

    /// Check that geometry for this layer can be accumulated and, if
    /// flagged, sorted.
    pub fn validate(&self) -> Result<(), BatchError> {
        self.format
            .validate()
            .map_err(|e| BatchError::InvalidLayer(format!("{}: {}", self.name, e)))?;

        if self.sort_on_upload {
            if self.topology.vertices_per_primitive().is_none() {
                return Err(BatchError::UnsortableLayer(format!(
                    "{}: {:?} has no fixed primitive size",
                    self.name, self.topology
                )));
            }
            if self.format.position_offset().is_none() {
                return Err(BatchError::UnsortableLayer(format!(
                    "{}: format has no float3 position",
                    self.name
                )));
            }
        }
        Ok(())
    }
}
