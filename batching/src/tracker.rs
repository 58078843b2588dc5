//! Layer tracker: the open layer and the runs sealed before it.

use std::collections::HashSet;
use std::ops::Range;

use crate::error::BatchError;
use crate::layer::{BatchingPolicy, RenderLayer};

/// A sealed stretch of the vertex buffer belonging to one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub layer: RenderLayer,
    /// Byte range in the vertex buffer.
    pub range: Range<usize>,
    pub vertex_count: usize,
}

/// Records layer transitions within one session.
///
/// Runs are kept in first-use order. A batched layer can be open at most
/// once per session; seal-per-draw layers produce one run per draw.
#[derive(Debug, Default)]
pub struct LayerTracker {
    current: Option<RenderLayer>,
    runs: Vec<Run>,
    sealed: HashSet<RenderLayer>,
}

impl LayerTracker {
    pub fn with_capacity(layers: usize) -> Self {
        Self {
            current: None,
            runs: Vec::with_capacity(layers),
            sealed: HashSet::with_capacity(layers),
        }
    }

    /// The open layer, if any.
    pub fn current(&self) -> Option<&RenderLayer> {
        self.current.as_ref()
    }

    pub fn is_current(&self, layer: &RenderLayer) -> bool {
        self.current.as_ref() == Some(layer)
    }

    /// Sealed runs in first-use order.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Fail if `layer` was already sealed this session.
    pub fn check_reuse(&self, layer: &RenderLayer) -> Result<(), BatchError> {
        if layer.batching_policy() == BatchingPolicy::Batched && self.sealed.contains(layer) {
            return Err(BatchError::LayerReuse(layer.name().to_string()));
        }
        Ok(())
    }

    /// Make `layer` the open layer. The previous one must have been sealed.
    pub fn open(&mut self, layer: RenderLayer) {
        debug_assert!(self.current.is_none(), "open layer was not sealed");
        self.current = Some(layer);
    }

    /// Seal the open layer as a run covering `range`.
    pub fn seal(&mut self, range: Range<usize>, vertex_count: usize) {
        let Some(layer) = self.current.take() else {
            return;
        };
        log::trace!(
            "Sealed layer {:?}: {} vertices, bytes {:?}",
            layer.name(),
            vertex_count,
            range
        );
        if layer.batching_policy() == BatchingPolicy::Batched {
            self.sealed.insert(layer.clone());
        }
        self.runs.push(Run {
            layer,
            range,
            vertex_count,
        });
    }

    /// Remove all runs, keeping allocations for the next session.
    pub fn drain_runs(&mut self) -> std::vec::Drain<'_, Run> {
        self.current = None;
        self.sealed.clear();
        self.runs.drain(..)
    }

    /// Forget everything recorded this session.
    pub fn reset(&mut self) {
        self.current = None;
        self.sealed.clear();
        self.runs.clear();
    }
}
