//! Buffer handles and usage flags.

use bitflags::bitflags;

bitflags! {
    /// Usage flags for uploaded buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be used as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be copied to.
        const COPY_DST = 1 << 1;
        /// Buffer is written once and drawn once (per-frame streaming data).
        const STREAM = 1 << 2;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::empty()
    }
}

impl BufferUsage {
    /// Usage for per-frame segment uploads.
    pub fn streaming_vertices() -> Self {
        Self::VERTEX | Self::STREAM
    }
}

/// Handle to an uploaded GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

impl BufferHandle {
    /// Create a handle from a raw backend id.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw backend id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_usage() {
        let usage = BufferUsage::streaming_vertices();
        assert!(usage.contains(BufferUsage::VERTEX));
        assert!(usage.contains(BufferUsage::STREAM));
        assert!(!usage.contains(BufferUsage::COPY_DST));
    }

    #[test]
    fn test_default_usage_is_empty() {
        assert!(BufferUsage::default().is_empty());
    }
}
