//! Growable byte buffer that vertex runs are written into.

use std::ops::Range;

use crate::error::BatchError;

/// Allocated vs. used byte counts, for diagnostics and capacity planning.
pub trait MemoryTracking {
    /// Bytes currently reserved.
    fn allocated_bytes(&self) -> usize;

    /// Bytes holding vertex data. Never more than [`allocated_bytes`](Self::allocated_bytes).
    fn used_bytes(&self) -> usize;
}

/// Contiguous vertex storage with a write cursor.
///
/// The buffer holds consecutive runs, one per sealed layer. Only the open
/// run (from `run_start` to the cursor) is ever rewritten in place; sealed
/// runs are left untouched until [`VertexBuffer::reset`].
///
/// Capacity doubles when a write does not fit and never shrinks.
#[derive(Debug)]
pub struct VertexBuffer {
    data: Vec<u8>,
    used: usize,
    run_start: usize,
}

impl VertexBuffer {
    /// Allocate a buffer with `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self, BatchError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| BatchError::OutOfMemory {
                requested: capacity,
            })?;
        data.resize(capacity, 0);
        Ok(Self {
            data,
            used: 0,
            run_start: 0,
        })
    }

    /// Make room for `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), BatchError> {
        let required = self
            .used
            .checked_add(additional)
            .ok_or(BatchError::OutOfMemory {
                requested: usize::MAX,
            })?;
        if required <= self.data.len() {
            return Ok(());
        }

        let new_len = required.max(self.data.len().saturating_mul(2));
        self.data
            .try_reserve_exact(new_len - self.data.len())
            .map_err(|_| BatchError::OutOfMemory { requested: new_len })?;
        log::debug!(
            "Growing vertex buffer from {} to {} bytes",
            self.data.len(),
            new_len
        );
        self.data.resize(new_len, 0);
        Ok(())
    }

    /// Append bytes at the cursor.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), BatchError> {
        self.reserve(bytes.len())?;
        self.data[self.used..self.used + bytes.len()].copy_from_slice(bytes);
        self.used += bytes.len();
        Ok(())
    }

    /// Append a copy of the last `len` bytes of the open run.
    pub fn repeat_tail(&mut self, len: usize) -> Result<(), BatchError> {
        if len > self.run_len() {
            return Err(BatchError::MalformedRun(format!(
                "cannot repeat {} bytes of a {} byte run",
                len,
                self.run_len()
            )));
        }
        self.reserve(len)?;
        let start = self.used - len;
        self.data.copy_within(start..self.used, self.used);
        self.used += len;
        Ok(())
    }

    /// Drop the last `len` bytes of the open run.
    pub fn truncate_run(&mut self, len: usize) {
        self.used -= len.min(self.run_len());
    }

    /// Start a new run at the cursor.
    pub fn begin_run(&mut self) {
        self.run_start = self.used;
    }

    /// Close the open run and return its byte range.
    pub fn end_run(&mut self) -> Range<usize> {
        let range = self.run_start..self.used;
        self.run_start = self.used;
        range
    }

    /// Bytes written to the open run.
    pub fn run_len(&self) -> usize {
        self.used - self.run_start
    }

    /// The open run, for in-place reordering.
    pub fn run_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.run_start..self.used]
    }

    /// Written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Whole allocation, including bytes past the cursor.
    ///
    /// Ranges returned by [`end_run`](Self::end_run) stay valid in it after
    /// [`reset`](Self::reset).
    pub fn storage(&self) -> &[u8] {
        &self.data
    }

    /// Rewind the cursor. Capacity is kept.
    pub fn reset(&mut self) {
        self.used = 0;
        self.run_start = 0;
    }
}

impl MemoryTracking for VertexBuffer {
    fn allocated_bytes(&self) -> usize {
        self.data.len()
    }

    fn used_bytes(&self) -> usize {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = VertexBuffer::new(64).unwrap();
        assert_eq!(buffer.allocated_bytes(), 64);
        assert_eq!(buffer.used_bytes(), 0);
        assert!(buffer.as_slice().is_empty());
    }

    #[test]
    fn test_write_grows_by_doubling() {
        let mut buffer = VertexBuffer::new(16).unwrap();
        buffer.write(&[1; 16]).unwrap();
        assert_eq!(buffer.allocated_bytes(), 16);

        buffer.write(&[2; 4]).unwrap();
        assert_eq!(buffer.allocated_bytes(), 32);
        assert_eq!(buffer.used_bytes(), 20);

        // A write larger than double takes exactly what it needs
        buffer.write(&[3; 100]).unwrap();
        assert_eq!(buffer.allocated_bytes(), 120);
    }

    #[test]
    fn test_grows_from_zero_capacity() {
        let mut buffer = VertexBuffer::new(0).unwrap();
        buffer.write(&[7; 3]).unwrap();
        assert_eq!(buffer.as_slice(), &[7, 7, 7]);
    }

    #[test]
    fn test_runs() {
        let mut buffer = VertexBuffer::new(32).unwrap();
        buffer.begin_run();
        buffer.write(&[1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.end_run(), 0..4);

        buffer.begin_run();
        buffer.write(&[5, 6]).unwrap();
        assert_eq!(buffer.run_len(), 2);
        buffer.run_mut().reverse();
        assert_eq!(buffer.end_run(), 4..6);
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 6, 5]);
    }

    #[test]
    fn test_repeat_tail() {
        let mut buffer = VertexBuffer::new(8).unwrap();
        buffer.begin_run();
        buffer.write(&[1, 2, 3, 4]).unwrap();
        buffer.repeat_tail(2).unwrap();
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 3, 4]);

        buffer.truncate_run(2);
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_repeat_tail_stays_in_run() {
        let mut buffer = VertexBuffer::new(8).unwrap();
        buffer.write(&[1, 2]).unwrap();
        buffer.begin_run();
        assert!(matches!(
            buffer.repeat_tail(2),
            Err(BatchError::MalformedRun(_))
        ));
    }

    #[test]
    fn test_reset_keeps_capacity_and_bytes() {
        let mut buffer = VertexBuffer::new(4).unwrap();
        buffer.begin_run();
        buffer.write(&[9; 10]).unwrap();
        let range = buffer.end_run();
        let allocated = buffer.allocated_bytes();

        buffer.reset();
        assert_eq!(buffer.used_bytes(), 0);
        assert_eq!(buffer.allocated_bytes(), allocated);
        assert_eq!(&buffer.storage()[range], &[9; 10]);
    }
}
