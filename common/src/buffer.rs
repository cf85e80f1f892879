//! Render buffer shared between the toolkit and the flush bridge.
//!
//! One heap allocation, split into one or two equally sized regions of
//! `width * rows` pixels. With two regions the toolkit renders into one while
//! the other is still being sent to the panel.
//!
//! # Memory Layout
//!
//! ```text
//! ┌───────────────────────┬───────────────────────┐
//! │ region 0              │ region 1 (double only)│
//! │ width * rows pixels   │ width * rows pixels   │
//! └───────────────────────┴───────────────────────┘
//! ```
//!
//! | Panel | Rows | Regions | RAM |
//! |-------|------|---------|-----|
//! | 320x240 | 8 | 1 | 5 KB |
//! | 320x240 | 8 | 2 | 10 KB |
//! | 240x240 | 4 | 2 | 3.75 KB |

use alloc::vec::Vec;

use crate::error::GlueError;

/// Heap-backed render buffer.
pub struct FrameBuffer {
    data: Vec<u16>,
    region_len: usize,
    region_count: usize,
}

impl FrameBuffer {
    /// Allocate `width * rows` pixels per region, one or two regions.
    ///
    /// Fails with [`GlueError::AllocationFailed`] when the heap cannot hold
    /// the buffer or the requested size is zero or overflows.
    pub fn allocate(
        width: u16,
        rows: usize,
        double_buffered: bool,
    ) -> Result<Self, GlueError> {
        let region_count = if double_buffered { 2 } else { 1 };
        let region_len = usize::from(width).checked_mul(rows).ok_or(GlueError::AllocationFailed)?;
        let total = region_len.checked_mul(region_count).ok_or(GlueError::AllocationFailed)?;
        if total == 0 {
            return Err(GlueError::AllocationFailed);
        }

        let mut data = Vec::new();
        data.try_reserve_exact(total).map_err(|_| GlueError::AllocationFailed)?;
        data.resize(total, 0);

        Ok(Self {
            data,
            region_len,
            region_count,
        })
    }

    /// Pixels per region.
    #[inline]
    pub const fn region_len(&self) -> usize { self.region_len }

    /// Number of regions (1 or 2).
    #[inline]
    pub const fn region_count(&self) -> usize { self.region_count }

    /// Size of the whole allocation in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize { self.data.len() * core::mem::size_of::<u16>() }

    /// Pixels of region `idx`, if it exists.
    pub fn region(
        &self,
        idx: usize,
    ) -> Option<&[u16]> {
        self.data.chunks_exact(self.region_len).nth(idx)
    }

    /// Mutable pixels of region `idx`, if it exists.
    pub fn region_mut(
        &mut self,
        idx: usize,
    ) -> Option<&mut [u16]> {
        self.data.chunks_exact_mut(self.region_len).nth(idx)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
