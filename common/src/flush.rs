//! Flush bridge: toolkit render regions to panel write transactions.
//!
//! The first flush opens a transaction and leaves it open, so the toolkit can
//! render the next region while the panel DMA still runs. Every later flush
//! first waits for that DMA and closes the previous transaction.
//!
//! # Call Sequence
//!
//! ```text
//! first flush:   start_write, set_addr_window, write_pixels, signal
//! later flushes: dma_wait, end_write, start_write, set_addr_window, write_pixels, signal
//! left-clipped:  start_write, then set_addr_window + write_pixels per row with dma_wait between rows
//! ```
//!
//! An empty area still runs the transaction bracket and signals completion,
//! but sends no window and no pixels. Parts of an area at negative
//! coordinates are clipped before the address window is set.

use crate::panel::PanelDriver;
use crate::toolkit::{Area, FlushReady};

/// Panel coordinates are unsigned, so anything left of or above the origin is dropped.
const ADDRESSABLE: Area = Area::new(0, 0, i16::MAX, i16::MAX);

/// Per-display flush state.
pub struct FlushBridge {
    first_frame_issued: bool,
    swap_bytes: bool,
}

impl FlushBridge {
    /// `swap_bytes`: the render buffer already holds big-endian pixels.
    pub const fn new(swap_bytes: bool) -> Self {
        Self {
            first_frame_issued: false,
            swap_bytes,
        }
    }

    /// True once the first flush has started a transaction.
    #[inline]
    pub const fn first_frame_issued(&self) -> bool { self.first_frame_issued }

    /// Send `area` from `pixels` (row-major, `area.width()` per row) to the panel.
    ///
    /// Always signals `ready` exactly once before returning. `pixels` may be
    /// longer than the area; only the leading `area.pixel_count()` are sent.
    pub async fn flush<P: PanelDriver>(
        &mut self,
        panel: &mut P,
        area: &Area,
        pixels: &[u16],
        ready: &FlushReady,
    ) {
        if self.first_frame_issued {
            panel.dma_wait().await;
            panel.end_write();
        } else {
            self.first_frame_issued = true;
        }

        panel.start_write();
        if let Some(visible) = area.intersection(&ADDRESSABLE) {
            self.write_visible(panel, area, &visible, pixels).await;
        }

        ready.signal();
    }

    /// Send the part of `area` that lies in `visible`. Rows are written one
    /// window at a time when columns were clipped off the left edge.
    async fn write_visible<P: PanelDriver>(
        &self,
        panel: &mut P,
        area: &Area,
        visible: &Area,
        pixels: &[u16],
    ) {
        let stride = usize::from(area.width());
        let skip_x = (i32::from(visible.x1) - i32::from(area.x1)) as usize;
        let skip_y = (i32::from(visible.y1) - i32::from(area.y1)) as usize;
        let (x, y) = (visible.x1 as u16, visible.y1 as u16);

        if skip_x == 0 && visible.width() == area.width() {
            let start = (skip_y * stride).min(pixels.len());
            let end = (start + visible.pixel_count()).min(pixels.len());
            panel.set_addr_window(x, y, visible.width(), visible.height()).await;
            panel.write_pixels(&pixels[start..end], self.swap_bytes).await;
            return;
        }

        for row in 0..visible.height() {
            let start = ((skip_y + usize::from(row)) * stride + skip_x).min(pixels.len());
            let end = (start + usize::from(visible.width())).min(pixels.len());
            if start == end {
                break;
            }
            if row > 0 {
                panel.dma_wait().await;
            }
            panel.set_addr_window(x, y + row, visible.width(), 1).await;
            panel.write_pixels(&pixels[start..end], self.swap_bytes).await;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
