//! Glue configuration: compile-time constants and the runtime [`GlueConfig`].
//!
//! Build-time variants are cargo features, read once by
//! [`GlueConfig::from_features`]:
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `dma-double-buffer` | two render regions instead of one |
//! | `low-memory` | [`LOW_MEMORY_BUFFER_ROWS`] rows per region |
//! | `color-16-swap` | pixels stored big-endian, sent without swapping |
//! | `panel-240x240` | resolution forced to 240x240 |

use crate::log::LogSink;

// =============================================================================
// Tick Configuration
// =============================================================================

/// Tick interval for the toolkit clock. 1 to 10 ms is the useful range.
pub const TICK_INTERVAL_MS: u32 = 10;

/// Clock feeding the hardware compare timer on the reference SAMD parts (48 MHz).
pub const REFERENCE_TIMER_CLOCK_HZ: u32 = 48_000_000;

// =============================================================================
// Buffer Configuration
// =============================================================================

/// Rows per render region. RAM use is `width * rows * 2` bytes per region.
pub const BUFFER_ROWS: usize = 8;

/// Rows per render region on memory-constrained parts.
pub const LOW_MEMORY_BUFFER_ROWS: usize = 4;

// =============================================================================
// Panel Configuration
// =============================================================================

/// Resolution used by the `panel-240x240` override (width, height).
pub const FIXED_PANEL_RESOLUTION: (u16, u16) = (240, 240);

/// Toolkit refresh period. Dirty areas are flushed at most this often.
pub const REFRESH_PERIOD_MS: u32 = 30;

/// Maximum number of separate dirty rectangles kept before they are merged.
pub const MAX_DIRTY_AREAS: usize = 16;

/// Runtime configuration of a [`GlueContext`](crate::glue::GlueContext).
#[derive(Clone, Copy)]
pub struct GlueConfig {
    /// Rows of pixels per render region.
    pub rows_per_buffer: usize,
    /// Allocate a second region so rendering and DMA can overlap.
    pub double_buffered: bool,
    /// Tick period handed to the periodic timer.
    pub tick_interval_ms: u32,
    /// Pixels are already big-endian; the panel must not swap them.
    pub swap_bytes: bool,
    /// Use this resolution instead of asking the panel driver.
    pub resolution_override: Option<(u16, u16)>,
    /// Debug print sink, installed only when `begin` is called with `debug = true`.
    pub log_sink: Option<LogSink>,
}

impl GlueConfig {
    /// Configuration selected by the enabled cargo features.
    pub const fn from_features() -> Self {
        Self {
            rows_per_buffer: if cfg!(feature = "low-memory") { LOW_MEMORY_BUFFER_ROWS } else { BUFFER_ROWS },
            double_buffered: cfg!(feature = "dma-double-buffer"),
            tick_interval_ms: TICK_INTERVAL_MS,
            swap_bytes: cfg!(feature = "color-16-swap"),
            resolution_override: if cfg!(feature = "panel-240x240") { Some(FIXED_PANEL_RESOLUTION) } else { None },
            log_sink: None,
        }
    }

    /// Same configuration with a debug print sink.
    #[must_use]
    pub const fn with_log_sink(
        mut self,
        sink: LogSink,
    ) -> Self {
        self.log_sink = Some(sink);
        self
    }
}

impl Default for GlueConfig {
    fn default() -> Self { Self::from_features() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tick_interval() {
        assert_eq!(GlueConfig::default().tick_interval_ms, 10);
    }

    #[test]
    fn test_default_rows_follow_features() {
        let expected = if cfg!(feature = "low-memory") { 4 } else { 8 };
        assert_eq!(GlueConfig::default().rows_per_buffer, expected);
    }

    #[test]
    fn test_with_log_sink() {
        fn sink(
            _level: crate::log::LogLevel,
            _msg: &str,
        ) {
        }
        let config = GlueConfig::default().with_log_sink(sink);
        assert!(config.log_sink.is_some());
    }
}
