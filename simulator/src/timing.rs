//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

/// Pause between main loop passes, like the firmware's 5 ms delay.
pub const LOOP_PERIOD: Duration = Duration::from_millis(5);

/// Window pixels per panel pixel.
pub const WINDOW_SCALE: u32 = 2;
