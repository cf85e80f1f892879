//! Thread-based tick source.
//!
//! The simulator has no hardware timer, so a background thread sleeps for one
//! period at a time and runs the tick handler. Disarming stops and joins it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tft_glue_common::GlueError;
use tft_glue_common::tick::{PeriodicTimer, TickHandler, tick_frequency_hz};

struct Running {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// [`PeriodicTimer`] backed by a std thread.
#[derive(Default)]
pub struct ThreadTicker {
    running: Option<Running>,
}

impl ThreadTicker {
    pub const fn new() -> Self { Self { running: None } }
}

impl PeriodicTimer for ThreadTicker {
    fn arm(
        &mut self,
        interval_ms: u32,
        handler: TickHandler,
    ) -> Result<(), GlueError> {
        if tick_frequency_hz(interval_ms) == 0 {
            return Err(GlueError::TimerConfigurationFailed);
        }
        self.disarm();

        let stop = Arc::new(AtomicBool::new(false));
        let period = Duration::from_millis(u64::from(interval_ms));
        let thread = thread::Builder::new()
            .name("tick".into())
            .spawn({
                let stop = Arc::clone(&stop);
                move || {
                    while !stop.load(Ordering::Relaxed) {
                        thread::sleep(period);
                        handler.on_tick();
                    }
                }
            })
            .map_err(|_| GlueError::TimerConfigurationFailed)?;

        self.running = Some(Running { stop, thread });
        Ok(())
    }

    fn disarm(&mut self) {
        if let Some(running) = self.running.take() {
            running.stop.store(true, Ordering::Relaxed);
            running.thread.join().ok();
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) { self.disarm(); }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use tft_glue_common::tick::TickClock;

    use super::*;

    #[test]
    fn test_ticks_advance_clock_until_disarmed() {
        static CLOCK: TickClock = TickClock::new();
        let mut ticker = ThreadTicker::new();
        ticker.arm(1, TickHandler::new(&CLOCK, 1)).unwrap();
        thread::sleep(Duration::from_millis(50));
        ticker.disarm();

        let stopped_at = CLOCK.now_ms();
        assert!(stopped_at > 0);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(CLOCK.now_ms(), stopped_at);
    }

    #[test]
    fn test_zero_interval_rejected() {
        static CLOCK: TickClock = TickClock::new();
        let mut ticker = ThreadTicker::new();
        assert_eq!(
            ticker.arm(0, TickHandler::new(&CLOCK, 0)),
            Err(GlueError::TimerConfigurationFailed)
        );
    }
}
