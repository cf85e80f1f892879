//! Tick source for the toolkit clock.
//!
//! The toolkit keeps time through a [`TickClock`] that only moves when a
//! periodic timer fires. Every backend implements [`PeriodicTimer`]:
//!
//! - [`PrescaledTimer`]: a 16-bit hardware compare timer behind a clock
//!   prescaler (the RP2350 PWM backend in the firmware implements [`CompareTimer`])
//! - software tickers (an embassy task on the firmware, a thread in the simulator)
//!
//! # Interrupt Safety
//!
//! [`TickHandler::on_tick`] is a single relaxed atomic add, so it can run from
//! an interrupt in the middle of a flush without touching anything else.
//!
//! # Prescaler Selection
//!
//! For a tick frequency `f` and timer clock `base`, [`select_prescaler`] picks
//! the smallest divider `p` from [`PRESCALERS`] with `base / p / f <= 65536`.
//!
//! | Tick | Base | Divider | Compare |
//! |------|------|---------|---------|
//! | 10 ms (100 Hz) | 48 MHz | 8 | 60000 |
//! | 10 ms (100 Hz) | 150 MHz | 64 | 23437 |
//! | 500 ms (2 Hz) | 48 MHz | (needs 512) | error |

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::GlueError;

// =============================================================================
// Tick Clock
// =============================================================================

/// Millisecond counter advanced by the tick source.
///
/// Wraps after ~49.7 days; use [`TickClock::elapsed_since`] for differences.
pub struct TickClock {
    ms: AtomicU32,
}

impl TickClock {
    /// Create a clock at zero.
    pub const fn new() -> Self { Self { ms: AtomicU32::new(0) } }

    /// Advance the clock.
    #[inline]
    pub fn inc(
        &self,
        ms: u32,
    ) {
        self.ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Current clock value in milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u32 { self.ms.load(Ordering::Relaxed) }

    /// Milliseconds since `start`, correct across a wrap.
    #[inline]
    pub fn elapsed_since(
        &self,
        start: u32,
    ) -> u32 {
        self.now_ms().wrapping_sub(start)
    }
}

impl Default for TickClock {
    fn default() -> Self { Self::new() }
}

/// Callback a timer backend runs on every period.
#[derive(Clone, Copy)]
pub struct TickHandler {
    clock: &'static TickClock,
    step_ms: u32,
}

impl TickHandler {
    /// Handler advancing `clock` by `step_ms` per tick.
    pub const fn new(
        clock: &'static TickClock,
        step_ms: u32,
    ) -> Self {
        Self { clock, step_ms }
    }

    /// Tick body. O(1), never blocks.
    #[inline]
    pub fn on_tick(&self) { self.clock.inc(self.step_ms); }

    /// Milliseconds added per tick.
    #[inline]
    pub const fn step_ms(&self) -> u32 { self.step_ms }
}

// =============================================================================
// Periodic Timer Capability
// =============================================================================

/// A source of periodic ticks, one implementation per platform.
pub trait PeriodicTimer {
    /// Start calling `handler` every `interval_ms`.
    fn arm(
        &mut self,
        interval_ms: u32,
        handler: TickHandler,
    ) -> Result<(), GlueError>;

    /// Stop ticking. Calling it on a timer that is not armed does nothing.
    fn disarm(&mut self);
}

// =============================================================================
// Prescaler Selection
// =============================================================================

/// Clock dividers offered by the compare timer, coarsest last.
pub const PRESCALERS: [u16; 7] = [1, 2, 4, 8, 16, 64, 256];

/// Largest count a 16-bit compare timer can run through per period.
pub const MAX_COMPARE: u32 = 65_536;

/// Divider and compare value for one timer period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerSettings {
    /// Clock prescaler, one of [`PRESCALERS`].
    pub divider: u16,
    /// Timer counts per period (`1..=MAX_COMPARE`).
    pub compare: u32,
}

/// Ticks per second for a tick interval (integer division, as the timer sees it).
///
/// Intervals above one second give 0 Hz, which no timer can produce.
#[inline]
pub const fn tick_frequency_hz(interval_ms: u32) -> u32 {
    if interval_ms == 0 { 0 } else { 1000 / interval_ms }
}

/// Pick the smallest prescaler whose compare value fits a 16-bit timer.
pub fn select_prescaler(
    base_clock_hz: u32,
    tick_hz: u32,
) -> Result<TimerSettings, GlueError> {
    if tick_hz == 0 {
        return Err(GlueError::TimerConfigurationFailed);
    }

    PRESCALERS
        .iter()
        .map(|&divider| TimerSettings {
            divider,
            compare: base_clock_hz / u32::from(divider) / tick_hz,
        })
        .find(|s| s.compare <= MAX_COMPARE)
        .filter(|s| s.compare > 0)
        .ok_or(GlueError::TimerConfigurationFailed)
}

// =============================================================================
// Hardware Compare Timer Backend
// =============================================================================

/// Minimal view of a prescaled 16-bit compare timer peripheral.
pub trait CompareTimer {
    /// Program divider and period. May refuse settings the hardware cannot hold.
    fn configure(
        &mut self,
        settings: TimerSettings,
    ) -> Result<(), GlueError>;

    /// Enable the compare/wrap interrupt and start counting.
    fn start(
        &mut self,
        handler: TickHandler,
    );

    /// Stop counting and mask the interrupt.
    fn stop(&mut self);
}

/// [`PeriodicTimer`] backed by a prescaled compare timer.
pub struct PrescaledTimer<C: CompareTimer> {
    hw: C,
    base_clock_hz: u32,
    settings: Option<TimerSettings>,
}

impl<C: CompareTimer> PrescaledTimer<C> {
    /// Wrap a compare timer clocked at `base_clock_hz`.
    pub const fn new(
        hw: C,
        base_clock_hz: u32,
    ) -> Self {
        Self {
            hw,
            base_clock_hz,
            settings: None,
        }
    }

    /// Settings in use while armed.
    pub const fn settings(&self) -> Option<TimerSettings> { self.settings }

    /// Access the wrapped peripheral.
    pub const fn hw(&self) -> &C { &self.hw }
}

impl<C: CompareTimer> PeriodicTimer for PrescaledTimer<C> {
    fn arm(
        &mut self,
        interval_ms: u32,
        handler: TickHandler,
    ) -> Result<(), GlueError> {
        let settings = select_prescaler(self.base_clock_hz, tick_frequency_hz(interval_ms))?;
        self.hw.configure(settings)?;
        self.hw.start(handler);
        self.settings = Some(settings);
        Ok(())
    }

    fn disarm(&mut self) {
        if self.settings.take().is_some() {
            self.hw.stop();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
