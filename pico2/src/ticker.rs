//! Tick sources for the toolkit clock on the RP2350.
//!
//! # Backends
//!
//! | Backend | Feature | Runs `on_tick` from |
//! |---------|---------|---------------------|
//! | [`EmbassyTicker`] | default | an embassy task driven by a `Ticker` |
//! | [`PwmTick`] | `pwm-tick` | the PWM slice 0 wrap interrupt |
//!
//! The embassy task is spawned on the first `arm` of any [`EmbassyTicker`]
//! and then parked while disarmed; re-arming only sends it a new handler and
//! period.

use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use tft_glue_common::GlueError;
use tft_glue_common::tick::{PeriodicTimer, TickHandler, tick_frequency_hz};
use tft_glue_pico2::once::SpawnOnce;

// =============================================================================
// Embassy Task Ticker
// =============================================================================

/// New handler and period for the tick task, or `None` to park it.
static TICK_CONTROL: Signal<CriticalSectionRawMutex, Option<(TickHandler, u32)>> = Signal::new();

/// The task pool holds one `tick_task`, shared by every ticker.
static TICK_TASK: SpawnOnce = SpawnOnce::new();

/// Software tick task. Calls the armed handler once per period.
#[embassy_executor::task]
async fn tick_task() {
    defmt::info!("Tick task started");

    let mut armed = None;
    loop {
        let Some((handler, interval_ms)) = armed else {
            armed = TICK_CONTROL.wait().await;
            continue;
        };

        let mut ticker = Ticker::every(Duration::from_millis(u64::from(interval_ms)));
        armed = loop {
            match select(ticker.next(), TICK_CONTROL.wait()).await {
                Either::First(()) => handler.on_tick(),
                Either::Second(control) => break control,
            }
        };
    }
}

/// [`PeriodicTimer`] running the handler from an embassy task.
pub struct EmbassyTicker {
    spawner: Spawner,
}

impl EmbassyTicker {
    pub const fn new(spawner: Spawner) -> Self { Self { spawner } }
}

impl PeriodicTimer for EmbassyTicker {
    fn arm(
        &mut self,
        interval_ms: u32,
        handler: TickHandler,
    ) -> Result<(), GlueError> {
        if tick_frequency_hz(interval_ms) == 0 {
            return Err(GlueError::TimerConfigurationFailed);
        }
        if TICK_TASK.claim() && self.spawner.spawn(tick_task()).is_err() {
            TICK_TASK.release();
            return Err(GlueError::TimerConfigurationFailed);
        }
        TICK_CONTROL.signal(Some((handler, interval_ms)));
        Ok(())
    }

    fn disarm(&mut self) {
        if TICK_TASK.is_claimed() {
            TICK_CONTROL.signal(None);
        }
    }
}

// =============================================================================
// PWM Wrap Interrupt
// =============================================================================

#[cfg(feature = "pwm-tick")]
pub use pwm_tick::PwmTick;

#[cfg(feature = "pwm-tick")]
mod pwm_tick {
    use core::cell::Cell;

    use embassy_rp::interrupt::InterruptExt;
    use embassy_rp::peripherals::PWM_SLICE0;
    use embassy_rp::pwm::{Config as PwmConfig, Pwm};
    use embassy_rp::{Peri, interrupt, pac};
    use embassy_sync::blocking_mutex::Mutex;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use tft_glue_common::GlueError;
    use tft_glue_common::tick::{CompareTimer, TickHandler, TimerSettings};
    use tft_glue_pico2::pwm::pwm_setup;

    /// Handler called from the wrap interrupt while armed.
    static WRAP_HANDLER: Mutex<CriticalSectionRawMutex, Cell<Option<TickHandler>>> = Mutex::new(Cell::new(None));

    /// PWM slice 0 used as a compare timer. Its pins are left unused.
    pub struct PwmTick<'d> {
        pwm: Pwm<'d>,
    }

    impl<'d> PwmTick<'d> {
        pub fn new(slice: Peri<'d, PWM_SLICE0>) -> Self {
            let mut config = PwmConfig::default();
            config.enable = false;
            Self {
                pwm: Pwm::new_free(slice, config),
            }
        }
    }

    impl CompareTimer for PwmTick<'_> {
        fn configure(
            &mut self,
            settings: TimerSettings,
        ) -> Result<(), GlueError> {
            let setup = pwm_setup(settings)?;

            let mut config = PwmConfig::default();
            config.divider = setup.divider.into();
            config.top = setup.top;
            config.enable = true;
            self.pwm.set_config(&config);
            defmt::debug!("PWM tick: divider {}, top {}", setup.divider, setup.top);
            Ok(())
        }

        fn start(
            &mut self,
            handler: TickHandler,
        ) {
            WRAP_HANDLER.lock(|h| h.set(Some(handler)));
            pac::PWM.intr().write(|w| w.set_ch(0, true));
            pac::PWM.irq0_inte().modify(|w| w.set_ch(0, true));
            interrupt::PWM_IRQ_WRAP_0.unpend();
            // SAFETY: the handler below only touches the critical-section mutex.
            unsafe { interrupt::PWM_IRQ_WRAP_0.enable() };
        }

        fn stop(&mut self) {
            pac::PWM.irq0_inte().modify(|w| w.set_ch(0, false));
            interrupt::PWM_IRQ_WRAP_0.disable();
            WRAP_HANDLER.lock(|h| h.set(None));

            let mut config = PwmConfig::default();
            config.enable = false;
            self.pwm.set_config(&config);
        }
    }

    #[interrupt]
    fn PWM_IRQ_WRAP_0() {
        pac::PWM.intr().write(|w| w.set_ch(0, true));
        if let Some(handler) = WRAP_HANDLER.lock(Cell::get) {
            handler.on_tick();
        }
    }
}
