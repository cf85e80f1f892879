//! TFT Glue Demo Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Runs the toolkit demos on the Pimoroni PIM715 Display Pack 2.8" through the
//! shared glue: strip renderer, flush bridge, render buffer and tick source.
//!
//! # Architecture
//!
//! - Tick source: embassy task (or PWM wrap interrupt with `pwm-tick`) advancing the toolkit clock
//! - Main task: buttons, demo update, then `task_handler` which renders dirty
//!   strips and flushes them to the ST7789 over SPI DMA
//!
//! # Button Controls
//!
//! - **A**: Previous tab (widgets demo)
//! - **B**: Next tab (widgets demo)
//! - **X**: Log render statistics
//! - **Y**: Cycle demos (Widgets → Watch → Self-test → Widgets)

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]

mod button;
mod display;
mod st7789;
mod ticker;

use core::mem::MaybeUninit;
use core::sync::atomic::Ordering;

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::Spi;
use embassy_time::Timer;
use embedded_alloc::LlffHeap as Heap;
use embedded_graphics::prelude::*;
use static_cell::StaticCell;
use tft_glue_common::config::GlueConfig;
use tft_glue_common::glue::GlueContext;
use tft_glue_common::input::NoTouch;
use tft_glue_common::log::LogLevel;
use tft_glue_common::screens::Demos;
use tft_glue_common::strip::StripToolkit;
use tft_glue_common::tick::TickClock;
use {defmt_rtt as _, panic_probe as _};

use crate::button::{Action, Buttons};
use crate::display::display_spi_config;
use crate::st7789::{SPI_ERRORS, St7789Panel};

// Render buffer regions are allocated by the glue at `begin`
#[global_allocator]
static HEAP: Heap = Heap::empty();

/// Heap size: 32KB (one or two 320 x 8 regions need at most 10KB).
const HEAP_SIZE: usize = 32 * 1024;

/// Pause between main loop passes.
const LOOP_PERIOD_MS: u64 = 5;

/// Toolkit clock, advanced by the tick source.
static CLOCK: TickClock = TickClock::new();

#[cfg(not(feature = "pwm-tick"))]
type TickBackend = ticker::EmbassyTicker;

#[cfg(feature = "pwm-tick")]
type TickBackend = tft_glue_common::tick::PrescaledTimer<ticker::PwmTick<'static>>;

type Glue = GlueContext<St7789Panel<'static>, NoTouch, TickBackend>;

/// Forward toolkit debug lines to defmt.
fn defmt_sink(
    level: LogLevel,
    line: &str,
) {
    match level {
        LogLevel::Trace => defmt::trace!("{=str}", line),
        LogLevel::Debug => defmt::debug!("{=str}", line),
        LogLevel::Info => defmt::info!("{=str}", line),
        LogLevel::Warn => defmt::warn!("{=str}", line),
        LogLevel::Error => defmt::error!("{=str}", line),
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("TFT glue demo starting...");

    init_heap();
    let p = embassy_rp::init(Default::default());

    // PIM715 pinout: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let _backlight = Output::new(p.PIN_20, Level::High);

    // Async SPI with DMA (TX-only, display doesn't need MISO)
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, display_spi_config());

    let mut panel = St7789Panel::new(spi, dc, cs);
    panel.init().await;
    info!("Display initialized");

    #[cfg(not(feature = "pwm-tick"))]
    let timer = ticker::EmbassyTicker::new(spawner);
    #[cfg(feature = "pwm-tick")]
    let timer = tft_glue_common::tick::PrescaledTimer::new(
        ticker::PwmTick::new(p.PWM_SLICE0),
        embassy_rp::clocks::clk_sys_freq(),
    );
    #[cfg(feature = "pwm-tick")]
    let _ = spawner;

    // Glue and demos live in statics, off the main task's future
    static GLUE: StaticCell<Glue> = StaticCell::new();
    let glue: &'static mut Glue = GLUE.init(GlueContext::new(
        panel,
        None,
        GlueConfig::from_features().with_log_sink(defmt_sink),
    ));

    let mut toolkit = StripToolkit::new(&CLOCK);
    if let Err(e) = glue.begin(&mut toolkit, timer, cfg!(debug_assertions)) {
        error!("Glue init failed: {} (code {})", e, e.code());
        loop {
            cortex_m::asm::wfi();
        }
    }

    let (width, height) = glue.resolution();
    static DEMOS: StaticCell<Demos> = StaticCell::new();
    let demos = DEMOS.init(Demos::new(Size::new(u32::from(width), u32::from(height))));

    // Buttons (active-low with internal pull-up)
    // PIM715: A=12, B=13, X=14, Y=15
    let mut buttons = Buttons::new(
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
        Input::new(p.PIN_14, Pull::Up),
        Input::new(p.PIN_15, Pull::Up),
    );

    info!("Main loop starting ({})", demos.mode().name());

    loop {
        let now = toolkit.now_ms();

        match buttons.poll() {
            Some(Action::PrevTab) => demos.prev(now, &mut toolkit),
            Some(Action::NextTab) => demos.next(now, &mut toolkit),
            Some(Action::LogStats) => {
                let stats = toolkit.stats();
                info!("{} spi_errors={}", stats, SPI_ERRORS.load(Ordering::Relaxed));
            }
            Some(Action::NextDemo) => {
                demos.toggle_mode(&mut toolkit);
                info!("Demo: {}", demos.mode().name());
            }
            None => {}
        }

        demos.update(now, &mut toolkit);
        toolkit.task_handler(&mut *glue, &mut *demos).await;

        Timer::after_millis(LOOP_PERIOD_MS).await;
    }
}

/// Hand the heap its backing memory. Runs once, before anything allocates.
fn init_heap() {
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE);
    }
}
