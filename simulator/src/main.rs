//! TFT Glue Demo Simulator for Windows/Desktop.
//!
//! Runs the same glue, toolkit and demos as the firmware, with an SDL window
//! standing in for the ST7789 and a thread standing in for the tick timer.
//!
//! # Controls
//!
//! - **Left / Right**: previous / next tab (widgets demo)
//! - **Space** or **Y**: cycle demos
//! - **X**: print render statistics
//! - **Mouse**: touch screen

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

mod input;
mod panel;
mod ticker;
mod timing;

use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use embassy_futures::block_on;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorEvent, Window};
use tft_glue_common::config::GlueConfig;
use tft_glue_common::glue::GlueContext;
use tft_glue_common::log::LogLevel;
use tft_glue_common::screens::Demos;
use tft_glue_common::strip::StripToolkit;
use tft_glue_common::tick::TickClock;

use crate::input::MouseState;
use crate::panel::SimPanel;
use crate::ticker::ThreadTicker;
use crate::timing::{LOOP_PERIOD, WINDOW_SCALE};

/// Display Pack resolution in landscape.
const PANEL_SIZE: Size = Size::new(320, 240);

/// Toolkit clock, advanced by the tick thread.
static CLOCK: TickClock = TickClock::new();

fn stdout_sink(
    level: LogLevel,
    line: &str,
) {
    println!("[{}] {line}", level.prefix());
}

fn main() -> ExitCode {
    let mouse = MouseState::default();
    let mut glue = GlueContext::new(
        SimPanel::new(PANEL_SIZE),
        Some(mouse.touch()),
        GlueConfig::from_features().with_log_sink(stdout_sink),
    );

    let mut toolkit = StripToolkit::new(&CLOCK);
    if let Err(e) = glue.begin(&mut toolkit, ThreadTicker::new(), true) {
        eprintln!("Glue init failed: {e} (code {})", e.code());
        return ExitCode::from(e.code());
    }

    let (width, height) = glue.resolution();
    let mut demos = Demos::new(Size::new(u32::from(width), u32::from(height)));

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("TFT Glue Sim", &output_settings);
    window.update(glue.panel().display());

    let started = Instant::now();
    println!("Demo: {}", demos.mode().name());

    loop {
        let now = toolkit.now_ms();

        for event in window.events() {
            if mouse.handle(&event) {
                continue;
            }
            match event {
                SimulatorEvent::Quit => {
                    glue.end(&mut toolkit);
                    return ExitCode::SUCCESS;
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } if !repeat => match keycode {
                    Keycode::Left => demos.prev(now, &mut toolkit),
                    Keycode::Right => demos.next(now, &mut toolkit),
                    Keycode::Space | Keycode::Y => {
                        demos.toggle_mode(&mut toolkit);
                        println!("Demo: {}", demos.mode().name());
                    }
                    Keycode::X => {
                        let stats = toolkit.stats();
                        let secs = started.elapsed().as_secs_f32().max(1.0);
                        println!(
                            "frames={} ({:.1}/s) flushes={} pixels={} missed_acks={} panel_writes={}",
                            stats.frames,
                            stats.frames as f32 / secs,
                            stats.flushes,
                            stats.pixels,
                            stats.missed_acks,
                            glue.panel().transactions()
                        );
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        demos.update(now, &mut toolkit);
        if block_on(toolkit.task_handler(&mut glue, &mut demos)) {
            window.update(glue.panel().display());
        }

        thread::sleep(LOOP_PERIOD);
    }
}
