//! Pico 2 firmware library - host-testable pieces of the ST7789 glue firmware.
//!
//! The binary (`main.rs`) adds the embassy tasks and peripheral drivers on top
//! of the register math, pixel encoding and spawn bookkeeping kept here.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p tft-glue-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p tft-glue-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

pub mod once;
pub mod pwm;
pub mod wire;
