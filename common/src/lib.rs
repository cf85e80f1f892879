//! Glue between a GUI toolkit and an SPI TFT panel (ST7789).
//!
//! This crate contains the platform-agnostic part of the firmware, shared
//! between the Pico 2 build and the desktop simulator:
//!
//! - [`glue`]: [`GlueContext`](glue::GlueContext), the lifecycle controller that owns buffers, drivers and the
//!   tick source
//! - [`flush`]: the flush bridge between toolkit render regions and the panel
//! - [`tick`]: tick clock, prescaler selection and the periodic timer capability
//! - [`buffer`]: render buffer regions (single or DMA double buffered)
//! - [`input`]: pointer input capability, no-touch stub and calibrated touch
//! - [`toolkit`]: the toolkit seam ([`Toolkit`](toolkit::Toolkit), [`DisplayPort`](toolkit::DisplayPort))
//! - [`strip`]: a small dirty-rectangle renderer implementing the toolkit seam
//! - [`screens`] / [`widgets`]: demo content (tabs demo, watch face, graphics self-test)
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p tft-glue-common
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the firmware links this crate as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
// The traits are only used with concrete, single-threaded executors
#![allow(async_fn_in_trait)]

extern crate alloc;

pub mod buffer;
pub mod colors;
pub mod config;
pub mod error;
pub mod flush;
pub mod glue;
pub mod input;
pub mod log;
pub mod pages;
pub mod panel;
pub mod screens;
pub mod strip;
pub mod styles;
pub mod tick;
pub mod toolkit;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use error::GlueError;
pub use glue::GlueContext;
pub use pages::Mode;
