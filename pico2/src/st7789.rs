//! Async ST7789 panel driver for embassy-rp.
//!
//! Implements [`PanelDriver`] so the flush bridge can push toolkit regions to
//! the panel. Pixels go out over SPI0 with DMA.
//!
//! # Transfers
//!
//! - **Commands:** DC low for the command byte, DC high for its parameters
//! - **Pixels:** `RAMWR` then the window's pixels in one or more DMA writes
//! - **Byte order:** pre-swapped regions are sent as stored; native regions are
//!   encoded big-endian through a small scratch buffer
//! - **Errors:** SPI faults are logged and counted, the transfer carries on
//!
//! CS is driven by `start_write`/`end_write`, so a whole flush (window plus
//! pixels) happens in one chip-select period.

use core::sync::atomic::{AtomicU32, Ordering};

use defmt::warn;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::Timer;
use tft_glue_common::panel::PanelDriver;
use tft_glue_pico2::wire::{SCRATCH_BYTES, as_bytes, encode_be};

/// Panel size in landscape (90° rotation).
pub const WIDTH: u16 = 320;
pub const HEIGHT: u16 = 240;

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

// MADCTL flags
const MADCTL_MX: u8 = 0x40; // Column address order
const MADCTL_MV: u8 = 0x20; // Row/column exchange

/// SPI writes that reported an error.
pub static SPI_ERRORS: AtomicU32 = AtomicU32::new(0);

/// ST7789 on SPI0 with DC and CS lines.
pub struct St7789Panel<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> St7789Panel<'d> {
    /// Create a new panel from SPI and control pins.
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    /// Initialize the display hardware.
    pub async fn init(&mut self) {
        // Software reset
        self.command(SWRESET, &[]).await;
        Timer::after_millis(150).await;

        // Exit sleep mode
        self.command(SLPOUT, &[]).await;
        Timer::after_millis(10).await;

        // Set pixel format to RGB565 (16-bit)
        self.command(COLMOD, &[0x55]).await;

        // MV=1 (row/col exchange), MX=1 (mirror X) = landscape
        self.command(MADCTL, &[MADCTL_MV | MADCTL_MX]).await;

        // Inversion on (required for PIM715)
        self.command(INVON, &[]).await;
        Timer::after_millis(10).await;

        // Normal display mode
        self.command(NORON, &[]).await;
        Timer::after_millis(10).await;

        // Display on
        self.command(DISPON, &[]).await;
        Timer::after_millis(10).await;
    }

    /// One standalone command with its own chip-select period.
    async fn command(
        &mut self,
        cmd: u8,
        params: &[u8],
    ) {
        self.cs.set_low();
        self.write_command(cmd, params).await;
        self.cs.set_high();
    }

    /// Command byte (DC low) followed by parameters (DC high). CS must be low.
    async fn write_command(
        &mut self,
        cmd: u8,
        params: &[u8],
    ) {
        self.dc.set_low();
        self.write(&[cmd]).await;
        self.dc.set_high();
        if !params.is_empty() {
            self.write(params).await;
        }
    }

    async fn write(
        &mut self,
        bytes: &[u8],
    ) {
        if self.spi.write(bytes).await.is_err() {
            let errors = SPI_ERRORS.fetch_add(1, Ordering::Relaxed) + 1;
            warn!("ST7789: SPI write of {} bytes failed ({} total)", bytes.len(), errors);
        }
    }
}

impl PanelDriver for St7789Panel<'_> {
    fn width(&self) -> u16 { WIDTH }

    fn height(&self) -> u16 { HEIGHT }

    fn start_write(&mut self) { self.cs.set_low(); }

    fn end_write(&mut self) { self.cs.set_high(); }

    async fn set_addr_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        let x1 = x + w.max(1) - 1;
        let y1 = y + h.max(1) - 1;

        self.write_command(CASET, &[(x >> 8) as u8, x as u8, (x1 >> 8) as u8, x1 as u8]).await;
        self.write_command(RASET, &[(y >> 8) as u8, y as u8, (y1 >> 8) as u8, y1 as u8]).await;
    }

    async fn write_pixels(
        &mut self,
        pixels: &[u16],
        big_endian: bool,
    ) {
        self.write_command(RAMWR, &[]).await;

        if big_endian {
            self.write(as_bytes(pixels)).await;
            return;
        }

        let mut scratch = [0u8; SCRATCH_BYTES];
        let mut rest = pixels;
        while !rest.is_empty() {
            let count = encode_be(rest, &mut scratch);
            self.write(&scratch[..count * 2]).await;
            rest = &rest[count..];
        }
    }

    async fn dma_wait(&mut self) {
        // `Spi::write` resolves once DMA has drained and the bus is idle.
    }
}
