//! Panel driver capability.
//!
//! The flush bridge drives the TFT through this trait only. The firmware
//! implements it for the ST7789 over async SPI, the simulator for an
//! in-memory window, and the tests for a recording mock.
//!
//! # Transaction Model
//!
//! ```text
//! start_write ─► set_addr_window ─► write_pixels ─► (return, DMA may still run)
//!                                                   dma_wait ─► end_write
//! ```
//!
//! A transaction stays open after `write_pixels` returns. The next flush closes
//! it with `dma_wait` followed by `end_write` before opening its own.

/// Async access to an SPI TFT panel driver.
pub trait PanelDriver {
    /// Panel width in pixels, in the current rotation.
    fn width(&self) -> u16;

    /// Panel height in pixels, in the current rotation.
    fn height(&self) -> u16;

    /// Select the panel and open a write transaction (CS low).
    fn start_write(&mut self);

    /// Close the write transaction (CS high).
    fn end_write(&mut self);

    /// Set the rectangle subsequent pixels fill, row by row.
    async fn set_addr_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    );

    /// Send 16-bit pixels to the address window.
    ///
    /// `big_endian` is true when the pixels are already in wire order and must
    /// go out as stored; otherwise the driver swaps each pixel to big-endian.
    async fn write_pixels(
        &mut self,
        pixels: &[u16],
        big_endian: bool,
    );

    /// Wait until the pixel transfer started by `write_pixels` has finished.
    async fn dma_wait(&mut self);
}
