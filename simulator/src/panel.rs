//! In-memory ST7789 stand-in.
//!
//! Implements [`PanelDriver`] on top of a [`SimulatorDisplay`], so flushes
//! from the glue land in the window exactly where the panel would put them.
//! Pixels fill the address window row by row, continuing across
//! `write_pixels` calls until the window is full.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use tft_glue_common::panel::PanelDriver;

/// Address window set by `set_addr_window`.
#[derive(Clone, Copy, Debug)]
struct Window {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Simulated panel.
pub struct SimPanel {
    display: SimulatorDisplay<Rgb565>,
    window: Option<Window>,
    cursor: usize,
    in_transaction: bool,
    transactions: u32,
}

impl SimPanel {
    pub fn new(size: Size) -> Self {
        Self {
            display: SimulatorDisplay::new(size),
            window: None,
            cursor: 0,
            in_transaction: false,
            transactions: 0,
        }
    }

    /// Panel contents, for `Window::update`.
    pub const fn display(&self) -> &SimulatorDisplay<Rgb565> { &self.display }

    /// Write transactions opened so far.
    pub const fn transactions(&self) -> u32 { self.transactions }
}

impl PanelDriver for SimPanel {
    fn width(&self) -> u16 { self.display.size().width as u16 }

    fn height(&self) -> u16 { self.display.size().height as u16 }

    fn start_write(&mut self) {
        self.in_transaction = true;
        self.transactions += 1;
    }

    fn end_write(&mut self) { self.in_transaction = false; }

    async fn set_addr_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        self.window = Some(Window { x, y, w, h });
        self.cursor = 0;
    }

    async fn write_pixels(
        &mut self,
        pixels: &[u16],
        big_endian: bool,
    ) {
        let Some(window) = self.window.filter(|w| w.w > 0 && self.in_transaction) else {
            return;
        };

        let columns = usize::from(window.w);
        let capacity = columns * usize::from(window.h);
        let start = self.cursor;
        let count = pixels.len().min(capacity.saturating_sub(start));

        let drawn = pixels[..count].iter().enumerate().map(|(i, &raw)| {
            let n = start + i;
            let raw = if big_endian { raw.swap_bytes() } else { raw };
            let point = Point::new(
                i32::from(window.x) + (n % columns) as i32,
                i32::from(window.y) + (n / columns) as i32,
            );
            Pixel(point, Rgb565::from(RawU16::new(raw)))
        });
        self.display.draw_iter(drawn).ok();
        self.cursor += count;
    }

    async fn dma_wait(&mut self) {}
}

// =============================================================================
// Unit Tests
// =============================================================================
