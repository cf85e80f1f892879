//! Display wiring for the Pimoroni PIM715 Display Pack 2.8" (ST7789).
//!
//! | Signal | GPIO | Notes |
//! |--------|------|-------|
//! | DC | 16 | low = command, high = data |
//! | CS | 17 | driven by the panel driver, not the SPI block |
//! | CLK | 18 | SPI0 SCK |
//! | MOSI | 19 | SPI0 TX, fed by DMA_CH0 |
//! | Backlight | 20 | high = on |
//! | Reset | RUN | resets with the Pico |

use embassy_rp::spi::Config as SpiConfig;

/// SPI clock for the ST7789 (datasheet maximum).
pub const SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// SPI configuration for the ST7789 display.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = SPI_FREQUENCY_HZ;
    config
}
