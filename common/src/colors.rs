//! Color constants for the demo screens.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! This is the only format the glue moves around: the render buffer, the
//! flush bridge and the ST7789 all agree on it, so no conversion happens
//! between the toolkit and the panel.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Panel Palette (the classic ST77xx 16-bit colors)
// =============================================================================

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;
pub const RED: Rgb565 = Rgb565::RED;
pub const GREEN: Rgb565 = Rgb565::GREEN;
pub const BLUE: Rgb565 = Rgb565::BLUE;
pub const CYAN: Rgb565 = Rgb565::CYAN;
pub const MAGENTA: Rgb565 = Rgb565::MAGENTA;
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// ST77xx orange (0xFC00).
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Mid gray used for inactive tab text.
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

// =============================================================================
// Application Colors
// =============================================================================

/// Almost-black used for secondary text and icon discs on the watch face.
pub const NEAR_BLACK: Rgb565 = rgb_hex565(0x0A_0A0A);

/// Tab bar gradient, top color.
pub const TAB_BG_TOP: Rgb565 = rgb_hex565(0x40_8040);

/// Tab bar gradient, bottom color.
pub const TAB_BG_BOTTOM: Rgb565 = rgb_hex565(0x30_4030);

/// Convert a 24-bit `0xRRGGBB` value to Rgb565.
///
/// Scales each channel with integer arithmetic (`c * max / 255`), which
/// truncates instead of rounding. Dark colors therefore map a little darker
/// than a plain shift would.
pub const fn rgb_hex565(rgb888: u32) -> Rgb565 {
    let r = (rgb888 >> 16) & 0xFF;
    let g = (rgb888 >> 8) & 0xFF;
    let b = rgb888 & 0xFF;
    Rgb565::new((r * 31 / 255) as u8, (g * 63 / 255) as u8, (b * 31 / 255) as u8)
}

/// Raw 16-bit value of a color, as stored in the render buffer.
#[inline]
pub fn to_raw(color: Rgb565) -> u16 {
    use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
    RawU16::from(color).into_inner()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex565_extremes() {
        assert_eq!(rgb_hex565(0x00_0000), BLACK);
        assert_eq!(rgb_hex565(0xFF_FFFF), WHITE);
        assert_eq!(rgb_hex565(0xFF_0000), RED);
    }

    #[test]
    fn test_rgb_hex565_truncates() {
        // 10 * 31 / 255 = 1, 10 * 63 / 255 = 2
        assert_eq!(NEAR_BLACK, Rgb565::new(1, 2, 1));
    }

    #[test]
    fn test_raw_values_match_st77xx_palette() {
        assert_eq!(to_raw(BLACK), 0x0000);
        assert_eq!(to_raw(WHITE), 0xFFFF);
        assert_eq!(to_raw(RED), 0xF800);
        assert_eq!(to_raw(GREEN), 0x07E0);
        assert_eq!(to_raw(BLUE), 0x001F);
        assert_eq!(to_raw(ORANGE), 0xFC00);
    }
}
