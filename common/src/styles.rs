//! Text and primitive styles shared by the demo screens.
//!
//! Fonts are ProFont at fixed sizes; the GFX-style text sizes 1 to 4 of the
//! self-test map onto [`SIZE_FONTS`].

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::PrimitiveStyle;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{PROFONT_7_POINT, PROFONT_9_POINT, PROFONT_12_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use crate::colors::{BLACK, GRAY, NEAR_BLACK, RED, WHITE};

// =============================================================================
// Fonts
// =============================================================================

pub const TINY_FONT: &MonoFont<'static> = &PROFONT_7_POINT;
pub const SMALL_FONT: &MonoFont<'static> = &PROFONT_9_POINT;
pub const BODY_FONT: &MonoFont<'static> = &PROFONT_12_POINT;
pub const LARGE_FONT: &MonoFont<'static> = &PROFONT_18_POINT;
pub const HUGE_FONT: &MonoFont<'static> = &PROFONT_24_POINT;

/// Fonts standing in for text sizes 1, 2, 3 and 4.
pub const SIZE_FONTS: [&MonoFont<'static>; 4] = [TINY_FONT, BODY_FONT, LARGE_FONT, HUGE_FONT];

// =============================================================================
// Text Alignment
// =============================================================================

/// Centered both ways on the given point.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Left aligned, point is the top-left corner of the first line.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Left aligned, point sits on the baseline (like a GFX text cursor).
pub const BASELINE_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Alphabetic)
    .build();

// =============================================================================
// Text Styles
// =============================================================================

pub const TAB_TEXT_ACTIVE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BODY_FONT, GRAY);
pub const TAB_TEXT_INACTIVE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BODY_FONT, WHITE);
pub const LABEL_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(TINY_FONT, BLACK);

// =============================================================================
// Primitive Styles
// =============================================================================

pub const WHITE_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(WHITE);
pub const BLACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(BLACK);
pub const RED_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(RED);
pub const NEAR_BLACK_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(NEAR_BLACK);
pub const GRAY_OUTLINE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(GRAY, 1);
