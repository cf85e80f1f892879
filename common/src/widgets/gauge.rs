//! Circular gauge with a 0..=100 scale.
//!
//! The scale sweeps 240 degrees clockwise, starting bottom left. Major ticks
//! every 10, labels every 20, the top 20% of the scale is drawn in red.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder};
use embedded_graphics::text::Text;
#[cfg(not(test))]
use micromath::F32Ext;

use crate::colors::{BLACK, GRAY, RED, WHITE};
use crate::styles::{CENTERED, LABEL_STYLE, TINY_FONT};

/// Scale start, degrees clockwise from 3 o'clock.
const START_ANGLE: f32 = 150.0;
/// Scale sweep in degrees.
const SWEEP_ANGLE: f32 = 240.0;
/// Values from here up are drawn as the critical zone.
const CRITICAL_VALUE: i32 = 80;

const FACE_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyleBuilder::new()
    .fill_color(WHITE)
    .stroke_color(GRAY)
    .stroke_width(2)
    .build();
const HUB_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(GRAY);
const NEEDLE_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(RED, 3);

/// Screen angle of `value` on the scale, in radians.
fn value_angle(value: i32) -> f32 {
    let degrees = START_ANGLE + SWEEP_ANGLE * value.clamp(0, 100) as f32 / 100.0;
    degrees.to_radians()
}

/// Point at `radius` from `center` in the direction of `value`.
fn polar(
    center: Point,
    radius: f32,
    value: i32,
) -> Point {
    let angle = value_angle(value);
    center + Point::new((angle.cos() * radius) as i32, (angle.sin() * radius) as i32)
}

/// Draw a gauge of `diameter` pixels centered on `center` showing `value`.
pub fn draw_gauge<D>(
    display: &mut D,
    center: Point,
    diameter: u32,
    value: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let radius = diameter as f32 / 2.0;

    Circle::with_center(center, diameter)
        .into_styled(FACE_STYLE)
        .draw(display)
        .ok();

    for tick in (0..=100).step_by(5) {
        let major = tick % 10 == 0;
        let color = if tick >= CRITICAL_VALUE { RED } else { BLACK };
        let inner = radius * if major { 0.78 } else { 0.85 };
        Line::new(polar(center, inner, tick), polar(center, radius * 0.92, tick))
            .into_styled(PrimitiveStyle::with_stroke(color, if major { 2 } else { 1 }))
            .draw(display)
            .ok();

        if tick % 20 == 0 {
            let mut label = heapless::String::<4>::new();
            write!(label, "{tick}").ok();
            let style = if tick >= CRITICAL_VALUE { MonoTextStyle::new(TINY_FONT, RED) } else { LABEL_STYLE };
            Text::with_text_style(&label, polar(center, radius * 0.62, tick), style, CENTERED)
                .draw(display)
                .ok();
        }
    }

    Line::new(center, polar(center, radius * 0.75, value))
        .into_styled(NEEDLE_STYLE)
        .draw(display)
        .ok();
    Circle::with_center(center, (diameter / 10).max(5))
        .into_styled(HUB_STYLE)
        .draw(display)
        .ok();

    let mut readout = heapless::String::<4>::new();
    write!(readout, "{}", value.clamp(0, 100)).ok();
    Text::with_text_style(&readout, center + Point::new(0, (radius * 0.5) as i32), LABEL_STYLE, CENTERED)
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    #[test]
    fn test_scale_ends() {
        let center = Point::new(100, 100);
        // 0 sits bottom left, 100 bottom right, 50 straight up
        let zero = polar(center, 50.0, 0);
        let full = polar(center, 50.0, 100);
        let half = polar(center, 50.0, 50);
        assert!(zero.x < center.x && zero.y > center.y);
        assert!(full.x > center.x && full.y > center.y);
        assert!((half.x - center.x).abs() <= 1);
        assert!((half.y - (center.y - 50)).abs() <= 1);
    }

    #[test]
    fn test_value_is_clamped() {
        assert_eq!(value_angle(-20), value_angle(0));
        assert_eq!(value_angle(150), value_angle(100));
    }

    #[test]
    fn test_draw_inside_bounds() {
        let mut display: MockDisplay<Rgb565> = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        draw_gauge(&mut display, Point::new(32, 32), 60, 42);
        assert_eq!(display.get_pixel(Point::new(32, 32)), Some(GRAY));
    }
}
