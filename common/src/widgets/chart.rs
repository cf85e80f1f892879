//! Column chart.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};

use crate::colors::{GRAY, WHITE};

/// Horizontal division lines inside the plot area.
const DIVISIONS: i32 = 3;
/// Padding between the frame and the plot area.
const PADDING: u32 = 8;

const FRAME_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyleBuilder::new()
    .fill_color(WHITE)
    .stroke_color(GRAY)
    .stroke_width(1)
    .build();
const DIVISION_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(GRAY, 1);

/// Draw `values` (0..=100, oldest first) as columns inside `bounds`.
pub fn draw_column_chart<D>(
    display: &mut D,
    bounds: Rectangle,
    values: impl ExactSizeIterator<Item = u8>,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    bounds.into_styled(FRAME_STYLE).draw(display).ok();

    let plot = bounds.offset(-(PADDING as i32));
    let Some(bottom_right) = plot.bottom_right() else {
        return;
    };
    let height = plot.size.height as i32;

    for i in 1..=DIVISIONS {
        let y = plot.top_left.y + height * i / (DIVISIONS + 1);
        Line::new(Point::new(plot.top_left.x, y), Point::new(bottom_right.x, y))
            .into_styled(DIVISION_STYLE)
            .draw(display)
            .ok();
    }

    let count = values.len().max(1) as u32;
    let slot = plot.size.width / count;
    let column = (slot * 2 / 3).max(1);
    let column_style = PrimitiveStyle::with_fill(color);

    for (i, value) in values.enumerate() {
        let column_height = u32::from(value.min(100)) * plot.size.height / 100;
        if column_height == 0 {
            continue;
        }
        let x = plot.top_left.x + (slot * i as u32 + (slot - column) / 2) as i32;
        Rectangle::new(
            Point::new(x, bottom_right.y + 1 - column_height as i32),
            Size::new(column, column_height),
        )
        .into_styled(column_style)
        .draw(display)
        .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
