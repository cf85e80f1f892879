//! Vector icons.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle};

/// "Add schedule event" icon: a calendar page with a plus, `size` pixels square.
pub fn draw_schedule_icon<D>(
    display: &mut D,
    center: Point,
    size: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let stroke = (size / 16).max(1);
    let outline = PrimitiveStyle::with_stroke(color, stroke);
    let fill = PrimitiveStyle::with_fill(color);

    // Page with a solid header band
    let page = Rectangle::with_center(
        center + Point::new(0, (size / 16) as i32),
        Size::new(size * 3 / 4, size * 5 / 8),
    );
    let corner = Size::new(size / 10, size / 10);
    RoundedRectangle::with_equal_corners(page, corner)
        .into_styled(outline)
        .draw(display)
        .ok();
    Rectangle::new(page.top_left, Size::new(page.size.width, page.size.height / 5))
        .into_styled(fill)
        .draw(display)
        .ok();

    // Binder rings
    let ring_top = page.top_left.y - (size / 10) as i32;
    for dx in [page.size.width as i32 / 4, page.size.width as i32 * 3 / 4] {
        let x = page.top_left.x + dx;
        Line::new(Point::new(x, ring_top), Point::new(x, page.top_left.y + 2))
            .into_styled(outline)
            .draw(display)
            .ok();
    }

    // Plus sign in the lower part of the page
    let plus_center = page.center() + Point::new(0, (page.size.height / 10) as i32);
    let arm = (size / 8) as i32;
    Line::new(plus_center - Point::new(arm, 0), plus_center + Point::new(arm, 0))
        .into_styled(outline)
        .draw(display)
        .ok();
    Line::new(plus_center - Point::new(0, arm), plus_center + Point::new(0, arm))
        .into_styled(outline)
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================
