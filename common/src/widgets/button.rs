//! Rounded push button with a centered label.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;

use crate::styles::CENTERED;

/// Button geometry, placed by its center like the classic GFX buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub center: Point,
    pub size: Size,
}

impl Button {
    pub const fn new(
        center: Point,
        size: Size,
    ) -> Self {
        Self { center, size }
    }

    pub fn bounds(&self) -> Rectangle { Rectangle::with_center(self.center, self.size) }

    /// Hit test for a pointer position.
    pub fn contains(
        &self,
        point: Point,
    ) -> bool {
        self.bounds().contains(point)
    }

    /// Draw the button. Corner radius is a quarter of the shorter side.
    pub fn draw<D>(
        &self,
        display: &mut D,
        fill: Rgb565,
        outline: Rgb565,
        label: &str,
        text_style: MonoTextStyle<'_, Rgb565>,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let radius = self.size.width.min(self.size.height) / 4;
        let style = PrimitiveStyleBuilder::new()
            .fill_color(fill)
            .stroke_color(outline)
            .stroke_width(1)
            .build();
        RoundedRectangle::with_equal_corners(self.bounds(), Size::new(radius, radius))
            .into_styled(style)
            .draw(display)
            .ok();
        Text::with_text_style(label, self.center, text_style, CENTERED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test() {
        let button = Button::new(Point::new(120, 170), Size::new(200, 60));
        assert!(button.contains(Point::new(120, 170)));
        assert!(button.contains(Point::new(20, 140)));
        assert!(!button.contains(Point::new(19, 170)));
        assert!(!button.contains(Point::new(120, 200)));
    }
}
