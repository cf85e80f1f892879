//! Graphics primitives self-test.
//!
//! Runs the classic ST77xx test sequence one step at a time, each step held
//! on screen for a fixed time before the next one replaces it. A step shows
//! the final picture of its test; steps that drew over the previous screen
//! (text, the single pixel, the outlined circles) still do.
//!
//! # Sequence
//!
//! | Step | Content | Hold |
//! |------|---------|------|
//! | Fill | black screen | 500 ms |
//! | Text | lorem ipsum wrapped per character, white | 1 s |
//! | PrintSizes | "Hello World!" at sizes 1-3, `1234.57` at size 4 | 500 ms |
//! | PrintValues | pi, hex, uptime in seconds | 2 s |
//! | Pixel | green pixel at the center | 500 ms |
//! | Lines | line fan from the bottom-right corner, yellow | 500 ms |
//! | FastLines | 5 px grid, red rows, blue columns | 500 ms |
//! | DrawRects | concentric green squares | 500 ms |
//! | FillRects | concentric yellow squares, magenta outline | 500 ms |
//! | Circles | blue discs, then white circles offset by a radius | 500 ms |
//! | RoundRects | 17 nested rounded rectangles | 500 ms |
//! | Triangles | 16 nested triangles | 500 ms |
//! | MediaButtons | play and pause buttons | 500 ms |
//! | Done | buttons stay up | 1 s |

use core::fmt::Write;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment, Triangle,
};
use embedded_graphics::text::Text;

use crate::colors::{BLACK, BLUE, GREEN, MAGENTA, RED, WHITE, YELLOW};
use crate::strip::{Scene, StripToolkit};
use crate::styles::{SIZE_FONTS, TOP_LEFT};

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
    Curabitur adipiscing ante sed nibh tincidunt feugiat. Maecenas enim massa, \
    fringilla sed malesuada et, malesuada sit amet turpis. Sed porttitor neque ut \
    ante pretium vitae malesuada nunc bibendum. Nullam aliquet ultrices massa eu \
    hendrerit. Ut sed nisi lorem. In vestibulum purus a tortor imperdiet posuere. ";

/// Radius of the circle grid.
const CIRCLE_RADIUS: u32 = 10;

// =============================================================================
// Steps
// =============================================================================

/// One screen of the self-test.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GfxStep {
    #[default]
    Fill,
    Text,
    PrintSizes,
    PrintValues,
    Pixel,
    Lines,
    FastLines,
    DrawRects,
    FillRects,
    Circles,
    RoundRects,
    Triangles,
    MediaButtons,
    Done,
}

impl GfxStep {
    /// Time the step stays on screen.
    pub const fn hold_ms(self) -> u32 {
        match self {
            Self::Text | Self::Done => 1000,
            Self::PrintValues => 2000,
            _ => 500,
        }
    }

    /// Following step; the sequence starts over after [`GfxStep::Done`].
    pub const fn next(self) -> Self {
        match self {
            Self::Fill => Self::Text,
            Self::Text => Self::PrintSizes,
            Self::PrintSizes => Self::PrintValues,
            Self::PrintValues => Self::Pixel,
            Self::Pixel => Self::Lines,
            Self::Lines => Self::FastLines,
            Self::FastLines => Self::DrawRects,
            Self::DrawRects => Self::FillRects,
            Self::FillRects => Self::Circles,
            Self::Circles => Self::RoundRects,
            Self::RoundRects => Self::Triangles,
            Self::Triangles => Self::MediaButtons,
            Self::MediaButtons => Self::Done,
            Self::Done => Self::Fill,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Text => "text",
            Self::PrintSizes => "print sizes",
            Self::PrintValues => "print values",
            Self::Pixel => "pixel",
            Self::Lines => "lines",
            Self::FastLines => "fast lines",
            Self::DrawRects => "rects",
            Self::FillRects => "filled rects",
            Self::Circles => "circles",
            Self::RoundRects => "round rects",
            Self::Triangles => "triangles",
            Self::MediaButtons => "media buttons",
            Self::Done => "done",
        }
    }
}

/// Font standing in for GFX text size `size` (0 behaves like 1).
fn size_font(size: usize) -> &'static MonoFont<'static> { SIZE_FONTS[size.clamp(1, SIZE_FONTS.len()) - 1] }

/// Split `text` into lines of at most `columns` characters, breaking anywhere.
pub fn wrap_chars(
    text: &str,
    columns: usize,
) -> impl Iterator<Item = &str> {
    let columns = columns.max(1);
    let mut rest = text;
    core::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let split = rest.char_indices().nth(columns).map_or(rest.len(), |(idx, _)| idx);
        let (line, tail) = rest.split_at(split);
        rest = tail;
        Some(line)
    })
}

/// Color from a raw 16-bit value, truncated like an integer color counter.
fn raw_color(value: u32) -> Rgb565 { Rgb565::from(RawU16::new(value as u16)) }

// =============================================================================
// Self-Test Scene
// =============================================================================

/// Self-test state.
pub struct SelfTest {
    size: Size,
    step: GfxStep,
    shown_at: Option<u32>,
    uptime_s: u32,
}

impl SelfTest {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            step: GfxStep::Fill,
            shown_at: None,
            uptime_s: 0,
        }
    }

    #[inline]
    pub const fn step(&self) -> GfxStep { self.step }

    /// Restart the sequence.
    pub fn reset(&mut self) {
        self.step = GfxStep::Fill;
        self.shown_at = None;
    }

    /// Move to the next step once the current one has been held long enough.
    /// Returns `true` when the step changed.
    pub fn update(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) -> bool {
        let Some(shown_at) = self.shown_at else {
            self.shown_at = Some(now_ms);
            return false;
        };
        if now_ms.wrapping_sub(shown_at) < self.step.hold_ms() {
            return false;
        }
        self.step = self.step.next();
        self.shown_at = Some(now_ms);
        if self.step == GfxStep::PrintValues {
            self.uptime_s = now_ms / 1000;
        }
        toolkit.invalidate_all();
        true
    }

    fn width(&self) -> i32 { self.size.width as i32 }

    fn height(&self) -> i32 { self.size.height as i32 }

    fn center(&self) -> Point { Point::new(self.width() / 2, self.height() / 2) }

    fn draw_step<D>(
        &self,
        step: GfxStep,
        d: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        match step {
            GfxStep::Fill => {
                d.clear(BLACK).ok();
            }
            GfxStep::Text => {
                self.draw_step(GfxStep::Fill, d);
                self.draw_text(d);
            }
            GfxStep::PrintSizes => self.draw_print_sizes(d),
            GfxStep::PrintValues => self.draw_print_values(d),
            GfxStep::Pixel => {
                self.draw_step(GfxStep::PrintValues, d);
                Pixel(self.center(), GREEN).draw(d).ok();
            }
            GfxStep::Lines => self.draw_lines(d),
            GfxStep::FastLines => self.draw_fast_lines(d),
            GfxStep::DrawRects => self.draw_rects(d),
            GfxStep::FillRects => self.fill_rects(d),
            GfxStep::Circles => self.draw_circles(d),
            GfxStep::RoundRects => self.draw_round_rects(d),
            GfxStep::Triangles => self.draw_triangles(d),
            GfxStep::MediaButtons | GfxStep::Done => draw_media_buttons(d),
        }
    }

    fn draw_text<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        let font = size_font(1);
        let style = MonoTextStyle::new(font, WHITE);
        let columns = (self.size.width / font.character_size.width) as usize;
        let mut y = 0;
        for line in wrap_chars(LOREM, columns) {
            Text::with_text_style(line, Point::new(0, y), style, TOP_LEFT).draw(d).ok();
            y += font.character_size.height as i32;
        }
    }

    fn draw_print_sizes<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let mut y = 30;
        for (size, color) in [(1, RED), (2, YELLOW), (3, GREEN)] {
            let font = size_font(size);
            Text::with_text_style("Hello World!", Point::new(0, y), MonoTextStyle::new(font, color), TOP_LEFT)
                .draw(d)
                .ok();
            y += font.character_size.height as i32;
        }
        let mut number = heapless::String::<16>::new();
        write!(number, "{:.2}", 1234.567_f32).ok();
        Text::with_text_style(&number, Point::new(0, y), MonoTextStyle::new(size_font(4), BLUE), TOP_LEFT)
            .draw(d)
            .ok();
    }

    fn draw_print_values<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let font = size_font(1);
        let white = MonoTextStyle::new(font, WHITE);
        let green = MonoTextStyle::new(font, GREEN);
        let line_height = font.character_size.height as i32;

        let mut pi = heapless::String::<32>::new();
        write!(pi, "{:.6} Want pi?", core::f32::consts::PI).ok();
        let mut hex = heapless::String::<32>::new();
        write!(hex, "{:X} Print HEX!", 8_675_309).ok();

        let lines = [
            ("Hello World!", white),
            (pi.as_str(), green),
            (" ", green),
            (hex.as_str(), green),
            (" ", green),
            ("Sketch has been", white),
            ("running for: ", white),
        ];
        let mut y = 0;
        for (text, style) in lines {
            Text::with_text_style(text, Point::new(0, y), style, TOP_LEFT).draw(d).ok();
            y += line_height;
        }

        let mut secs = heapless::String::<12>::new();
        write!(secs, "{}", self.uptime_s).ok();
        let next = Text::with_text_style(&secs, Point::new(0, y), MonoTextStyle::new(font, MAGENTA), TOP_LEFT)
            .draw(d)
            .unwrap_or(Point::new(0, y));
        Text::with_text_style(" seconds.", next, white, TOP_LEFT).draw(d).ok();
    }

    fn draw_lines<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let style = PrimitiveStyle::with_stroke(YELLOW, 1);
        let corner = Point::new(self.width() - 1, self.height() - 1);
        for x in (0..self.width()).step_by(6) {
            Line::new(corner, Point::new(x, 0)).into_styled(style).draw(d).ok();
        }
        for y in (0..self.height()).step_by(6) {
            Line::new(corner, Point::new(0, y)).into_styled(style).draw(d).ok();
        }
    }

    fn draw_fast_lines<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        for y in (0..self.height()).step_by(5) {
            d.fill_solid(&Rectangle::new(Point::new(0, y), Size::new(self.size.width, 1)), RED).ok();
        }
        for x in (0..self.width()).step_by(5) {
            d.fill_solid(&Rectangle::new(Point::new(x, 0), Size::new(1, self.size.height)), BLUE).ok();
        }
    }

    fn draw_rects<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let center = self.center();
        for x in (0..self.width()).step_by(6) {
            Rectangle::new(center - Point::new(x / 2, x / 2), Size::new_equal(x as u32))
                .into_styled(PrimitiveStyle::with_stroke(GREEN, 1))
                .draw(d)
                .ok();
        }
    }

    fn fill_rects<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let center = self.center();
        let style = PrimitiveStyleBuilder::new()
            .fill_color(YELLOW)
            .stroke_color(MAGENTA)
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let mut x = self.width() - 1;
        while x > 6 {
            Rectangle::new(center - Point::new(x / 2, x / 2), Size::new_equal(x as u32))
                .into_styled(style)
                .draw(d)
                .ok();
            x -= 6;
        }
    }

    fn draw_circles<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let r = CIRCLE_RADIUS as i32;
        let diameter = CIRCLE_RADIUS * 2 + 1;
        for x in (r..self.width()).step_by(2 * r as usize) {
            for y in (r..self.height()).step_by(2 * r as usize) {
                Circle::with_center(Point::new(x, y), diameter)
                    .into_styled(PrimitiveStyle::with_fill(BLUE))
                    .draw(d)
                    .ok();
            }
        }
        for x in (0..self.width() + r).step_by(2 * r as usize) {
            for y in (0..self.height() + r).step_by(2 * r as usize) {
                Circle::with_center(Point::new(x, y), diameter)
                    .into_styled(PrimitiveStyle::with_stroke(WHITE, 1))
                    .draw(d)
                    .ok();
            }
        }
    }

    fn draw_round_rects<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        // Five identical passes with a running color; only the last one stays visible.
        let mut color = 100 + 4 * (17 * 1100 + 100);
        let (mut x, mut y) = (0, 0);
        let (mut w, mut h) = (self.width() - 2, self.height() - 2);
        for _ in 0..17 {
            if w > 0 && h > 0 {
                let rect = Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32));
                RoundedRectangle::with_equal_corners(rect, Size::new_equal(5))
                    .into_styled(PrimitiveStyle::with_stroke(raw_color(color), 1))
                    .draw(d)
                    .ok();
            }
            x += 2;
            y += 3;
            w -= 4;
            h -= 6;
            color += 1100;
        }
    }

    fn draw_triangles<D: DrawTarget<Color = Rgb565>>(
        &self,
        d: &mut D,
    ) {
        d.clear(BLACK).ok();
        let mut color = 0xF800;
        let w = self.width() / 2;
        let (mut x, mut y, mut z) = (self.height() - 1, 0, self.width());
        for _ in 0..16 {
            Triangle::new(Point::new(w, y), Point::new(y, x), Point::new(z, x))
                .into_styled(PrimitiveStyle::with_stroke(raw_color(color), 1))
                .draw(d)
                .ok();
            x -= 4;
            y += 4;
            z -= 4;
            color += 100;
        }
    }
}

fn draw_media_buttons<D: DrawTarget<Color = Rgb565>>(d: &mut D) {
    d.clear(BLACK).ok();
    let button = |x, y| {
        RoundedRectangle::with_equal_corners(Rectangle::new(Point::new(x, y), Size::new(78, 60)), Size::new_equal(8))
    };
    let bar = |x| {
        RoundedRectangle::with_equal_corners(Rectangle::new(Point::new(x, 98), Size::new(20, 45)), Size::new_equal(5))
    };

    button(25, 10).into_styled(PrimitiveStyle::with_fill(WHITE)).draw(d).ok();
    Triangle::new(Point::new(42, 20), Point::new(42, 60), Point::new(90, 40))
        .into_styled(PrimitiveStyle::with_fill(GREEN))
        .draw(d)
        .ok();
    button(25, 90).into_styled(PrimitiveStyle::with_fill(WHITE)).draw(d).ok();
    for x in [39, 69] {
        bar(x).into_styled(PrimitiveStyle::with_fill(RED)).draw(d).ok();
    }
}

impl Scene for SelfTest {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
    ) {
        self.draw_step(self.step, target);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::config::GlueConfig;
    use crate::glue::GlueContext;
    use crate::input::NoTouch;
    use crate::testing::{MockPanel, MockTimer};
    use crate::tick::TickClock;

    fn render(test: &SelfTest) -> MockDisplay<Rgb565> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        test.draw(&mut display);
        display
    }

    fn at_step(step: GfxStep) -> SelfTest {
        let mut test = SelfTest::new(Size::new(64, 64));
        test.step = step;
        test
    }

    #[test]
    fn test_sequence_wraps_after_done() {
        let mut step = GfxStep::Fill;
        let mut total = 0;
        for _ in 0..14 {
            total += step.hold_ms();
            step = step.next();
        }
        assert_eq!(step, GfxStep::Fill);
        assert_eq!(total, 11 * 500 + 2 * 1000 + 2000);
    }

    #[test]
    fn test_wrap_chars() {
        let lines: Vec<&str> = wrap_chars("abcdefgh", 3).collect();
        assert_eq!(lines, ["abc", "def", "gh"]);
        assert_eq!(wrap_chars("", 3).count(), 0);
        assert_eq!(wrap_chars("ab", 0).count(), 2);
    }

    #[test]
    fn test_raw_color_truncates() {
        assert_eq!(raw_color(0x1_F800), RED);
        assert_eq!(raw_color(0xF800), RED);
    }

    #[test]
    fn test_pixel_step_keeps_print_screen() {
        let display = render(&at_step(GfxStep::Pixel));
        assert_eq!(display.get_pixel(Point::new(32, 32)), Some(GREEN));
        assert_eq!(display.get_pixel(Point::new(63, 63)), Some(BLACK));
    }

    #[test]
    fn test_fast_lines_grid() {
        let display = render(&at_step(GfxStep::FastLines));
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(BLUE));
        assert_eq!(display.get_pixel(Point::new(1, 0)), Some(RED));
        assert_eq!(display.get_pixel(Point::new(5, 3)), Some(BLUE));
        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(BLACK));
    }

    #[test]
    fn test_media_buttons() {
        let display = render(&at_step(GfxStep::Done));
        assert_eq!(display.get_pixel(Point::new(50, 40)), Some(GREEN));
        assert_eq!(display.get_pixel(Point::new(30, 40)), Some(WHITE));
        assert_eq!(display.get_pixel(Point::new(45, 60)), Some(WHITE));
        assert_eq!(display.get_pixel(Point::new(5, 5)), Some(BLACK));
    }

    #[test]
    fn test_steps_advance_on_hold() {
        static CLOCK: TickClock = TickClock::new();
        let mut toolkit = StripToolkit::new(&CLOCK);
        let mut glue = GlueContext::<_, NoTouch, _>::new(MockPanel::new(240, 240), None, GlueConfig::default());
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();
        let mut test = SelfTest::new(Size::new(240, 240));

        assert!(!test.update(0, &mut toolkit));
        assert!(!test.update(499, &mut toolkit));
        assert!(test.update(500, &mut toolkit));
        assert_eq!(test.step(), GfxStep::Text);
        assert!(!test.update(1499, &mut toolkit));
        assert!(test.update(1500, &mut toolkit));
        assert!(test.update(2000, &mut toolkit));
        assert_eq!(test.step(), GfxStep::PrintValues);
        assert_eq!(test.uptime_s, 2);
        assert_eq!(toolkit.dirty_areas().len(), 1);
    }
}
