//! Smartwatch face cycling through schedule pages.
//!
//! White on black, like an OLED watch. Pages are laid out for a 240x240 face and centered on larger panels. The
//! face advances every [`PAGE_HOLD_MS`]; tapping "Back" on the event page
//! returns to the clock.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{BLACK, BLUE, NEAR_BLACK, ORANGE, WHITE};
use crate::strip::{PointerEvent, Scene, StripToolkit};
use crate::styles::{BASELINE_LEFT, BODY_FONT, HUGE_FONT, LARGE_FONT, SMALL_FONT};
use crate::widgets::{Button, draw_schedule_icon};

/// Time each page stays on screen.
pub const PAGE_HOLD_MS: u32 = 2000;

/// Side of the square face.
pub const FACE_SIZE: u32 = 240;

const BACK_BUTTON: Button = Button::new(Point::new(120, 170), Size::new(200, 60));

const TEXT: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(LARGE_FONT, WHITE);
const TEXT_BODY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BODY_FONT, WHITE);
const TEXT_DIM: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BODY_FONT, NEAR_BLACK);
const TEXT_TIME: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(LARGE_FONT, ORANGE);
const TEXT_TITLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(HUGE_FONT, WHITE);
const TEXT_SMALL: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(SMALL_FONT, NEAR_BLACK);

const EVENT_TEXT: &str = "   In 5 minutes, start\n   activity 2 at place B";
const MESSAGE_TEXT: &str = "Lorem ipsum\ndolor sit amet,\nconsectetur\nadipiscing elit.";

/// Watch face pages in display order.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchPage {
    /// Time with the schedule shortcut.
    #[default]
    Clock,
    /// Next entry of the agenda.
    Agenda,
    /// Upcoming event notification with a Back button.
    Event,
    /// Full text of a message.
    Message,
}

impl WatchPage {
    /// Following page, wrapping to the clock.
    pub const fn next(self) -> Self {
        match self {
            Self::Clock => Self::Agenda,
            Self::Agenda => Self::Event,
            Self::Event => Self::Message,
            Self::Message => Self::Clock,
        }
    }
}

/// Watch face demo state.
pub struct WatchFace {
    origin: Point,
    page: WatchPage,
    shown_at: Option<u32>,
}

impl WatchFace {
    /// Face centered on a screen of `size`.
    pub fn new(size: Size) -> Self {
        let dx = size.width.saturating_sub(FACE_SIZE) / 2;
        let dy = size.height.saturating_sub(FACE_SIZE) / 2;
        Self {
            origin: Point::new(dx as i32, dy as i32),
            page: WatchPage::Clock,
            shown_at: None,
        }
    }

    #[inline]
    pub const fn page(&self) -> WatchPage { self.page }

    fn face(&self) -> Rectangle { Rectangle::new(self.origin, Size::new_equal(FACE_SIZE)) }

    /// Restart from the clock page.
    pub fn reset(&mut self) {
        self.page = WatchPage::Clock;
        self.shown_at = None;
    }

    /// Advance to the next page once the current one has been held long enough.
    pub fn update(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        let Some(shown_at) = self.shown_at else {
            self.shown_at = Some(now_ms);
            return;
        };
        if now_ms.wrapping_sub(shown_at) >= PAGE_HOLD_MS {
            self.page = self.page.next();
            self.shown_at = Some(now_ms);
            toolkit.invalidate(&self.face());
        }
    }

    fn draw_page<D>(
        &self,
        face: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        match self.page {
            WatchPage::Clock => {
                Text::with_text_style("7:00", Point::new(40, 100), TEXT_TITLE, BASELINE_LEFT)
                    .draw(face)
                    .ok();
                Circle::with_center(Point::new(120, 170), 80)
                    .into_styled(PrimitiveStyle::with_fill(NEAR_BLACK))
                    .draw(face)
                    .ok();
                draw_schedule_icon(face, Point::new(120, 170), 64, BLUE);
            }
            WatchPage::Agenda => {
                let lines = [
                    ("Place A", Point::new(0, 30), TEXT),
                    ("From", Point::new(0, 60), TEXT_DIM),
                    ("To", Point::new(150, 60), TEXT_DIM),
                    ("8:00", Point::new(0, 100), TEXT_TIME),
                    ("9:30", Point::new(150, 100), TEXT_TIME),
                    ("Activity", Point::new(0, 140), TEXT_DIM),
                    ("Lorem ipsu ...", Point::new(0, 180), TEXT),
                ];
                for (text, at, style) in lines {
                    Text::with_text_style(text, at, style, BASELINE_LEFT)
                        .draw(face)
                        .ok();
                }
            }
            WatchPage::Event => {
                Circle::with_center(Point::new(25, 25), 44)
                    .into_styled(PrimitiveStyle::with_fill(BLUE))
                    .draw(face)
                    .ok();
                draw_schedule_icon(face, Point::new(25, 25), 40, WHITE);
                Text::with_text_style("Schedule", Point::new(53, 40), TEXT_TITLE, BASELINE_LEFT)
                    .draw(face)
                    .ok();
                Text::with_text_style("10:30", Point::new(195, 40), TEXT_SMALL, BASELINE_LEFT)
                    .draw(face)
                    .ok();
                Text::with_text_style(EVENT_TEXT, Point::new(0, 80), TEXT_BODY, BASELINE_LEFT)
                    .draw(face)
                    .ok();
                BACK_BUTTON.draw(face, NEAR_BLACK, NEAR_BLACK, "Back", MonoTextStyle::new(LARGE_FONT, WHITE));
            }
            WatchPage::Message => {
                Text::with_text_style(MESSAGE_TEXT, Point::new(0, 30), TEXT, BASELINE_LEFT)
                    .draw(face)
                    .ok();
            }
        }
    }
}

impl Scene for WatchFace {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
    ) {
        target.clear(BLACK).ok();
        let face = self.face();
        let mut clipped = target.clipped(&face);
        let mut face_target = clipped.translated(face.top_left);
        self.draw_page(&mut face_target);
    }

    fn on_pointer(
        &mut self,
        event: PointerEvent,
        now_ms: u32,
    ) -> Option<Rectangle> {
        let PointerEvent::Pressed(point) = event else {
            return None;
        };
        if self.page != WatchPage::Event || !BACK_BUTTON.contains(point - self.origin) {
            return None;
        }
        self.page = WatchPage::Clock;
        self.shown_at = Some(now_ms);
        Some(self.face())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::colors::to_raw;
    use crate::config::GlueConfig;
    use crate::glue::GlueContext;
    use crate::input::NoTouch;
    use crate::testing::{MockPanel, MockTimer};
    use crate::tick::TickClock;
    use crate::toolkit::Area;

    #[test]
    fn test_pages_cycle() {
        let mut page = WatchPage::Clock;
        for _ in 0..4 {
            page = page.next();
        }
        assert_eq!(page, WatchPage::Clock);
        assert_eq!(WatchPage::Agenda.next(), WatchPage::Event);
    }

    #[test]
    fn test_page_advances_after_hold() {
        static CLOCK: TickClock = TickClock::new();
        let mut toolkit = StripToolkit::new(&CLOCK);
        let mut glue = GlueContext::<_, NoTouch, _>::new(MockPanel::new(320, 240), None, GlueConfig::default());
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();
        block_on(toolkit.task_handler(&mut glue, &mut WatchFace::new(Size::new(320, 240))));

        let mut watch = WatchFace::new(Size::new(320, 240));
        watch.update(1000, &mut toolkit);
        watch.update(2999, &mut toolkit);
        assert_eq!(watch.page(), WatchPage::Clock);
        assert!(toolkit.dirty_areas().is_empty());

        watch.update(3000, &mut toolkit);
        assert_eq!(watch.page(), WatchPage::Agenda);
        assert_eq!(toolkit.dirty_areas(), &[Area::new(40, 0, 279, 239)]);
    }

    #[test]
    fn test_back_button_returns_to_clock() {
        let mut watch = WatchFace::new(Size::new(240, 240));
        assert_eq!(watch.on_pointer(PointerEvent::Pressed(Point::new(120, 170)), 0), None);

        watch.page = WatchPage::Event;
        assert_eq!(watch.on_pointer(PointerEvent::Pressed(Point::new(5, 5)), 0), None);
        assert_eq!(watch.page(), WatchPage::Event);

        let redraw = watch.on_pointer(PointerEvent::Pressed(Point::new(120, 170)), 500);
        assert_eq!(redraw, Some(Rectangle::new(Point::zero(), Size::new(240, 240))));
        assert_eq!(watch.page(), WatchPage::Clock);
        assert_eq!(watch.shown_at, Some(500));
    }

    #[test]
    fn test_back_button_follows_centering() {
        let mut watch = WatchFace::new(Size::new(320, 240));
        watch.page = WatchPage::Event;
        // face starts at x = 40
        assert!(watch.on_pointer(PointerEvent::Pressed(Point::new(45, 170)), 0).is_none());
        assert!(watch.on_pointer(PointerEvent::Pressed(Point::new(100, 170)), 0).is_some());
    }

    #[test]
    fn test_clock_page_renders_disc() {
        static CLOCK: TickClock = TickClock::new();
        let mut toolkit = StripToolkit::new(&CLOCK);
        let mut glue = GlueContext::<_, NoTouch, _>::new(MockPanel::new(240, 240), None, GlueConfig::default());
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();

        block_on(toolkit.task_handler(&mut glue, &mut WatchFace::new(Size::new(240, 240))));

        assert_eq!(glue.panel().pixel(0, 239), to_raw(BLACK));
        // left edge of the disc, clear of the icon
        assert_eq!(glue.panel().pixel(85, 170), to_raw(NEAR_BLACK));
    }
}
