//! Demo screens rendered through the strip toolkit.
//!
//! [`Demos`] owns one instance of each demo and forwards drawing, input and
//! time to the one selected by [`Mode`].

mod selftest;
mod tabs;
mod watch;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub use selftest::{GfxStep, SelfTest, wrap_chars};
pub use tabs::{ANIM_TIME_MS, DATA_PERIOD_MS, Tab, TabsDemo, gauge_value};
pub use watch::{PAGE_HOLD_MS, WatchFace, WatchPage};

use crate::pages::Mode;
use crate::strip::{PointerEvent, Scene, StripToolkit};

/// All demos plus the selection.
pub struct Demos {
    mode: Mode,
    tabs: TabsDemo,
    watch: WatchFace,
    self_test: SelfTest,
}

impl Demos {
    /// Demos laid out for a screen of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            mode: Mode::default(),
            tabs: TabsDemo::new(size),
            watch: WatchFace::new(size),
            self_test: SelfTest::new(size),
        }
    }

    #[inline]
    pub const fn mode(&self) -> Mode { self.mode }

    #[inline]
    pub const fn tabs(&self) -> &TabsDemo { &self.tabs }

    #[inline]
    pub const fn watch(&self) -> &WatchFace { &self.watch }

    #[inline]
    pub const fn self_test(&self) -> &SelfTest { &self.self_test }

    /// Show `mode`, restarting the watch and self-test from their first page.
    pub fn set_mode(
        &mut self,
        mode: Mode,
        toolkit: &mut StripToolkit,
    ) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        match mode {
            Mode::Widgets => {}
            Mode::Watch => self.watch.reset(),
            Mode::SelfTest => self.self_test.reset(),
        }
        toolkit.invalidate_all();
    }

    /// Cycle to the next demo.
    pub fn toggle_mode(
        &mut self,
        toolkit: &mut StripToolkit,
    ) {
        self.set_mode(self.mode.toggle(), toolkit);
    }

    /// Previous tab of the widgets demo. Ignored in other modes.
    pub fn prev(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        if self.mode == Mode::Widgets {
            self.tabs.prev_tab(now_ms, toolkit);
        }
    }

    /// Next tab of the widgets demo. Ignored in other modes.
    pub fn next(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        if self.mode == Mode::Widgets {
            self.tabs.next_tab(now_ms, toolkit);
        }
    }

    /// Advance the active demo to toolkit time `now_ms`.
    pub fn update(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        match self.mode {
            Mode::Widgets => self.tabs.update(now_ms, toolkit),
            Mode::Watch => self.watch.update(now_ms, toolkit),
            Mode::SelfTest => {
                self.self_test.update(now_ms, toolkit);
            }
        }
    }
}

impl Scene for Demos {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
    ) {
        match self.mode {
            Mode::Widgets => self.tabs.draw(target),
            Mode::Watch => self.watch.draw(target),
            Mode::SelfTest => self.self_test.draw(target),
        }
    }

    fn on_pointer(
        &mut self,
        event: PointerEvent,
        now_ms: u32,
    ) -> Option<Rectangle> {
        match self.mode {
            Mode::Widgets => self.tabs.on_pointer(event, now_ms),
            Mode::Watch => self.watch.on_pointer(event, now_ms),
            Mode::SelfTest => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlueConfig;
    use crate::glue::GlueContext;
    use crate::input::NoTouch;
    use crate::testing::{MockPanel, MockTimer};
    use crate::tick::TickClock;

    fn setup(clock: &'static TickClock) -> (StripToolkit, GlueContext<MockPanel, NoTouch, MockTimer>) {
        let mut toolkit = StripToolkit::new(clock);
        let mut glue = GlueContext::new(MockPanel::new(240, 240), None, GlueConfig::default());
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();
        (toolkit, glue)
    }

    #[test]
    fn test_tab_buttons_only_in_widgets_mode() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, _glue) = setup(&CLOCK);
        let mut demos = Demos::new(Size::new(240, 240));

        demos.next(0, &mut toolkit);
        assert_eq!(demos.tabs().active(), Tab::Chart);

        demos.toggle_mode(&mut toolkit);
        assert_eq!(demos.mode(), Mode::Watch);
        demos.next(0, &mut toolkit);
        assert_eq!(demos.tabs().active(), Tab::Chart);
    }

    #[test]
    fn test_mode_switch_restarts_watch() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, _glue) = setup(&CLOCK);
        let mut demos = Demos::new(Size::new(240, 240));

        demos.set_mode(Mode::Watch, &mut toolkit);
        demos.update(0, &mut toolkit);
        demos.update(2000, &mut toolkit);
        assert_eq!(demos.watch().page(), WatchPage::Agenda);

        demos.set_mode(Mode::SelfTest, &mut toolkit);
        demos.set_mode(Mode::Watch, &mut toolkit);
        assert_eq!(demos.watch().page(), WatchPage::Clock);
    }

    #[test]
    fn test_self_test_ignores_touch() {
        let mut demos = Demos::new(Size::new(240, 240));
        demos.mode = Mode::SelfTest;
        assert_eq!(demos.on_pointer(PointerEvent::Pressed(Point::new(10, 10)), 0), None);
    }
}
