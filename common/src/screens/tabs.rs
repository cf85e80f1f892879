//! Widgets demo: a tab view with a gauge, a column chart and a canvas.
//!
//! # Layout
//!
//! ```text
//! ┌──────────┬──────────┬──────────┐
//! │  Gauge   │  Chart   │  Canvas  │  tab bar (green gradient)
//! │▀▀▀▀▀▀▀▀▀▀│          │          │  red indicator under the active tab
//! ├──────────┴──────────┴──────────┤
//! │                                │
//! │      active page (white)       │  pages slide horizontally over 1 s
//! │                                │
//! └────────────────────────────────┘
//! ```
//!
//! # Animation
//!
//! | Element | Update |
//! |---------|--------|
//! | Gauge | `50.5 + sin(t / 1000) * 50`, redrawn when the integer value changes |
//! | Chart | random 0..100 value every 500 ms, shifted in from the right |
//! | Canvas | random colored line every 500 ms |
//! | Tab switch | content scrolls to the new page over [`ANIM_TIME_MS`] |

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
#[cfg(not(test))]
use micromath::F32Ext;
use rand_core::{RngCore, impls};

use crate::colors::{RED, TAB_BG_BOTTOM, TAB_BG_TOP};
use crate::strip::{PointerEvent, Scene, StripToolkit};
use crate::styles::{CENTERED, GRAY_OUTLINE, RED_FILL, TAB_TEXT_ACTIVE, TAB_TEXT_INACTIVE, WHITE_FILL};
use crate::widgets::{draw_column_chart, draw_gauge};

/// Height of the tab bar including the indicator.
pub const TAB_BAR_HEIGHT: u32 = 32;
/// Height of the red active-tab indicator.
const INDICATOR_HEIGHT: u32 = 5;
/// Duration of the page slide.
pub const ANIM_TIME_MS: u32 = 1000;
/// Period of chart and canvas updates.
pub const DATA_PERIOD_MS: u32 = 500;

/// Points shown by the chart.
pub const CHART_POINTS: usize = 10;
const CHART_SIZE: Size = Size::new(200, 180);

/// Canvas size in pixels.
pub const CANVAS_SIZE: Size = Size::new(200, 150);
/// Lines kept on the canvas; the oldest disappears first.
pub const MAX_CANVAS_LINES: usize = 48;

/// Largest gauge diameter.
const GAUGE_DIAMETER: u32 = 186;

// =============================================================================
// Tabs
// =============================================================================

/// Tabs of the widgets demo.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tab {
    #[default]
    Gauge,
    Chart,
    Canvas,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Gauge, Self::Chart, Self::Canvas];

    pub const fn index(self) -> usize {
        match self {
            Self::Gauge => 0,
            Self::Chart => 1,
            Self::Canvas => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gauge => "Gauge",
            Self::Chart => "Chart",
            Self::Canvas => "Canvas",
        }
    }

    /// Tab to the left; stays on the first tab.
    pub const fn prev(self) -> Self {
        match self {
            Self::Gauge | Self::Chart => Self::Gauge,
            Self::Canvas => Self::Chart,
        }
    }

    /// Tab to the right; stays on the last tab.
    pub const fn next(self) -> Self {
        match self {
            Self::Gauge => Self::Chart,
            Self::Chart | Self::Canvas => Self::Canvas,
        }
    }
}

/// Gauge reading at toolkit time `now_ms`: a sine sweep with a 2π s period.
pub fn gauge_value(now_ms: u32) -> i32 { (50.5 + (now_ms as f32 / 1000.0).sin() * 50.0) as i32 }

// =============================================================================
// Random Source
// =============================================================================

/// xorshift32: tiny, deterministic, good enough for demo data.
#[derive(Clone, Copy, Debug)]
pub struct Rng(u32);

impl Rng {
    pub const fn new(seed: u32) -> Self { Self(if seed == 0 { 0x2545_F491 } else { seed }) }

    /// Value in `0..bound`.
    pub fn below(
        &mut self,
        bound: u32,
    ) -> u32 {
        self.next_u32() % bound.max(1)
    }
}

impl RngCore for Rng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    fn next_u64(&mut self) -> u64 { impls::next_u64_via_u32(self) }

    fn fill_bytes(
        &mut self,
        dest: &mut [u8],
    ) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(
        &mut self,
        dest: &mut [u8],
    ) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// =============================================================================
// Demo State
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CanvasLine {
    start: Point,
    end: Point,
    color: Rgb565,
}

/// State of the widgets demo.
pub struct TabsDemo {
    size: Size,
    active: Tab,
    /// Horizontal scroll of the page strip in pixels (`tab index * width` at rest).
    scroll_x: i32,
    anim: Option<(u32, i32)>,
    gauge: i32,
    chart: heapless::Deque<u8, CHART_POINTS>,
    lines: heapless::Deque<CanvasLine, MAX_CANVAS_LINES>,
    last_period: Option<u32>,
    rng: Rng,
}

impl TabsDemo {
    /// Demo for a screen of `size`.
    pub fn new(size: Size) -> Self {
        let mut chart = heapless::Deque::new();
        while chart.push_back(0).is_ok() {}
        Self {
            size,
            active: Tab::Gauge,
            scroll_x: 0,
            anim: None,
            gauge: gauge_value(0),
            chart,
            lines: heapless::Deque::new(),
            last_period: None,
            rng: Rng::new(1),
        }
    }

    #[inline]
    pub const fn active(&self) -> Tab { self.active }

    #[inline]
    pub const fn gauge(&self) -> i32 { self.gauge }

    #[inline]
    pub const fn is_animating(&self) -> bool { self.anim.is_some() }

    /// Chart values, oldest first.
    pub fn chart(&self) -> impl ExactSizeIterator<Item = u8> + '_ { self.chart.iter().copied() }

    pub fn canvas_lines(&self) -> usize { self.lines.len() }

    fn width(&self) -> i32 { self.size.width as i32 }

    fn tab_bar(&self) -> Rectangle { Rectangle::new(Point::zero(), Size::new(self.size.width, TAB_BAR_HEIGHT)) }

    fn content(&self) -> Rectangle {
        Rectangle::new(
            Point::new(0, TAB_BAR_HEIGHT as i32),
            Size::new(self.size.width, self.size.height.saturating_sub(TAB_BAR_HEIGHT)),
        )
    }

    /// Screen x of the page for `tab` at the current scroll position.
    fn page_x(
        &self,
        tab: Tab,
    ) -> i32 {
        tab.index() as i32 * self.width() - self.scroll_x
    }

    fn is_visible(
        &self,
        tab: Tab,
    ) -> bool {
        self.page_x(tab).abs() < self.width()
    }

    /// `rect` of a page (page coordinates) on screen.
    fn on_screen(
        &self,
        tab: Tab,
        rect: Rectangle,
    ) -> Rectangle {
        rect.translate(Point::new(self.page_x(tab), TAB_BAR_HEIGHT as i32))
    }

    fn gauge_diameter(&self) -> u32 {
        GAUGE_DIAMETER
            .min(self.content().size.height.saturating_sub(10))
            .min(self.size.width.saturating_sub(10))
    }

    fn centered(
        &self,
        size: Size,
    ) -> Rectangle {
        let content = self.content().size;
        let size = Size::new(size.width.min(content.width), size.height.min(content.height));
        Rectangle::with_center(Point::new(content.width as i32 / 2, content.height as i32 / 2), size)
    }

    fn gauge_rect(&self) -> Rectangle { self.centered(Size::new_equal(self.gauge_diameter())) }

    fn chart_rect(&self) -> Rectangle { self.centered(CHART_SIZE) }

    fn canvas_rect(&self) -> Rectangle { self.centered(CANVAS_SIZE) }

    /// Switch to `tab`, sliding from the current position. Returns `true` if it changed.
    pub fn select_tab(
        &mut self,
        tab: Tab,
        now_ms: u32,
    ) -> bool {
        if tab == self.active {
            return false;
        }
        self.active = tab;
        self.anim = Some((now_ms, self.scroll_x));
        true
    }

    pub fn prev_tab(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        if self.select_tab(self.active.prev(), now_ms) {
            toolkit.invalidate(&self.tab_bar());
        }
    }

    pub fn next_tab(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        if self.select_tab(self.active.next(), now_ms) {
            toolkit.invalidate(&self.tab_bar());
        }
    }

    /// Advance animations and data to `now_ms`, invalidating what changed.
    pub fn update(
        &mut self,
        now_ms: u32,
        toolkit: &mut StripToolkit,
    ) {
        if let Some((start, from)) = self.anim {
            let target = self.active.index() as i32 * self.width();
            let elapsed = now_ms.wrapping_sub(start).min(ANIM_TIME_MS) as i32;
            self.scroll_x = from + (target - from) * elapsed / ANIM_TIME_MS as i32;
            if elapsed >= ANIM_TIME_MS as i32 {
                self.anim = None;
            }
            toolkit.invalidate(&self.tab_bar());
            toolkit.invalidate(&self.content());
        }

        let value = gauge_value(now_ms);
        if value != self.gauge {
            self.gauge = value;
            if self.is_visible(Tab::Gauge) {
                toolkit.invalidate(&self.on_screen(Tab::Gauge, self.gauge_rect()));
            }
        }

        let period = now_ms / DATA_PERIOD_MS;
        if self.last_period != Some(period) {
            self.last_period = Some(period);
            self.push_data();
            if self.is_visible(Tab::Chart) {
                toolkit.invalidate(&self.on_screen(Tab::Chart, self.chart_rect()));
            }
            if self.is_visible(Tab::Canvas) {
                toolkit.invalidate(&self.on_screen(Tab::Canvas, self.canvas_rect()));
            }
        }
    }

    fn push_data(&mut self) {
        if self.chart.is_full() {
            self.chart.pop_front();
        }
        self.chart.push_back(self.rng.below(100) as u8).ok();

        let w = CANVAS_SIZE.width;
        let h = CANVAS_SIZE.height;
        let line = CanvasLine {
            start: Point::new(self.rng.below(w) as i32, self.rng.below(h) as i32),
            end: Point::new(self.rng.below(w) as i32, self.rng.below(h) as i32),
            color: Rgb565::new(self.rng.below(32) as u8, self.rng.below(64) as u8, self.rng.below(32) as u8),
        };
        if self.lines.is_full() {
            self.lines.pop_front();
        }
        self.lines.push_back(line).ok();
    }

    fn draw_tab_bar<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        // Vertical gradient in 4 px bands
        let bands = TAB_BAR_HEIGHT / 4;
        for band in 0..bands {
            Rectangle::new(Point::new(0, (band * 4) as i32), Size::new(self.size.width, 4))
                .into_styled(PrimitiveStyle::with_fill(blend(TAB_BG_TOP, TAB_BG_BOTTOM, band, bands - 1)))
                .draw(display)
                .ok();
        }

        let tab_width = self.size.width / Tab::ALL.len() as u32;
        let label_y = (TAB_BAR_HEIGHT - INDICATOR_HEIGHT) as i32 / 2;
        for tab in Tab::ALL {
            let x = (tab.index() as u32 * tab_width) as i32;
            let style = if tab == self.active {
                Rectangle::new(Point::new(x, 2), Size::new(tab_width, TAB_BAR_HEIGHT - INDICATOR_HEIGHT - 2))
                    .into_styled(WHITE_FILL)
                    .draw(display)
                    .ok();
                TAB_TEXT_ACTIVE
            } else {
                TAB_TEXT_INACTIVE
            };
            Text::with_text_style(tab.label(), Point::new(x + tab_width as i32 / 2, label_y), style, CENTERED)
                .draw(display)
                .ok();
        }

        Rectangle::new(
            Point::new(self.scroll_x / Tab::ALL.len() as i32, (TAB_BAR_HEIGHT - INDICATOR_HEIGHT) as i32),
            Size::new(tab_width, INDICATOR_HEIGHT),
        )
        .into_styled(RED_FILL)
        .draw(display)
        .ok();
    }

    fn draw_page<D>(
        &self,
        tab: Tab,
        page: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        match tab {
            Tab::Gauge => draw_gauge(page, self.gauge_rect().center(), self.gauge_diameter(), self.gauge),
            Tab::Chart => draw_column_chart(page, self.chart_rect(), self.chart(), RED),
            Tab::Canvas => {
                let canvas = self.canvas_rect();
                canvas.into_styled(WHITE_FILL).draw(page).ok();
                canvas.offset(1).into_styled(GRAY_OUTLINE).draw(page).ok();
                let mut clipped = page.clipped(&canvas);
                let mut inner = clipped.translated(canvas.top_left);
                for line in &self.lines {
                    Line::new(line.start, line.end)
                        .into_styled(PrimitiveStyle::with_stroke(line.color, 1))
                        .draw(&mut inner)
                        .ok();
                }
            }
        }
    }
}

impl Scene for TabsDemo {
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
    ) {
        self.draw_tab_bar(target);

        let content = self.content();
        content.into_styled(WHITE_FILL).draw(target).ok();
        let mut clipped = target.clipped(&content);
        for tab in Tab::ALL {
            if self.is_visible(tab) {
                let mut page = clipped.translated(Point::new(self.page_x(tab), content.top_left.y));
                self.draw_page(tab, &mut page);
            }
        }
    }

    fn on_pointer(
        &mut self,
        event: PointerEvent,
        now_ms: u32,
    ) -> Option<Rectangle> {
        let PointerEvent::Pressed(point) = event else {
            return None;
        };
        if !self.tab_bar().contains(point) {
            return None;
        }
        let idx = (point.x.max(0) as usize * Tab::ALL.len() / self.size.width.max(1) as usize).min(Tab::ALL.len() - 1);
        self.select_tab(Tab::ALL[idx], now_ms).then(|| self.tab_bar())
    }
}

/// Linear blend from `a` to `b`, `step` of `steps`.
fn blend(
    a: Rgb565,
    b: Rgb565,
    step: u32,
    steps: u32,
) -> Rgb565 {
    let mix = |x: u8, y: u8| -> u8 {
        let (x, y) = (i32::from(x), i32::from(y));
        (x + (y - x) * step as i32 / steps.max(1) as i32) as u8
    };
    Rgb565::new(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::config::GlueConfig;
    use crate::glue::GlueContext;
    use crate::input::NoTouch;
    use crate::testing::{MockPanel, MockTimer};
    use crate::tick::TickClock;
    use crate::toolkit::Area;

    fn toolkit(clock: &'static TickClock) -> (StripToolkit, GlueContext<MockPanel, NoTouch, MockTimer>) {
        let mut toolkit = StripToolkit::new(clock);
        let mut glue = GlueContext::new(MockPanel::new(320, 240), None, GlueConfig::default());
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();
        (toolkit, glue)
    }

    #[test]
    fn test_gauge_value_follows_sine() {
        assert_eq!(gauge_value(0), 50);
        // sin(1.5708) ~ 1 -> 100.5
        assert_eq!(gauge_value(1571), 100);
        // sin(4.7124) ~ -1 -> 0.5
        assert_eq!(gauge_value(4712), 0);
    }

    #[test]
    fn test_tab_navigation_saturates() {
        assert_eq!(Tab::Gauge.prev(), Tab::Gauge);
        assert_eq!(Tab::Gauge.next(), Tab::Chart);
        assert_eq!(Tab::Canvas.next(), Tab::Canvas);
        assert_eq!(Tab::Canvas.prev(), Tab::Chart);
    }

    #[test]
    fn test_chart_shifts_every_half_second() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, _glue) = toolkit(&CLOCK);
        let mut demo = TabsDemo::new(Size::new(320, 240));
        assert_eq!(demo.chart().len(), CHART_POINTS);

        demo.update(0, &mut toolkit);
        demo.update(100, &mut toolkit);
        assert_eq!(demo.canvas_lines(), 1);
        demo.update(500, &mut toolkit);
        demo.update(1000, &mut toolkit);
        assert_eq!(demo.canvas_lines(), 3);
        assert_eq!(demo.chart().len(), CHART_POINTS);
        assert!(demo.chart().all(|v| v < 100));
    }

    #[test]
    fn test_canvas_keeps_newest_lines() {
        let mut demo = TabsDemo::new(Size::new(320, 240));
        for _ in 0..MAX_CANVAS_LINES + 5 {
            demo.push_data();
        }
        assert_eq!(demo.canvas_lines(), MAX_CANVAS_LINES);
    }

    #[test]
    fn test_tab_slide_takes_one_second() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, _glue) = toolkit(&CLOCK);
        let mut demo = TabsDemo::new(Size::new(320, 240));

        demo.next_tab(1000, &mut toolkit);
        assert_eq!(demo.active(), Tab::Chart);
        demo.update(1500, &mut toolkit);
        assert_eq!(demo.scroll_x, 160);
        assert!(demo.is_animating());
        demo.update(2000, &mut toolkit);
        assert_eq!(demo.scroll_x, 320);
        assert!(!demo.is_animating());
    }

    #[test]
    fn test_gauge_redraw_only_when_visible() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = toolkit(&CLOCK);
        let mut demo = TabsDemo::new(Size::new(320, 240));
        demo.update(0, &mut toolkit);
        block_on(toolkit.task_handler(&mut glue, &mut demo));

        demo.update(100, &mut toolkit);
        assert_eq!(toolkit.dirty_areas().len(), 1);
        let gauge = toolkit.dirty_areas()[0];
        assert!(Area::full(320, 240).contains(&gauge));
        assert!(gauge.y1 >= TAB_BAR_HEIGHT as i16);

        // Once the canvas is shown the gauge is off screen
        let mut demo = TabsDemo::new(Size::new(320, 240));
        demo.select_tab(Tab::Canvas, 0);
        demo.update(1000, &mut toolkit);
        assert!(!demo.is_visible(Tab::Gauge));
    }

    #[test]
    fn test_touch_on_tab_bar_selects_tab() {
        let mut demo = TabsDemo::new(Size::new(320, 240));
        assert_eq!(demo.on_pointer(PointerEvent::Pressed(Point::new(300, 10)), 0), Some(demo.tab_bar()));
        assert_eq!(demo.active(), Tab::Canvas);
        assert_eq!(demo.on_pointer(PointerEvent::Pressed(Point::new(10, 200)), 0), None);
        assert_eq!(demo.on_pointer(PointerEvent::Released(Point::new(10, 10)), 0), None);
        assert_eq!(demo.active(), Tab::Canvas);
    }

    #[test]
    fn test_renders_tab_bar_and_page() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = toolkit(&CLOCK);
        let mut demo = TabsDemo::new(Size::new(320, 240));

        block_on(toolkit.task_handler(&mut glue, &mut demo));

        // indicator under the first tab, white page background in the corner
        assert_eq!(glue.panel().pixel(10, (TAB_BAR_HEIGHT - 2) as u16), 0xF800);
        assert_eq!(glue.panel().pixel(2, 238), 0xFFFF);
    }

    #[test]
    fn test_rng_is_deterministic_xorshift() {
        let mut rng = Rng::new(1);
        assert_eq!(rng.next_u32(), 270_369);
        assert_eq!(Rng::new(0).next_u32(), Rng::new(0x2545_F491).next_u32());
        assert!((0..1000).all(|_| rng.below(100) < 100));

        let (mut a, mut b) = (Rng::new(7), Rng::new(7));
        let (mut left, mut right) = ([0u8; 13], [0u8; 13]);
        a.fill_bytes(&mut left);
        b.try_fill_bytes(&mut right).unwrap();
        assert_eq!(left, right);
        assert_ne!(left, [0u8; 13]);
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(TAB_BG_TOP, TAB_BG_BOTTOM, 0, 7), TAB_BG_TOP);
        assert_eq!(blend(TAB_BG_TOP, TAB_BG_BOTTOM, 7, 7), TAB_BG_BOTTOM);
    }
}
