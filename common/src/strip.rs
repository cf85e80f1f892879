//! Dirty-rectangle strip renderer implementing the toolkit seam.
//!
//! [`StripToolkit`] is a deliberately small retained-mode toolkit: a [`Scene`]
//! draws itself with `embedded-graphics`, and the toolkit re-renders only the
//! invalidated rectangles, one buffer region ("strip") at a time.
//!
//! # Refresh Pipeline
//!
//! ```text
//! task_handler (every call)
//!   ├─ period not elapsed (30 ms of tick clock) → return
//!   ├─ read pointer → Scene::on_pointer → invalidate
//!   └─ for each dirty area
//!        for each strip of `region_len / width` rows
//!          ├─ Scene::draw into StripTarget (clipped to the strip)
//!          ├─ FlushReady::begin
//!          ├─ DisplayPort::flush(region, strip)
//!          └─ check acknowledgement, switch region when double buffered
//! ```
//!
//! # Dirty Areas
//!
//! Up to [`MAX_DIRTY_AREAS`] rectangles are kept. Areas inside an existing one
//! are dropped; on overflow everything collapses into one bounding box.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::to_raw;
use crate::config::{MAX_DIRTY_AREAS, REFRESH_PERIOD_MS};
use crate::log::{LogLevel, LogSink, emit};
use crate::tick::TickClock;
use crate::toolkit::{
    Area, DisplayGeometry, DisplayPort, FlushReady, InputDriverDescriptor, PointerState, Toolkit,
};

// =============================================================================
// Scene
// =============================================================================

/// Pointer transition delivered to a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Pressed(Point),
    Released(Point),
}

/// Content rendered by the [`StripToolkit`].
pub trait Scene {
    /// Draw the whole screen. The target clips to the strip being rendered.
    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
    );

    /// React to a press or release. Returns the area to redraw, if any.
    fn on_pointer(
        &mut self,
        _event: PointerEvent,
        _now_ms: u32,
    ) -> Option<Rectangle> {
        None
    }
}

/// Counters kept by the toolkit. All of them wrap on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStats {
    /// Refreshes that flushed at least one area.
    pub frames: u32,
    /// Strips handed to the flush callback.
    pub flushes: u32,
    /// Pixels flushed.
    pub pixels: u32,
    /// Flushes that returned without signalling completion.
    pub missed_acks: u32,
}

// =============================================================================
// Strip Toolkit
// =============================================================================

/// Minimal toolkit rendering a [`Scene`] through a [`DisplayPort`].
pub struct StripToolkit {
    clock: &'static TickClock,
    initialized: bool,
    display: Option<DisplayGeometry>,
    pointer_enabled: bool,
    log_sink: Option<LogSink>,
    dirty: heapless::Vec<Area, MAX_DIRTY_AREAS>,
    next_region: usize,
    last_refresh: Option<u32>,
    pointer: PointerState,
    stats: RenderStats,
}

impl StripToolkit {
    /// Toolkit timed by `clock`.
    pub const fn new(clock: &'static TickClock) -> Self {
        Self {
            clock,
            initialized: false,
            display: None,
            pointer_enabled: false,
            log_sink: None,
            dirty: heapless::Vec::new(),
            next_region: 0,
            last_refresh: None,
            pointer: PointerState {
                pressed: false,
                point: Point::zero(),
            },
            stats: RenderStats {
                frames: 0,
                flushes: 0,
                pixels: 0,
                missed_acks: 0,
            },
        }
    }

    /// Toolkit time in milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u32 { self.clock.now_ms() }

    #[inline]
    pub const fn stats(&self) -> RenderStats { self.stats }

    #[inline]
    pub const fn display(&self) -> Option<DisplayGeometry> { self.display }

    #[inline]
    pub const fn pointer_enabled(&self) -> bool { self.pointer_enabled }

    /// Areas waiting for the next refresh.
    pub fn dirty_areas(&self) -> &[Area] { &self.dirty }

    /// Screen size of the registered display.
    pub fn screen_size(&self) -> Option<Size> {
        self.display
            .map(|g| Size::new(u32::from(g.hor_res), u32::from(g.ver_res)))
    }

    /// Mark `rect` for redraw. Ignored before a display is registered.
    pub fn invalidate(
        &mut self,
        rect: &Rectangle,
    ) {
        let Some(geometry) = self.display else {
            return;
        };
        let screen = Area::full(geometry.hor_res, geometry.ver_res);
        let Some(area) = Area::from_rectangle(rect).and_then(|a| a.intersection(&screen)) else {
            return;
        };

        if self.dirty.iter().any(|d| d.contains(&area)) {
            return;
        }
        self.dirty.retain(|d| !area.contains(d));
        if let Err(area) = self.dirty.push(area) {
            let merged = self.dirty.iter().fold(area, |acc, d| acc.union(d));
            self.dirty.clear();
            self.dirty.push(merged).ok();
        }
    }

    /// Mark the whole screen for redraw.
    pub fn invalidate_all(&mut self) {
        if let Some(g) = self.display {
            self.invalidate(&Area::full(g.hor_res, g.ver_res).to_rectangle());
        }
    }

    /// Run pending toolkit work: input, then redraw of dirty areas.
    ///
    /// Does nothing until [`REFRESH_PERIOD_MS`] of tick time has passed since
    /// the previous refresh. Returns `true` if anything was flushed.
    pub async fn task_handler<P: DisplayPort, S: Scene>(
        &mut self,
        port: &mut P,
        scene: &mut S,
    ) -> bool {
        if !self.initialized {
            return false;
        }
        let now = self.now_ms();
        if let Some(last) = self.last_refresh
            && now.wrapping_sub(last) < REFRESH_PERIOD_MS
        {
            return false;
        }
        self.last_refresh = Some(now);

        if self.pointer_enabled {
            self.read_input(port, scene, now);
        }
        self.refresh(port, scene).await
    }

    fn read_input<P: DisplayPort, S: Scene>(
        &mut self,
        port: &mut P,
        scene: &mut S,
        now: u32,
    ) {
        loop {
            let was_pressed = self.pointer.pressed;
            let more = port.read_pointer(&mut self.pointer);
            let event = match (was_pressed, self.pointer.pressed) {
                (false, true) => Some(PointerEvent::Pressed(self.pointer.point)),
                (true, false) => Some(PointerEvent::Released(self.pointer.point)),
                _ => None,
            };
            if let Some(event) = event
                && let Some(rect) = scene.on_pointer(event, now)
            {
                self.invalidate(&rect);
            }
            if !more {
                break;
            }
        }
    }

    async fn refresh<P: DisplayPort, S: Scene>(
        &mut self,
        port: &mut P,
        scene: &mut S,
    ) -> bool {
        let Some(geometry) = self.display else {
            return false;
        };
        if self.dirty.is_empty() {
            return false;
        }

        let areas = core::mem::take(&mut self.dirty);
        for area in &areas {
            self.render_area(port, scene, &geometry, area).await;
        }
        self.stats.frames = self.stats.frames.wrapping_add(1);
        true
    }

    async fn render_area<P: DisplayPort, S: Scene>(
        &mut self,
        port: &mut P,
        scene: &S,
        geometry: &DisplayGeometry,
        area: &Area,
    ) {
        let screen = Size::new(u32::from(geometry.hor_res), u32::from(geometry.ver_res));
        let rows = (geometry.region_len / usize::from(area.width().max(1))).max(1);

        let mut y = area.y1;
        while y <= area.y2 {
            let y2 = (i32::from(y) + rows as i32 - 1).min(i32::from(area.y2)) as i16;
            let strip = Area::new(area.x1, y, area.x2, y2);
            let region = self.next_region;

            let mut target = StripTarget::new(port.region_mut(region), strip, screen, geometry.swap_bytes);
            scene.draw(&mut target);

            if let Some(ready) = port.flush_ready() {
                ready.begin();
            }
            port.flush(region, strip).await;
            if port.flush_ready().is_some_and(FlushReady::is_pending) {
                self.stats.missed_acks = self.stats.missed_acks.wrapping_add(1);
                emit(self.log_sink, LogLevel::Warn, format_args!("strip: flush of row {y} not acknowledged"));
            }

            self.stats.flushes = self.stats.flushes.wrapping_add(1);
            self.stats.pixels = self.stats.pixels.wrapping_add(strip.pixel_count() as u32);
            self.next_region = (region + 1) % geometry.region_count.max(1);
            y = y2 + 1;
        }
    }
}

impl Toolkit for StripToolkit {
    fn init(&mut self) {
        self.initialized = true;
        self.dirty.clear();
        self.last_refresh = None;
        self.stats = RenderStats::default();
    }

    fn set_log_sink(
        &mut self,
        sink: LogSink,
    ) {
        self.log_sink = Some(sink);
    }

    fn register_display(
        &mut self,
        geometry: DisplayGeometry,
    ) {
        self.display = Some(geometry);
        self.next_region = 0;
        self.invalidate_all();
        emit(
            self.log_sink,
            LogLevel::Debug,
            format_args!("strip: display {}x{}", geometry.hor_res, geometry.ver_res),
        );
    }

    fn register_input(
        &mut self,
        _input: &InputDriverDescriptor,
    ) {
        self.pointer_enabled = true;
        self.pointer = PointerState::default();
    }

    fn unregister_drivers(&mut self) {
        self.display = None;
        self.pointer_enabled = false;
        self.dirty.clear();
    }

    fn clock(&self) -> &'static TickClock { self.clock }
}

// =============================================================================
// Strip Draw Target
// =============================================================================

/// Draw target covering the whole screen but backed by one strip of pixels.
///
/// Drawing outside the strip is discarded. Pixels are stored row-major with
/// the strip's width, byte-swapped when the display wants big-endian data.
pub struct StripTarget<'a> {
    buf: &'a mut [u16],
    strip: Area,
    screen: Size,
    swap_bytes: bool,
}

impl<'a> StripTarget<'a> {
    pub fn new(
        buf: &'a mut [u16],
        strip: Area,
        screen: Size,
        swap_bytes: bool,
    ) -> Self {
        Self {
            buf,
            strip,
            screen,
            swap_bytes,
        }
    }

    #[inline]
    fn encode(
        &self,
        color: Rgb565,
    ) -> u16 {
        let raw = to_raw(color);
        if self.swap_bytes { raw.swap_bytes() } else { raw }
    }

    #[inline]
    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        let s = &self.strip;
        if x < i32::from(s.x1) || x > i32::from(s.x2) || y < i32::from(s.y1) || y > i32::from(s.y2) {
            return None;
        }
        Some((y - i32::from(s.y1)) as usize * usize::from(s.width()) + (x - i32::from(s.x1)) as usize)
    }
}

impl OriginDimensions for StripTarget<'_> {
    fn size(&self) -> Size { self.screen }
}

impl DrawTarget for StripTarget<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point.x, point.y) {
                let raw = self.encode(color);
                if let Some(slot) = self.buf.get_mut(idx) {
                    *slot = raw;
                }
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable = area.intersection(&self.strip.to_rectangle());
        let Some(bottom_right) = drawable.bottom_right() else {
            return Ok(());
        };

        let raw = self.encode(color);
        for y in drawable.top_left.y..=bottom_right.y {
            let (Some(start), Some(end)) = (self.index(drawable.top_left.x, y), self.index(bottom_right.x, y)) else {
                continue;
            };
            if let Some(row) = self.buf.get_mut(start..=end) {
                row.fill(raw);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::colors::{BLUE, RED};
    use crate::config::GlueConfig;
    use crate::glue::GlueContext;
    use crate::input::{NoTouch, PointerInput};
    use crate::testing::{MockPanel, MockTimer, PanelCall};

    struct Fill(Rgb565);

    impl Scene for Fill {
        fn draw<D: DrawTarget<Color = Rgb565>>(
            &self,
            target: &mut D,
        ) {
            target.clear(self.0).ok();
        }
    }

    /// Every row gets its own color so strips can be told apart.
    struct Rows;

    fn row_color(y: i32) -> Rgb565 { Rgb565::new((y % 32) as u8, ((y / 4) % 64) as u8, 0) }

    impl Scene for Rows {
        fn draw<D: DrawTarget<Color = Rgb565>>(
            &self,
            target: &mut D,
        ) {
            let width = target.bounding_box().size.width;
            for y in 0..target.bounding_box().size.height as i32 {
                target.fill_solid(&Rectangle::new(Point::new(0, y), Size::new(width, 1)), row_color(y)).ok();
            }
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<PointerEvent>);

    impl Scene for Recorder {
        fn draw<D: DrawTarget<Color = Rgb565>>(
            &self,
            _target: &mut D,
        ) {
        }

        fn on_pointer(
            &mut self,
            event: PointerEvent,
            _now_ms: u32,
        ) -> Option<Rectangle> {
            self.0.push(event);
            Some(Rectangle::new(Point::new(0, 0), Size::new(10, 10)))
        }
    }

    fn config(double_buffered: bool) -> GlueConfig {
        GlueConfig {
            rows_per_buffer: 8,
            double_buffered,
            tick_interval_ms: 10,
            swap_bytes: false,
            resolution_override: None,
            log_sink: None,
        }
    }

    fn setup(
        clock: &'static TickClock,
        config: GlueConfig,
    ) -> (StripToolkit, GlueContext<MockPanel, NoTouch, MockTimer>) {
        let mut toolkit = StripToolkit::new(clock);
        let mut glue = GlueContext::new(MockPanel::new(240, 240), None, config);
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();
        (toolkit, glue)
    }

    #[test]
    fn test_first_refresh_paints_screen_in_strips() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));

        assert!(block_on(toolkit.task_handler(&mut glue, &mut Fill(RED))));

        let stats = toolkit.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.flushes, 30);
        assert_eq!(stats.pixels, 240 * 240);
        assert_eq!(stats.missed_acks, 0);
        assert_eq!(glue.flush_ready().map(FlushReady::acks), Some(30));
        assert_eq!(glue.panel().pixel(0, 0), 0xF800);
        assert_eq!(glue.panel().pixel(239, 239), 0xF800);
        assert!(glue.panel().calls.contains(&PanelCall::SetAddrWindow { x: 0, y: 232, w: 240, h: 8 }));
    }

    #[test]
    fn test_counters_wrap_instead_of_overflowing() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));
        toolkit.stats.pixels = u32::MAX - 1000;
        toolkit.stats.flushes = u32::MAX;
        toolkit.stats.frames = u32::MAX;

        assert!(block_on(toolkit.task_handler(&mut glue, &mut Fill(RED))));

        let stats = toolkit.stats();
        assert_eq!(stats.pixels, (u32::MAX - 1000).wrapping_add(240 * 240));
        assert_eq!(stats.flushes, 29);
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn test_refresh_waits_for_period() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));
        block_on(toolkit.task_handler(&mut glue, &mut Fill(RED)));

        toolkit.invalidate_all();
        CLOCK.inc(20);
        assert!(!block_on(toolkit.task_handler(&mut glue, &mut Fill(BLUE))));
        CLOCK.inc(10);
        assert!(block_on(toolkit.task_handler(&mut glue, &mut Fill(BLUE))));
        assert_eq!(glue.panel().pixel(120, 120), 0x001F);
    }

    #[test]
    fn test_nothing_dirty_nothing_flushed() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));
        block_on(toolkit.task_handler(&mut glue, &mut Fill(RED)));
        let flushes = toolkit.stats().flushes;

        CLOCK.inc(100);
        assert!(!block_on(toolkit.task_handler(&mut glue, &mut Fill(RED))));
        assert_eq!(toolkit.stats().flushes, flushes);
    }

    #[test]
    fn test_partial_area_flush() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));
        block_on(toolkit.task_handler(&mut glue, &mut Fill(RED)));
        glue.panel_mut().calls.clear();

        toolkit.invalidate(&Rectangle::new(Point::new(5, 5), Size::new(10, 10)));
        CLOCK.inc(30);
        block_on(toolkit.task_handler(&mut glue, &mut Fill(BLUE)));

        // 10 px wide: the 1920 px region holds all 10 rows at once
        assert!(glue.panel().calls.contains(&PanelCall::SetAddrWindow { x: 5, y: 5, w: 10, h: 10 }));
        assert_eq!(glue.panel().count(|c| matches!(c, PanelCall::WritePixels { .. })), 1);
        assert_eq!(glue.panel().pixel(14, 14), 0x001F);
        assert_eq!(glue.panel().pixel(15, 15), 0xF800);
    }

    #[test]
    fn test_double_buffer_alternates_regions() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(true));

        block_on(toolkit.task_handler(&mut glue, &mut Rows));

        // 30 strips: strip 28 (rows 224..) last used region 0, strip 29 (rows 232..) region 1
        let buffer = glue.buffer().unwrap();
        assert_eq!(buffer.region(0).unwrap()[0], to_raw(row_color(224)));
        assert_eq!(buffer.region(1).unwrap()[0], to_raw(row_color(232)));
        assert_eq!(glue.panel().pixel(3, 100), to_raw(row_color(100)));
    }

    #[test]
    fn test_swapped_bytes_reach_panel_intact() {
        static CLOCK: TickClock = TickClock::new();
        let config = GlueConfig {
            swap_bytes: true,
            ..config(false)
        };
        let (mut toolkit, mut glue) = setup(&CLOCK, config);

        block_on(toolkit.task_handler(&mut glue, &mut Fill(RED)));

        assert_eq!(glue.buffer().unwrap().region(0).unwrap()[0], 0x00F8);
        assert!(glue.panel().calls.contains(&PanelCall::WritePixels { count: 1920, big_endian: true }));
        assert_eq!(glue.panel().pixel(7, 7), 0xF800);
    }

    #[test]
    fn test_invalidate_clips_and_merges() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));
        block_on(toolkit.task_handler(&mut glue, &mut Fill(RED)));

        toolkit.invalidate(&Rectangle::new(Point::new(300, 300), Size::new(5, 5)));
        assert!(toolkit.dirty_areas().is_empty());

        toolkit.invalidate(&Rectangle::new(Point::new(230, 0), Size::new(20, 4)));
        assert_eq!(toolkit.dirty_areas(), &[Area::new(230, 0, 239, 3)]);

        toolkit.invalidate(&Rectangle::new(Point::new(232, 1), Size::new(2, 2)));
        assert_eq!(toolkit.dirty_areas().len(), 1);

        for i in 0..MAX_DIRTY_AREAS as i32 {
            toolkit.invalidate(&Rectangle::new(Point::new(i * 12, 100), Size::new(4, 4)));
        }
        assert_eq!(toolkit.dirty_areas().len(), 1);
        assert_eq!(toolkit.dirty_areas()[0], Area::new(0, 0, 239, 103));
    }

    /// Touch replaying a fixed script, released once it runs out.
    struct ScriptedTouch(std::collections::VecDeque<Option<Point>>);

    impl PointerInput for ScriptedTouch {
        fn poll(&mut self) -> Option<Point> { self.0.pop_front().flatten() }
    }

    #[test]
    fn test_pointer_transitions_reach_scene() {
        static CLOCK: TickClock = TickClock::new();
        let at = Some(Point::new(40, 50));
        let touch = ScriptedTouch([None, at, at, None].into());
        let mut toolkit = StripToolkit::new(&CLOCK);
        let mut glue = GlueContext::new(MockPanel::new(240, 240), Some(touch), config(false));
        glue.begin(&mut toolkit, MockTimer::new().0, false).unwrap();
        assert!(toolkit.pointer_enabled());

        let mut scene = Recorder::default();
        block_on(toolkit.task_handler(&mut glue, &mut scene));
        glue.panel_mut().calls.clear();
        for _ in 0..3 {
            CLOCK.inc(30);
            block_on(toolkit.task_handler(&mut glue, &mut scene));
        }

        let point = Point::new(40, 50);
        assert_eq!(scene.0, vec![PointerEvent::Pressed(point), PointerEvent::Released(point)]);
        // each transition redraws the 10x10 area the scene asked for
        let windows = glue.panel().count(|c| *c == PanelCall::SetAddrWindow { x: 0, y: 0, w: 10, h: 10 });
        assert_eq!(windows, 2);
    }

    #[test]
    fn test_not_initialized_does_nothing() {
        static CLOCK: TickClock = TickClock::new();
        let mut toolkit = StripToolkit::new(&CLOCK);
        let mut glue = GlueContext::<_, NoTouch, MockTimer>::new(MockPanel::new(240, 240), None, config(false));

        assert!(!block_on(toolkit.task_handler(&mut glue, &mut Fill(RED))));
        assert!(glue.panel().calls.is_empty());
    }

    #[test]
    fn test_unregister_clears_display() {
        static CLOCK: TickClock = TickClock::new();
        let (mut toolkit, mut glue) = setup(&CLOCK, config(false));

        glue.end(&mut toolkit);

        assert!(toolkit.display().is_none());
        assert!(toolkit.dirty_areas().is_empty());
        assert!(!block_on(toolkit.task_handler(&mut glue, &mut Fill(RED))));
    }
}
