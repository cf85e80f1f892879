//! Recording test doubles for the panel, timers, touch and toolkit.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_graphics::prelude::Point;

use crate::error::GlueError;
use crate::input::PointerInput;
use crate::log::LogSink;
use crate::panel::PanelDriver;
use crate::tick::{CompareTimer, PeriodicTimer, TickClock, TickHandler, TimerSettings};
use crate::toolkit::{DisplayGeometry, InputDriverDescriptor, InputKind, Toolkit};

// =============================================================================
// Panel
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelCall {
    StartWrite,
    EndWrite,
    SetAddrWindow { x: u16, y: u16, w: u16, h: u16 },
    WritePixels { count: usize, big_endian: bool },
    DmaWait,
}

/// Panel that records every call and keeps a copy of the screen contents.
pub struct MockPanel {
    width: u16,
    height: u16,
    window: (u16, u16, u16, u16),
    frame: Vec<u16>,
    pub calls: Vec<PanelCall>,
}

impl MockPanel {
    pub fn new(
        width: u16,
        height: u16,
    ) -> Self {
        Self {
            width,
            height,
            window: (0, 0, width, height),
            frame: vec![0; usize::from(width) * usize::from(height)],
            calls: Vec::new(),
        }
    }

    /// Native Rgb565 value at `(x, y)`, whatever byte order it was sent in.
    pub fn pixel(
        &self,
        x: u16,
        y: u16,
    ) -> u16 {
        self.frame[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    pub fn count(
        &self,
        call: fn(&PanelCall) -> bool,
    ) -> usize {
        self.calls.iter().filter(|c| call(c)).count()
    }
}

impl PanelDriver for MockPanel {
    fn width(&self) -> u16 { self.width }

    fn height(&self) -> u16 { self.height }

    fn start_write(&mut self) { self.calls.push(PanelCall::StartWrite); }

    fn end_write(&mut self) { self.calls.push(PanelCall::EndWrite); }

    async fn set_addr_window(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) {
        self.window = (x, y, w, h);
        self.calls.push(PanelCall::SetAddrWindow { x, y, w, h });
    }

    async fn write_pixels(
        &mut self,
        pixels: &[u16],
        big_endian: bool,
    ) {
        let (wx, wy, ww, _) = self.window;
        for (i, &p) in pixels.iter().enumerate() {
            let x = usize::from(wx) + i % usize::from(ww.max(1));
            let y = usize::from(wy) + i / usize::from(ww.max(1));
            if x < usize::from(self.width) && y < usize::from(self.height) {
                self.frame[y * usize::from(self.width) + x] = if big_endian { p.swap_bytes() } else { p };
            }
        }
        self.calls.push(PanelCall::WritePixels {
            count: pixels.len(),
            big_endian,
        });
    }

    async fn dma_wait(&mut self) { self.calls.push(PanelCall::DmaWait); }
}

// =============================================================================
// Timers
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareCall {
    Configure(TimerSettings),
    Start,
    Stop,
}

#[derive(Default)]
pub struct CompareLog {
    pub calls: Vec<CompareCall>,
}

/// Compare timer peripheral that records register writes.
pub struct MockCompare {
    log: Rc<RefCell<CompareLog>>,
    handler: Option<TickHandler>,
    /// Largest divider the fake hardware accepts.
    pub max_divider: u16,
}

impl MockCompare {
    pub fn new() -> (Self, Rc<RefCell<CompareLog>>) {
        let log = Rc::new(RefCell::new(CompareLog::default()));
        let hw = Self {
            log: Rc::clone(&log),
            handler: None,
            max_divider: 256,
        };
        (hw, log)
    }

    /// Simulate one wrap interrupt.
    pub fn fire(&self) {
        if let Some(handler) = self.handler {
            handler.on_tick();
        }
    }
}

impl CompareTimer for MockCompare {
    fn configure(
        &mut self,
        settings: TimerSettings,
    ) -> Result<(), GlueError> {
        if settings.divider > self.max_divider {
            return Err(GlueError::TimerConfigurationFailed);
        }
        self.log.borrow_mut().calls.push(CompareCall::Configure(settings));
        Ok(())
    }

    fn start(
        &mut self,
        handler: TickHandler,
    ) {
        self.handler = Some(handler);
        self.log.borrow_mut().calls.push(CompareCall::Start);
    }

    fn stop(&mut self) {
        self.handler = None;
        self.log.borrow_mut().calls.push(CompareCall::Stop);
    }
}

#[derive(Default)]
pub struct TimerLog {
    pub arms: u32,
    pub disarms: u32,
    pub armed_interval: Option<u32>,
    pub handler: Option<TickHandler>,
}

impl TimerLog {
    /// Simulate one tick of the armed timer.
    pub fn fire(&self) {
        if let Some(handler) = self.handler {
            handler.on_tick();
        }
    }
}

/// Periodic timer that always arms and records what happened.
pub struct MockTimer {
    log: Rc<RefCell<TimerLog>>,
}

impl MockTimer {
    pub fn new() -> (Self, Rc<RefCell<TimerLog>>) {
        let log = Rc::new(RefCell::new(TimerLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl PeriodicTimer for MockTimer {
    fn arm(
        &mut self,
        interval_ms: u32,
        handler: TickHandler,
    ) -> Result<(), GlueError> {
        let mut log = self.log.borrow_mut();
        log.arms += 1;
        log.armed_interval = Some(interval_ms);
        log.handler = Some(handler);
        Ok(())
    }

    fn disarm(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.armed_interval.take().is_some() {
            log.disarms += 1;
            log.handler = None;
        }
    }
}

// =============================================================================
// Touch
// =============================================================================

/// Pointer stuck at one position (or released).
pub struct FixedTouch(pub Option<Point>);

impl PointerInput for FixedTouch {
    fn poll(&mut self) -> Option<Point> { self.0 }
}

// =============================================================================
// Toolkit
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolkitCall {
    Init,
    SetLogSink,
    RegisterDisplay(DisplayGeometry),
    RegisterInput(InputKind),
    UnregisterDrivers,
}

/// Toolkit that only records the registration calls.
pub struct RecordingToolkit {
    clock: &'static TickClock,
    pub calls: Vec<ToolkitCall>,
}

impl RecordingToolkit {
    pub fn new(clock: &'static TickClock) -> Self {
        Self {
            clock,
            calls: Vec::new(),
        }
    }
}

impl Toolkit for RecordingToolkit {
    fn init(&mut self) { self.calls.push(ToolkitCall::Init); }

    fn set_log_sink(
        &mut self,
        _sink: LogSink,
    ) {
        self.calls.push(ToolkitCall::SetLogSink);
    }

    fn register_display(
        &mut self,
        geometry: DisplayGeometry,
    ) {
        self.calls.push(ToolkitCall::RegisterDisplay(geometry));
    }

    fn register_input(
        &mut self,
        input: &InputDriverDescriptor,
    ) {
        self.calls.push(ToolkitCall::RegisterInput(input.kind));
    }

    fn unregister_drivers(&mut self) { self.calls.push(ToolkitCall::UnregisterDrivers); }

    fn clock(&self) -> &'static TickClock { self.clock }
}
