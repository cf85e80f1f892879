//! Glue lifecycle controller.
//!
//! [`GlueContext`] owns everything the toolkit needs from the hardware side:
//! the panel driver, an optional touch driver, the render buffer, the driver
//! descriptors and the armed tick source. It is handed to the toolkit as a
//! [`DisplayPort`] on every refresh, so there is no global state.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► begin ──► Ok ──► (toolkit refreshes) ──► end / drop
//!           │
//!           └─► Err(AllocationFailed | TimerConfigurationFailed)
//!               nothing retained, nothing registered, timer not armed
//! ```
//!
//! `begin` steps, in order:
//! 1. toolkit init (and debug sink when requested)
//! 2. resolution: configured override, else the panel's own
//! 3. render buffer allocation
//! 4. display registration, then input registration when a touch driver exists
//! 5. tick source armed with a handler bound to the toolkit clock
//!
//! A failure in step 5 unregisters the drivers and frees the buffer again.

use crate::buffer::FrameBuffer;
use crate::config::GlueConfig;
use crate::error::GlueError;
use crate::flush::FlushBridge;
use crate::input::PointerInput;
use crate::log::{LogLevel, LogSink, emit};
use crate::panel::PanelDriver;
use crate::tick::{PeriodicTimer, TickHandler};
use crate::toolkit::{
    Area, DisplayDriverDescriptor, DisplayGeometry, DisplayPort, FlushReady, InputDriverDescriptor, InputKind,
    PointerState, Toolkit,
};

/// Owns the panel, touch, buffer and tick source for one display.
pub struct GlueContext<P: PanelDriver, I: PointerInput, T: PeriodicTimer> {
    panel: P,
    touch: Option<I>,
    config: GlueConfig,
    display: Option<DisplayDriverDescriptor>,
    input: Option<InputDriverDescriptor>,
    buffer: Option<FrameBuffer>,
    timer: Option<T>,
    bridge: FlushBridge,
    log_sink: Option<LogSink>,
}

impl<P: PanelDriver, I: PointerInput, T: PeriodicTimer> GlueContext<P, I, T> {
    /// Context for `panel`, with a touch driver or `None` for a display-only build.
    pub const fn new(
        panel: P,
        touch: Option<I>,
        config: GlueConfig,
    ) -> Self {
        Self {
            panel,
            touch,
            config,
            display: None,
            input: None,
            buffer: None,
            timer: None,
            bridge: FlushBridge::new(config.swap_bytes),
            log_sink: None,
        }
    }

    /// Register the display (and touch) with `toolkit` and start the tick source.
    ///
    /// Calling it again after a successful call does nothing and returns `Ok`;
    /// the extra `timer` is dropped unarmed.
    pub fn begin<K: Toolkit>(
        &mut self,
        toolkit: &mut K,
        timer: T,
        debug: bool,
    ) -> Result<(), GlueError> {
        if self.is_initialized() {
            return Ok(());
        }

        toolkit.init();
        self.log_sink = if debug { self.config.log_sink } else { None };
        if let Some(sink) = self.log_sink {
            toolkit.set_log_sink(sink);
        }

        let (hor_res, ver_res) = self.resolution();
        let buffer = FrameBuffer::allocate(hor_res, self.config.rows_per_buffer, self.config.double_buffered)
            .inspect_err(|_| {
                let rows = self.config.rows_per_buffer;
                emit(self.log_sink, LogLevel::Error, format_args!("glue: no RAM for {hor_res}x{rows} buffer"));
            })?;

        let geometry = DisplayGeometry {
            hor_res,
            ver_res,
            region_len: buffer.region_len(),
            region_count: buffer.region_count(),
            swap_bytes: self.config.swap_bytes,
        };
        self.buffer = Some(buffer);
        self.display = Some(DisplayDriverDescriptor::new(geometry));
        toolkit.register_display(geometry);

        if self.touch.is_some() {
            let input = InputDriverDescriptor { kind: InputKind::Pointer };
            toolkit.register_input(&input);
            self.input = Some(input);
        }

        let mut timer = timer;
        let interval = self.config.tick_interval_ms;
        if let Err(e) = timer.arm(interval, TickHandler::new(toolkit.clock(), interval)) {
            self.release(toolkit);
            emit(self.log_sink, LogLevel::Error, format_args!("glue: {interval} ms tick unavailable"));
            return Err(e);
        }
        self.timer = Some(timer);

        emit(
            self.log_sink,
            LogLevel::Info,
            format_args!(
                "glue: {hor_res}x{ver_res}, {} x {} px, tick {interval} ms",
                geometry.region_count, geometry.region_len
            ),
        );
        Ok(())
    }

    /// Stop the tick source, unregister the drivers and free the buffer.
    ///
    /// The flush bridge keeps its state, so an open panel transaction is
    /// closed by the first flush after a later `begin`.
    pub fn end<K: Toolkit>(
        &mut self,
        toolkit: &mut K,
    ) {
        if let Some(mut timer) = self.timer.take() {
            timer.disarm();
        }
        if self.is_initialized() {
            self.release(toolkit);
        }
    }

    fn release<K: Toolkit>(
        &mut self,
        toolkit: &mut K,
    ) {
        toolkit.unregister_drivers();
        self.input = None;
        self.display = None;
        self.buffer = None;
    }

    /// Resolution the display is registered with.
    pub fn resolution(&self) -> (u16, u16) {
        self.config
            .resolution_override
            .unwrap_or_else(|| (self.panel.width(), self.panel.height()))
    }

    /// True between a successful `begin` and `end`.
    #[inline]
    pub const fn is_initialized(&self) -> bool { self.buffer.is_some() }

    #[inline]
    pub const fn is_timer_armed(&self) -> bool { self.timer.is_some() }

    /// True once the first flush has opened a panel transaction.
    #[inline]
    pub const fn first_frame_issued(&self) -> bool { self.bridge.first_frame_issued() }

    pub const fn config(&self) -> &GlueConfig { &self.config }

    pub const fn buffer(&self) -> Option<&FrameBuffer> { self.buffer.as_ref() }

    pub const fn display_driver(&self) -> Option<&DisplayDriverDescriptor> { self.display.as_ref() }

    pub const fn input_driver(&self) -> Option<&InputDriverDescriptor> { self.input.as_ref() }

    pub const fn panel(&self) -> &P { &self.panel }

    pub const fn panel_mut(&mut self) -> &mut P { &mut self.panel }
}

impl<P: PanelDriver, I: PointerInput, T: PeriodicTimer> DisplayPort for GlueContext<P, I, T> {
    fn geometry(&self) -> Option<DisplayGeometry> { self.display.as_ref().map(|d| d.geometry) }

    fn region_mut(
        &mut self,
        idx: usize,
    ) -> &mut [u16] {
        self.buffer.as_mut().and_then(|b| b.region_mut(idx)).unwrap_or_default()
    }

    fn flush_ready(&self) -> Option<&FlushReady> { self.display.as_ref().map(|d| &d.ready) }

    async fn flush(
        &mut self,
        idx: usize,
        area: Area,
    ) {
        let (Some(buffer), Some(display)) = (self.buffer.as_ref(), self.display.as_ref()) else {
            return;
        };
        let pixels = buffer.region(idx).unwrap_or_default();
        self.bridge.flush(&mut self.panel, &area, pixels, &display.ready).await;
    }

    fn read_pointer(
        &mut self,
        state: &mut PointerState,
    ) -> bool {
        match self.touch.as_mut().and_then(I::poll) {
            Some(point) => {
                state.pressed = true;
                state.point = point;
            }
            None => state.pressed = false,
        }
        false
    }
}

impl<P: PanelDriver, I: PointerInput, T: PeriodicTimer> Drop for GlueContext<P, I, T> {
    fn drop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.disarm();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
