//! Seam between the glue and a retained-mode GUI toolkit.
//!
//! The glue never renders anything itself. It registers a display and an
//! input device with a [`Toolkit`], and the toolkit calls back into the glue
//! through [`DisplayPort`] whenever a region of the render buffer is ready.
//!
//! # Flow
//!
//! ```text
//! GlueContext::begin ──► Toolkit::init / register_display / register_input
//!
//! Toolkit (every refresh)
//!   ├─► DisplayPort::region_mut  (render strip)
//!   ├─► FlushReady::begin
//!   ├─► DisplayPort::flush       ──► FlushBridge ──► PanelDriver
//!   │                                  └─► FlushReady::signal
//!   └─► DisplayPort::read_pointer ──► PointerInput
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::log::LogSink;
use crate::tick::TickClock;

// =============================================================================
// Areas
// =============================================================================

/// Screen rectangle with inclusive corners, as toolkits hand them to flush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
}

/// Inclusive span from `a` to `b`, saturating at `u16::MAX`.
const fn span(
    a: i16,
    b: i16,
) -> u16 {
    let len = b as i32 - a as i32 + 1;
    if len <= 0 {
        0
    } else if len > u16::MAX as i32 {
        u16::MAX
    } else {
        len as u16
    }
}

impl Area {
    pub const fn new(
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
    ) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Whole screen of `width` x `height`.
    pub const fn full(
        width: u16,
        height: u16,
    ) -> Self {
        Self::new(0, 0, width as i16 - 1, height as i16 - 1)
    }

    /// Width in pixels, 0 when `x2 < x1`.
    #[inline]
    pub const fn width(&self) -> u16 { span(self.x1, self.x2) }

    /// Height in pixels, 0 when `y2 < y1`.
    #[inline]
    pub const fn height(&self) -> u16 { span(self.y1, self.y2) }

    /// Number of pixels covered.
    #[inline]
    pub const fn pixel_count(&self) -> usize { self.width() as usize * self.height() as usize }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.pixel_count() == 0 }

    /// Overlapping part of two areas.
    pub fn intersection(
        &self,
        other: &Self,
    ) -> Option<Self> {
        let area = Self::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        (!area.is_empty()).then_some(area)
    }

    /// Smallest area covering both.
    pub fn union(
        &self,
        other: &Self,
    ) -> Self {
        Self::new(self.x1.min(other.x1), self.y1.min(other.y1), self.x2.max(other.x2), self.y2.max(other.y2))
    }

    /// True if `other` lies completely inside `self`.
    pub const fn contains(
        &self,
        other: &Self,
    ) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// Convert an embedded-graphics rectangle. `None` for a zero-size rectangle.
    pub fn from_rectangle(rect: &Rectangle) -> Option<Self> {
        let br = rect.bottom_right()?;
        Some(Self::new(
            rect.top_left.x.clamp(i16::MIN.into(), i16::MAX.into()) as i16,
            rect.top_left.y.clamp(i16::MIN.into(), i16::MAX.into()) as i16,
            br.x.clamp(i16::MIN.into(), i16::MAX.into()) as i16,
            br.y.clamp(i16::MIN.into(), i16::MAX.into()) as i16,
        ))
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.x1.into(), self.y1.into()),
            Size::new(self.width().into(), self.height().into()),
        )
    }
}

// =============================================================================
// Driver Descriptors
// =============================================================================

/// What the toolkit needs to know about the registered display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGeometry {
    pub hor_res: u16,
    pub ver_res: u16,
    /// Pixels per render region.
    pub region_len: usize,
    /// 1 for single buffering, 2 for DMA double buffering.
    pub region_count: usize,
    /// Render big-endian pixels (byte-swapped Rgb565).
    pub swap_bytes: bool,
}

/// Flush completion handshake between the toolkit and the flush bridge.
///
/// The toolkit marks a flush as pending before handing a region over and
/// must not touch that region again until the bridge signals completion.
pub struct FlushReady {
    pending: AtomicBool,
    acks: AtomicU32,
}

impl FlushReady {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            acks: AtomicU32::new(0),
        }
    }

    /// Toolkit side: a region is being handed to the flush callback.
    #[inline]
    pub fn begin(&self) { self.pending.store(true, Ordering::Release); }

    /// Bridge side: the region may be reused.
    #[inline]
    pub fn signal(&self) {
        self.pending.store(false, Ordering::Release);
        self.acks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_pending(&self) -> bool { self.pending.load(Ordering::Acquire) }

    /// Number of completions signalled so far.
    #[inline]
    pub fn acks(&self) -> u32 { self.acks.load(Ordering::Relaxed) }
}

impl Default for FlushReady {
    fn default() -> Self { Self::new() }
}

/// Display driver record owned by the glue context.
pub struct DisplayDriverDescriptor {
    pub geometry: DisplayGeometry,
    pub ready: FlushReady,
}

impl DisplayDriverDescriptor {
    pub const fn new(geometry: DisplayGeometry) -> Self {
        Self {
            geometry,
            ready: FlushReady::new(),
        }
    }
}

/// Kind of input device registered with the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKind {
    Pointer,
}

/// Input driver record owned by the glue context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputDriverDescriptor {
    pub kind: InputKind,
}

/// Last known pointer state, kept by the toolkit between reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerState {
    pub pressed: bool,
    pub point: Point,
}

// =============================================================================
// Capabilities
// =============================================================================

/// What the toolkit can call on the glue.
pub trait DisplayPort {
    /// Registered display, or `None` before `begin` succeeded.
    fn geometry(&self) -> Option<DisplayGeometry>;

    /// Render region `idx`. Empty when there is no such region.
    fn region_mut(
        &mut self,
        idx: usize,
    ) -> &mut [u16];

    /// Completion handshake of the registered display.
    fn flush_ready(&self) -> Option<&FlushReady>;

    /// Send the first `area.pixel_count()` pixels of region `idx` to `area`.
    async fn flush(
        &mut self,
        idx: usize,
        area: Area,
    );

    /// Update `state` from the pointer device. Returns `false` when no more
    /// samples are buffered (always, for the devices supported here).
    fn read_pointer(
        &mut self,
        state: &mut PointerState,
    ) -> bool;
}

/// What the glue calls on the toolkit.
pub trait Toolkit {
    /// Initialize toolkit internals. Called once per successful `begin`.
    fn init(&mut self);

    /// Route toolkit debug output to `sink`.
    fn set_log_sink(
        &mut self,
        sink: LogSink,
    );

    /// Register the display described by `geometry`.
    fn register_display(
        &mut self,
        geometry: DisplayGeometry,
    );

    /// Register an input device.
    fn register_input(
        &mut self,
        input: &InputDriverDescriptor,
    );

    /// Forget the display and input registrations.
    fn unregister_drivers(&mut self);

    /// Clock the tick source advances.
    fn clock(&self) -> &'static TickClock;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_dimensions() {
        let area = Area::new(0, 0, 239, 7);
        assert_eq!(area.width(), 240);
        assert_eq!(area.height(), 8);
        assert_eq!(area.pixel_count(), 1920);
    }

    #[test]
    fn test_inverted_area_is_empty() {
        let area = Area::new(10, 10, 9, 20);
        assert_eq!(area.width(), 0);
        assert!(area.is_empty());
    }

    #[test]
    fn test_wide_area_does_not_overflow() {
        assert_eq!(Area::new(-20000, 0, 20000, 0).width(), 40001);
        assert_eq!(Area::new(0, i16::MIN, 0, i16::MAX).height(), u16::MAX);
        assert_eq!(Area::new(i16::MAX, 0, i16::MIN, 0).width(), 0);
    }

    #[test]
    fn test_area_intersection_and_union() {
        let a = Area::new(0, 0, 9, 9);
        let b = Area::new(5, 5, 14, 14);
        assert_eq!(a.intersection(&b), Some(Area::new(5, 5, 9, 9)));
        assert_eq!(a.union(&b), Area::new(0, 0, 14, 14));
        assert_eq!(a.intersection(&Area::new(20, 20, 30, 30)), None);
        assert!(Area::full(320, 240).contains(&b));
    }

    #[test]
    fn test_area_rectangle_conversion() {
        let rect = Rectangle::new(Point::new(4, 6), Size::new(10, 2));
        let area = Area::from_rectangle(&rect).unwrap();
        assert_eq!(area, Area::new(4, 6, 13, 7));
        assert_eq!(area.to_rectangle(), rect);
        assert_eq!(Area::from_rectangle(&Rectangle::new(Point::zero(), Size::zero())), None);
    }

    #[test]
    fn test_flush_ready_handshake() {
        let ready = FlushReady::new();
        assert!(!ready.is_pending());
        ready.begin();
        assert!(ready.is_pending());
        ready.signal();
        assert!(!ready.is_pending());
        assert_eq!(ready.acks(), 1);
    }
}
