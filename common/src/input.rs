//! Pointer input for the toolkit.
//!
//! # Devices
//!
//! - [`NoTouch`]: display-only builds; never reports a press
//! - [`CalibratedTouch`]: maps raw resistive touch samples to screen coordinates
//!   using a [`TouchCalibration`] (STMPE610 controller or plain ADC touch)
//!
//! The simulator feeds mouse events through its own [`PointerInput`].

use embedded_graphics::prelude::Point;

/// A pointer device polled by the toolkit.
pub trait PointerInput {
    /// Current touch point, or `None` when nothing is pressed.
    fn poll(&mut self) -> Option<Point>;
}

/// Pointer device that is never pressed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTouch;

impl PointerInput for NoTouch {
    fn poll(&mut self) -> Option<Point> { None }
}

// =============================================================================
// Raw Touch Calibration
// =============================================================================

/// One raw sample from a resistive touch controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSample {
    pub x: u16,
    pub y: u16,
    /// Pressure; 0 when not touched.
    pub z: u16,
}

/// Source of raw touch samples (STMPE610 over SPI, or an ADC pair).
pub trait RawTouch {
    fn read_raw(&mut self) -> Option<RawSample>;
}

/// Raw extents of a touch panel. A `min` above `max` flips that axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchCalibration {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
}

impl TouchCalibration {
    /// STMPE610 resistive controller.
    pub const STMPE610: Self = Self {
        x_min: 100,
        x_max: 3800,
        y_min: 100,
        y_max: 3750,
    };

    /// Four-wire resistive panel read through the MCU ADC.
    pub const ADC: Self = Self {
        x_min: 325,
        x_max: 750,
        y_min: 240,
        y_max: 840,
    };

    /// Map a raw sample to a point inside `width` x `height`.
    pub fn map(
        &self,
        raw_x: u16,
        raw_y: u16,
        width: u16,
        height: u16,
    ) -> Point {
        Point::new(
            scale(raw_x, self.x_min, self.x_max, width),
            scale(raw_y, self.y_min, self.y_max, height),
        )
    }
}

/// Linear map of `raw` from `min..=max` onto `0..len`, clamped to the screen.
fn scale(
    raw: u16,
    min: u16,
    max: u16,
    len: u16,
) -> i32 {
    let span = i32::from(max) - i32::from(min);
    if span == 0 || len == 0 {
        return 0;
    }
    let v = (i32::from(raw) - i32::from(min)) * i32::from(len) / span;
    v.clamp(0, i32::from(len) - 1)
}

/// Touch controller wrapped with a calibration.
pub struct CalibratedTouch<R: RawTouch> {
    raw: R,
    calibration: TouchCalibration,
    width: u16,
    height: u16,
    min_pressure: u16,
}

impl<R: RawTouch> CalibratedTouch<R> {
    /// Samples below `min_pressure` count as released.
    pub const fn new(
        raw: R,
        calibration: TouchCalibration,
        width: u16,
        height: u16,
        min_pressure: u16,
    ) -> Self {
        Self {
            raw,
            calibration,
            width,
            height,
            min_pressure,
        }
    }
}

impl<R: RawTouch> PointerInput for CalibratedTouch<R> {
    fn poll(&mut self) -> Option<Point> {
        let sample = self.raw.read_raw()?;
        if sample.z < self.min_pressure.max(1) {
            return None;
        }
        Some(self.calibration.map(sample.x, sample.y, self.width, self.height))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<RawSample>);

    impl RawTouch for Fixed {
        fn read_raw(&mut self) -> Option<RawSample> { self.0 }
    }

    #[test]
    fn test_no_touch_never_pressed() {
        let mut touch = NoTouch;
        assert_eq!(touch.poll(), None);
        assert_eq!(touch.poll(), None);
    }

    #[test]
    fn test_stmpe610_corners() {
        let cal = TouchCalibration::STMPE610;
        assert_eq!(cal.map(100, 100, 240, 320), Point::new(0, 0));
        assert_eq!(cal.map(3800, 3750, 240, 320), Point::new(239, 319));
        assert_eq!(cal.map(1950, 1925, 240, 320), Point::new(120, 160));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let cal = TouchCalibration::ADC;
        assert_eq!(cal.map(0, 2000, 240, 240), Point::new(0, 239));
    }

    #[test]
    fn test_flipped_axis() {
        let cal = TouchCalibration {
            x_min: 900,
            x_max: 100,
            y_min: 100,
            y_max: 900,
        };
        assert_eq!(cal.map(900, 100, 100, 100), Point::new(0, 0));
        assert_eq!(cal.map(100, 900, 100, 100), Point::new(99, 99));
    }

    #[test]
    fn test_calibrated_touch_pressure_threshold() {
        let light = RawSample { x: 1950, y: 1925, z: 5 };
        let mut touch = CalibratedTouch::new(Fixed(Some(light)), TouchCalibration::STMPE610, 240, 320, 10);
        assert_eq!(touch.poll(), None);

        let firm = RawSample { z: 50, ..light };
        let mut touch = CalibratedTouch::new(Fixed(Some(firm)), TouchCalibration::STMPE610, 240, 320, 10);
        assert_eq!(touch.poll(), Some(Point::new(120, 160)));
    }

    #[test]
    fn test_calibrated_touch_zero_pressure_is_released() {
        let sample = RawSample { x: 500, y: 500, z: 0 };
        let mut touch = CalibratedTouch::new(Fixed(Some(sample)), TouchCalibration::ADC, 240, 240, 0);
        assert_eq!(touch.poll(), None);
    }
}
