//! Mouse as touch screen.
//!
//! The event loop records button and motion events in a shared [`MouseState`];
//! the glue polls it through [`MouseTouch`] like a touch controller.

use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::prelude::Point;
use embedded_graphics_simulator::SimulatorEvent;
use tft_glue_common::input::PointerInput;

/// Left button state as seen by the window event loop.
#[derive(Clone, Default)]
pub struct MouseState(Rc<Cell<Option<Point>>>);

impl MouseState {
    /// Track a window event. Returns `true` if it was a mouse event.
    pub fn handle(
        &self,
        event: &SimulatorEvent,
    ) -> bool {
        match *event {
            SimulatorEvent::MouseButtonDown { point, .. } => self.0.set(Some(point)),
            SimulatorEvent::MouseButtonUp { .. } => self.0.set(None),
            SimulatorEvent::MouseMove { point } => {
                if self.0.get().is_some() {
                    self.0.set(Some(point));
                }
            }
            _ => return false,
        }
        true
    }

    /// Pointer device reading this state.
    pub fn touch(&self) -> MouseTouch { MouseTouch(self.clone()) }
}

/// [`PointerInput`] fed by the window's mouse.
pub struct MouseTouch(MouseState);

impl PointerInput for MouseTouch {
    fn poll(&mut self) -> Option<Point> { (self.0).0.get() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics_simulator::sdl2::MouseButton;

    use super::*;

    #[test]
    fn test_drag_follows_mouse_until_release() {
        let mouse = MouseState::default();
        let mut touch = mouse.touch();
        assert_eq!(touch.poll(), None);

        mouse.handle(&SimulatorEvent::MouseMove { point: Point::new(1, 1) });
        assert_eq!(touch.poll(), None);

        mouse.handle(&SimulatorEvent::MouseButtonDown {
            mouse_btn: MouseButton::Left,
            point: Point::new(10, 20),
        });
        mouse.handle(&SimulatorEvent::MouseMove { point: Point::new(12, 22) });
        assert_eq!(touch.poll(), Some(Point::new(12, 22)));

        mouse.handle(&SimulatorEvent::MouseButtonUp {
            mouse_btn: MouseButton::Left,
            point: Point::new(12, 22),
        });
        assert_eq!(touch.poll(), None);
    }
}
