//! Display Pack buttons.
//!
//! Each button gets time-based edge detection with debouncing, and the four
//! of them map onto demo actions:
//!
//! | Button | GPIO | Action |
//! |--------|------|--------|
//! | A | 12 | previous tab |
//! | B | 13 | next tab |
//! | X | 14 | log render statistics |
//! | Y | 15 | next demo |

use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant};

/// Debounce duration in milliseconds.
pub const DEBOUNCE_MS: u64 = 50;

/// What a button press asks the firmware to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum Action {
    PrevTab,
    NextTab,
    LogStats,
    NextDemo,
}

/// Button debounce state with time-based edge detection.
pub struct ButtonState {
    was_pressed: bool,
    last_change: Option<Instant>,
}

impl ButtonState {
    /// Create a new button state (not pressed).
    pub const fn new() -> Self {
        Self {
            was_pressed: false,
            last_change: None,
        }
    }

    /// True only on the falling edge. Buttons are active-low.
    pub fn just_pressed(
        &mut self,
        is_low: bool,
    ) -> bool {
        if is_low == self.was_pressed {
            return false;
        }
        if let Some(last) = self.last_change
            && last.elapsed() < Duration::from_millis(DEBOUNCE_MS)
        {
            return false;
        }

        self.was_pressed = is_low;
        self.last_change = Some(Instant::now());
        is_low
    }
}

impl Default for ButtonState {
    fn default() -> Self { Self::new() }
}

/// The four pack buttons with their debounce state.
pub struct Buttons<'d> {
    pins: [(Input<'d>, Action); 4],
    states: [ButtonState; 4],
}

impl<'d> Buttons<'d> {
    /// Buttons A, B, X, Y (inputs with pull-ups).
    pub fn new(
        a: Input<'d>,
        b: Input<'d>,
        x: Input<'d>,
        y: Input<'d>,
    ) -> Self {
        Self {
            pins: [
                (a, Action::PrevTab),
                (b, Action::NextTab),
                (x, Action::LogStats),
                (y, Action::NextDemo),
            ],
            states: [const { ButtonState::new() }; 4],
        }
    }

    /// First action whose button was just pressed. Every button is sampled.
    pub fn poll(&mut self) -> Option<Action> {
        let mut action = None;
        for ((pin, pin_action), state) in self.pins.iter().zip(self.states.iter_mut()) {
            if state.just_pressed(pin.is_low()) && action.is_none() {
                action = Some(*pin_action);
            }
        }
        action
    }
}
