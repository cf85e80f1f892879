//! Demo selection.
//!
//! The firmware switches demos with the `Y` button, the simulator with Space.
//!
//! # Modes
//!
//! - [`Mode::Widgets`]: tab view with gauge, chart and canvas
//! - [`Mode::Watch`]: smartwatch schedule pages, cycling on their own
//! - [`Mode::SelfTest`]: graphics primitives test, one step at a time

/// Active demo.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Toolkit widgets demo (Gauge, Chart and Canvas tabs).
    #[default]
    Widgets,

    /// Watch face cycling through its schedule pages every 2 s.
    Watch,

    /// Graphics self-test sequence.
    SelfTest,
}

impl Mode {
    /// Next demo (cycles: Widgets → Watch → SelfTest → Widgets).
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Widgets => Self::Watch,
            Self::Watch => Self::SelfTest,
            Self::SelfTest => Self::Widgets,
        }
    }

    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Widgets => "widgets",
            Self::Watch => "watch",
            Self::SelfTest => "self-test",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default() {
        assert_eq!(Mode::default(), Mode::Widgets);
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::Widgets.toggle(), Mode::Watch);
        assert_eq!(Mode::Watch.toggle(), Mode::SelfTest);
        assert_eq!(Mode::SelfTest.toggle(), Mode::Widgets);
    }

    #[test]
    fn test_mode_toggle_cycle() {
        let mode = Mode::Widgets;
        let mode = mode.toggle(); // -> Watch
        let mode = mode.toggle(); // -> SelfTest
        let mode = mode.toggle(); // -> Widgets
        assert_eq!(mode, Mode::Widgets);
    }
}
