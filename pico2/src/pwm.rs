//! Mapping compare-timer settings onto an RP2350 PWM slice.
//!
//! A PWM slice counts from 0 to `TOP` and raises its wrap interrupt, so one
//! tick period is `divider * (TOP + 1)` system clocks. The divider register has
//! an 8-bit integer part, which rules out the coarsest prescaler (256).

use tft_glue_common::GlueError;
use tft_glue_common::tick::{MAX_COMPARE, TimerSettings};

/// Largest integer clock divider of a PWM slice.
pub const MAX_PWM_DIVIDER: u16 = 255;

/// Divider and `TOP` register values for a PWM slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmSetup {
    pub divider: u8,
    pub top: u16,
}

/// Register values producing one wrap per `settings.compare` divided clocks.
pub fn pwm_setup(settings: TimerSettings) -> Result<PwmSetup, GlueError> {
    if settings.divider == 0 || settings.divider > MAX_PWM_DIVIDER {
        return Err(GlueError::TimerConfigurationFailed);
    }
    if settings.compare == 0 || settings.compare > MAX_COMPARE {
        return Err(GlueError::TimerConfigurationFailed);
    }
    Ok(PwmSetup {
        divider: settings.divider as u8,
        top: (settings.compare - 1) as u16,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
