//! Errors reported by glue initialization.

use core::fmt;

/// Why [`GlueContext::begin`](crate::glue::GlueContext::begin) failed.
///
/// Both are permanent for a given build: buffer size and tick rate are
/// compile-time constants, so callers halt instead of retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlueError {
    /// The render buffer could not be allocated.
    AllocationFailed,
    /// No prescaler can produce the requested tick rate, or the timer backend refused it.
    TimerConfigurationFailed,
}

impl GlueError {
    /// Numeric status code (0 is reserved for success).
    pub const fn code(self) -> u8 {
        match self {
            Self::AllocationFailed => 1,
            Self::TimerConfigurationFailed => 2,
        }
    }
}

impl fmt::Display for GlueError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::AllocationFailed => f.write_str("render buffer allocation failed"),
            Self::TimerConfigurationFailed => f.write_str("tick timer configuration failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_and_nonzero() {
        assert_eq!(GlueError::AllocationFailed.code(), 1);
        assert_eq!(GlueError::TimerConfigurationFailed.code(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            GlueError::TimerConfigurationFailed.to_string(),
            "tick timer configuration failed"
        );
    }
}
