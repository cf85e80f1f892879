//! Debug print sink for the toolkit.
//!
//! The toolkit only talks to a plain function pointer so this crate stays
//! independent of the logging backend. The firmware forwards to `defmt`, the
//! simulator prints to stdout.

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// Receives toolkit debug messages.
pub type LogSink = fn(LogLevel, &str);

/// Maximum length of a formatted toolkit log line.
pub const LOG_LINE_LEN: usize = 64;

/// Format into a fixed buffer and hand the line to `sink`, if there is one.
///
/// Lines longer than [`LOG_LINE_LEN`] are cut short.
pub fn emit(
    sink: Option<LogSink>,
    level: LogLevel,
    args: core::fmt::Arguments<'_>,
) {
    use core::fmt::Write;

    if let Some(sink) = sink {
        let mut line = Line(heapless::String::new());
        let _ = line.write_fmt(args);
        sink(level, line.0.as_str());
    }
}

/// Writer that keeps as many characters as fit and drops the rest.
struct Line(heapless::String<LOG_LINE_LEN>);

impl core::fmt::Write for Line {
    fn write_str(
        &mut self,
        s: &str,
    ) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
