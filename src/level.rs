//! Severity levels for routing and filtering

/// Severity of a log event.
///
/// Levels are totally ordered (`Trace < Debug < Info < Warn < Error`).
/// A handler registered with threshold `t` receives an event of level `l`
/// iff `l >= t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Extremely fine-grained output, usually disabled by default
    Trace = 0,
    /// Debugging details useful during development
    Debug = 1,
    /// General informational messages
    Info = 2,
    /// Potential issues or recoverable problems
    Warn = 3,
    /// Serious issues requiring attention
    Error = 4,
}

impl Level {
    /// Upper-case name of the level, e.g. `"INFO"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Trace.as_str(), "TRACE");
        assert_eq!(Level::Debug.as_str(), "DEBUG");
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Warn.as_str(), "WARN");
        assert_eq!(Level::Error.as_str(), "ERROR");
    }
}
