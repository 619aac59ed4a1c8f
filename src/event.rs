//! The event record handed to sinks

use crate::level::Level;

/// A single log event, as seen by a [`Sink`](crate::Sink).
///
/// Events borrow the caller's topic and message text and only live for the
/// duration of one dispatch; a sink that needs the text later must copy it
/// into its own storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<'a> {
    /// Severity of this event
    pub level: Level,
    /// Topic the event was emitted on
    pub topic: &'a str,
    /// Preformatted message text
    pub message: &'a str,
    /// Resolved timestamp (explicit, time source, or sequence counter)
    pub timestamp: u64,
}

impl core::fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.topic, self.message)
    }
}
