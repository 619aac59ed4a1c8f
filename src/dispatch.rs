//! Event dispatch: timestamp resolution and fan-out
//!
//! The dispatcher is nearly stateless: it carries an optional
//! [`TimeSource`] and the fallback sequence counter, and borrows the
//! handler table and topic index per call.

use crate::event::Event;
use crate::handlers::HandlerRegistry;
use crate::level::Level;
use crate::time::TimeSource;
use crate::topics::TopicRegistry;

/// Routes one event to every eligible subscriber of its topic.
///
/// Timestamp resolution order: an explicit nonzero timestamp wins, then an
/// installed [`TimeSource`], then an internal strictly increasing sequence
/// starting at 1. The sequence only advances when it is actually used.
pub struct Dispatcher<'a> {
    time_source: Option<&'a dyn TimeSource>,
    sequence: u64,
}

impl<'a> Dispatcher<'a> {
    pub fn new() -> Self {
        Self {
            time_source: None,
            sequence: 1,
        }
    }

    /// Installs a timestamp provider, consulted whenever an event is
    /// emitted without an explicit timestamp.
    pub fn set_time_source(&mut self, source: &'a dyn TimeSource) {
        self.time_source = Some(source);
    }

    fn resolve_timestamp(&mut self, explicit: u64) -> u64 {
        if explicit != 0 {
            return explicit;
        }
        if let Some(source) = self.time_source {
            return source.now();
        }
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }

    /// Delivers `message` to every enabled subscriber of `topic` whose
    /// threshold is satisfied by `level`, in registration order.
    ///
    /// `explicit_timestamp` of 0 means "resolve one for me".
    pub fn dispatch<
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_HANDLERS: usize,
        const MAX_TOPICS: usize,
        const MAX_SUBSCRIBERS_PER_TOPIC: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
    >(
        &mut self,
        handlers: &HandlerRegistry<
            'a,
            MAX_TOPIC_NAME_LENGTH,
            MAX_HANDLER_NAME_LENGTH,
            MAX_HANDLERS,
            MAX_TOPICS_PER_HANDLER,
        >,
        topics: &TopicRegistry<MAX_TOPIC_NAME_LENGTH, MAX_TOPICS, MAX_SUBSCRIBERS_PER_TOPIC>,
        level: Level,
        topic: &str,
        message: &str,
        explicit_timestamp: u64,
    ) {
        let timestamp = self.resolve_timestamp(explicit_timestamp);
        let event = Event {
            level,
            topic,
            message,
            timestamp,
        };

        for id in topics.subscribers(topic) {
            if let Some(entry) = handlers.get(*id) {
                if entry.is_enabled() && level >= entry.threshold() {
                    entry.sink().on_event(&event);
                }
            }
        }
    }
}

impl Default for Dispatcher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// `core::fmt::Write` adapter that silently truncates on overflow instead
/// of failing the formatting machinery. Truncation happens on a char
/// boundary, so the result is always valid UTF-8.
pub(crate) struct TruncatingWriter<const N: usize> {
    buf: heapless::String<N>,
    truncated: bool,
}

impl<const N: usize> TruncatingWriter<N> {
    pub(crate) fn new() -> Self {
        Self {
            buf: heapless::String::new(),
            truncated: false,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    pub(crate) fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<const N: usize> core::fmt::Write for TruncatingWriter<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if self.truncated {
            return Ok(());
        }
        for ch in s.chars() {
            if self.buf.push(ch).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}
