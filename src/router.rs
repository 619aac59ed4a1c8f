//! The log router: registration, removal and emission in one context
//!
//! [`LogRouter`] owns the handler table, the topic index and the
//! dispatcher, and is the only writer of topic subscriber lists. There is
//! no global instance; the embedder owns the router and decides how (and
//! whether) to share it.

use crate::dispatch::{Dispatcher, TruncatingWriter};
use crate::error::{Error, Result};
use crate::handlers::{HandlerEntry, HandlerId, HandlerRegistry, Sink};
use crate::level::Level;
use crate::time::TimeSource;
use crate::topics::{TopicName, TopicRegistry};

/// Bounded publish/subscribe log router.
///
/// # Generic Parameters
///
/// - `MAX_TOPIC_NAME_LENGTH`: Maximum length of topic names
/// - `MAX_HANDLER_NAME_LENGTH`: Maximum length of handler names
/// - `MAX_HANDLERS`: Maximum number of registered handlers
/// - `MAX_TOPICS`: Maximum number of distinct topics
/// - `MAX_SUBSCRIBERS_PER_TOPIC`: Maximum subscribers per topic
/// - `MAX_TOPICS_PER_HANDLER`: Maximum subscriptions per handler
/// - `FMT_BUFFER_SIZE`: Buffer size for [`emit_fmt`](Self::emit_fmt)
///
/// All operations run to completion on the caller's stack in bounded
/// time. The router is single-threaded by construction (every mutator
/// takes `&mut self`); to share it across tasks or interrupts, wrap it in
/// your platform's mutex and keep sinks fast and non-reentrant.
pub struct LogRouter<
    'a,
    const MAX_TOPIC_NAME_LENGTH: usize,
    const MAX_HANDLER_NAME_LENGTH: usize,
    const MAX_HANDLERS: usize,
    const MAX_TOPICS: usize,
    const MAX_SUBSCRIBERS_PER_TOPIC: usize,
    const MAX_TOPICS_PER_HANDLER: usize,
    const FMT_BUFFER_SIZE: usize,
> {
    handlers: HandlerRegistry<
        'a,
        MAX_TOPIC_NAME_LENGTH,
        MAX_HANDLER_NAME_LENGTH,
        MAX_HANDLERS,
        MAX_TOPICS_PER_HANDLER,
    >,
    topics: TopicRegistry<MAX_TOPIC_NAME_LENGTH, MAX_TOPICS, MAX_SUBSCRIBERS_PER_TOPIC>,
    dispatcher: Dispatcher<'a>,
}

impl<
        'a,
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_HANDLERS: usize,
        const MAX_TOPICS: usize,
        const MAX_SUBSCRIBERS_PER_TOPIC: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
        const FMT_BUFFER_SIZE: usize,
    > Default
    for LogRouter<
        'a,
        MAX_TOPIC_NAME_LENGTH,
        MAX_HANDLER_NAME_LENGTH,
        MAX_HANDLERS,
        MAX_TOPICS,
        MAX_SUBSCRIBERS_PER_TOPIC,
        MAX_TOPICS_PER_HANDLER,
        FMT_BUFFER_SIZE,
    >
{
    fn default() -> Self {
        Self {
            handlers: HandlerRegistry::new(),
            topics: TopicRegistry::default(),
            dispatcher: Dispatcher::new(),
        }
    }
}

impl<
        'a,
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_HANDLERS: usize,
        const MAX_TOPICS: usize,
        const MAX_SUBSCRIBERS_PER_TOPIC: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
        const FMT_BUFFER_SIZE: usize,
    >
    LogRouter<
        'a,
        MAX_TOPIC_NAME_LENGTH,
        MAX_HANDLER_NAME_LENGTH,
        MAX_HANDLERS,
        MAX_TOPICS,
        MAX_SUBSCRIBERS_PER_TOPIC,
        MAX_TOPICS_PER_HANDLER,
        FMT_BUFFER_SIZE,
    >
{
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sink` for `topics` with the given severity threshold.
    ///
    /// Either the whole registration succeeds, or nothing is mutated:
    /// a full handler table, a full topic index or a full subscriber list
    /// all fail loudly before any state is touched. Duplicate names in
    /// `topics` are collapsed to one subscription; entries beyond
    /// `MAX_TOPICS_PER_HANDLER` are dropped.
    ///
    /// `name` is optional and not required to be unique; removal by name
    /// matches the first registration.
    pub fn register(
        &mut self,
        threshold: Level,
        sink: &'a dyn Sink,
        topics: &[&str],
        name: Option<&str>,
    ) -> Result<HandlerId> {
        if self.handlers.is_full() {
            return Err(Error::MaxHandlersReached {
                max_handlers: MAX_HANDLERS,
            });
        }

        let name = match name {
            Some(n) => Some(heapless::String::try_from(n).map_err(|_| {
                Error::HandlerNameLengthExceeded {
                    max_length: MAX_HANDLER_NAME_LENGTH,
                    actual_length: n.len(),
                }
            })?),
            None => None,
        };

        // Collapse duplicates and cap the subscription list.
        let mut wanted: heapless::Vec<TopicName<MAX_TOPIC_NAME_LENGTH>, MAX_TOPICS_PER_HANDLER> =
            heapless::Vec::new();
        for raw in topics {
            let topic = TopicName::try_from(*raw)?;
            if wanted.contains(&topic) {
                continue;
            }
            if wanted.push(topic).is_err() {
                break;
            }
        }

        // Two-phase commit: reserve topic capacity before touching any
        // state, so a full subscriber list cannot leave a half-registered
        // handler behind.
        self.topics.check_capacity_for(&wanted)?;

        let subscriptions = wanted.clone();
        let id = self.handlers.allocate(threshold, sink, wanted, name)?;
        for topic in subscriptions {
            // Capacity was reserved above; this cannot fail.
            self.topics.subscribe(id, topic)?;
        }

        log::debug!(
            "registered handler {} with {} subscription(s)",
            id,
            self.handlers
                .get(id)
                .map(|h| h.topics().len())
                .unwrap_or(0)
        );
        Ok(id)
    }

    /// Removes the handler with the given id.
    ///
    /// Prunes the handler from every topic it subscribed to, then
    /// compacts the handler table; surviving handlers keep their order
    /// and ids. Returns [`Error::HandlerNotFound`] (and mutates nothing)
    /// if the id is unknown.
    pub fn remove_by_id(&mut self, id: HandlerId) -> Result<()> {
        let pos = self
            .handlers
            .position_by_id(id)
            .ok_or(Error::HandlerNotFound)?;
        self.remove_at(pos);
        Ok(())
    }

    /// Removes the first handler registered with the given name.
    ///
    /// Unnamed handlers never match. Same semantics as
    /// [`remove_by_id`](Self::remove_by_id) otherwise.
    pub fn remove_by_name(&mut self, name: &str) -> Result<()> {
        let pos = self
            .handlers
            .position_by_name(name)
            .ok_or(Error::HandlerNotFound)?;
        self.remove_at(pos);
        Ok(())
    }

    fn remove_at(&mut self, pos: usize) {
        let entry = self.handlers.take(pos);
        for topic in entry.topics() {
            self.topics.unsubscribe(entry.id(), topic);
        }
        log::info!("removed handler {}", entry.id());
    }

    /// Enables or disables a handler without unregistering it.
    pub fn set_enabled(&mut self, id: HandlerId, enabled: bool) -> Result<()> {
        self.handlers.set_enabled(id, enabled)
    }

    /// All registered handlers, in registration order.
    pub fn handlers(
        &self,
    ) -> &[HandlerEntry<'a, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>]
    {
        self.handlers.entries()
    }

    /// Removes every handler, prunes all topic subscriber lists and
    /// restarts the id sequence at 1.
    pub fn clear(&mut self) {
        self.topics.clear_all();
        self.handlers.clear();
        log::debug!("cleared handler registry");
    }

    /// Installs a timestamp provider, consulted whenever an event is
    /// emitted without an explicit timestamp.
    pub fn set_time_source(&mut self, source: &'a dyn TimeSource) {
        self.dispatcher.set_time_source(source);
    }

    /// Emits `message` on `topic`.
    ///
    /// Every enabled subscriber of `topic` whose threshold is satisfied
    /// by `level` is invoked synchronously, in registration order.
    /// Emitting on a topic nobody subscribed to does nothing.
    pub fn emit(&mut self, level: Level, topic: &str, message: &str) {
        self.emit_at(level, topic, message, 0);
    }

    /// Like [`emit`](Self::emit) with an explicit timestamp. A timestamp
    /// of 0 falls back to the installed time source or the internal
    /// sequence counter.
    pub fn emit_at(&mut self, level: Level, topic: &str, message: &str, timestamp: u64) {
        self.dispatcher
            .dispatch(&self.handlers, &self.topics, level, topic, message, timestamp);
    }

    /// Formats `args` into a `FMT_BUFFER_SIZE` buffer and emits the
    /// result on `topic`.
    ///
    /// A message that does not fit is truncated on a char boundary, still
    /// delivered, and reported as [`Error::MessageTruncated`].
    pub fn emit_fmt(
        &mut self,
        level: Level,
        topic: &str,
        args: core::fmt::Arguments<'_>,
    ) -> Result<()> {
        let mut writer = TruncatingWriter::<FMT_BUFFER_SIZE>::new();
        // The writer never fails; an Err here could only come from a
        // Display impl inside `args` and leaves a partial message, which
        // is still worth delivering.
        let _ = core::fmt::Write::write_fmt(&mut writer, args);
        self.dispatcher.dispatch(
            &self.handlers,
            &self.topics,
            level,
            topic,
            writer.as_str(),
            0,
        );
        if writer.is_truncated() {
            Err(Error::MessageTruncated {
                buffer_size: FMT_BUFFER_SIZE,
            })
        } else {
            Ok(())
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.topic_count()
    }

    pub fn subscription_count(&self) -> usize {
        self.topics.subscription_count()
    }
}
