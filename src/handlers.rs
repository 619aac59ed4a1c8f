//! Handler records and the bounded handler registry
//!
//! A handler is a severity threshold, a [`Sink`] and the set of topics it
//! subscribed to. The registry owns all handler records, assigns their
//! ids, and keeps them in registration order.

use crate::error::{Error, Result};
use crate::event::Event;
use crate::level::Level;
use crate::topics::TopicName;

/// Unique id of a registered handler.
///
/// Ids are assigned monotonically starting at 1 and stay unique for as
/// long as the handler is registered. [`clear`](crate::LogRouter::clear)
/// restarts the sequence at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandlerId(u32);

impl HandlerId {
    pub(crate) const fn new(raw: u32) -> Self {
        HandlerId(raw)
    }

    /// Raw numeric value of the id (nonzero).
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An output sink receiving matching events.
///
/// Sinks own whatever state they need (a UART handle, a buffer, a socket)
/// and use interior mutability if delivery mutates it. Any
/// `Fn(&Event<'_>)` closure is a sink.
///
/// Delivery is synchronous and infallible from the router's point of
/// view: a sink that fails internally must cope on its own, it cannot
/// signal the router.
pub trait Sink {
    /// Deliver one event.
    fn on_event(&self, event: &Event<'_>);
}

impl<F> Sink for F
where
    F: Fn(&Event<'_>),
{
    fn on_event(&self, event: &Event<'_>) {
        self(event)
    }
}

/// Registration record of one handler.
#[derive(Clone)]
pub struct HandlerEntry<
    'a,
    const MAX_TOPIC_NAME_LENGTH: usize,
    const MAX_HANDLER_NAME_LENGTH: usize,
    const MAX_TOPICS_PER_HANDLER: usize,
> {
    id: HandlerId,
    name: Option<heapless::String<MAX_HANDLER_NAME_LENGTH>>,
    threshold: Level,
    sink: &'a dyn Sink,
    topics: heapless::Vec<TopicName<MAX_TOPIC_NAME_LENGTH>, MAX_TOPICS_PER_HANDLER>,
    enabled: bool,
}

impl<
        'a,
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
    > HandlerEntry<'a, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>
{
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Optional human-readable name, e.g. `"serial"`. Not required to be
    /// unique.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Minimum level this handler receives.
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn sink(&self) -> &'a dyn Sink {
        self.sink
    }

    /// Topics this handler subscribed to, in registration order.
    pub fn topics(&self) -> &[TopicName<MAX_TOPIC_NAME_LENGTH>] {
        &self.topics
    }

    /// Disabled handlers stay registered but are skipped during dispatch.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
    > core::fmt::Debug
    for HandlerEntry<'_, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("topics", &self.topics)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Bounded table of handler records in registration order.
#[derive(Debug)]
pub struct HandlerRegistry<
    'a,
    const MAX_TOPIC_NAME_LENGTH: usize,
    const MAX_HANDLER_NAME_LENGTH: usize,
    const MAX_HANDLERS: usize,
    const MAX_TOPICS_PER_HANDLER: usize,
> {
    handlers: heapless::Vec<
        HandlerEntry<'a, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>,
        MAX_HANDLERS,
    >,
    next_id: u32,
}

impl<
        'a,
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_HANDLERS: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
    >
    HandlerRegistry<
        'a,
        MAX_TOPIC_NAME_LENGTH,
        MAX_HANDLER_NAME_LENGTH,
        MAX_HANDLERS,
        MAX_TOPICS_PER_HANDLER,
    >
{
    /// An empty registry. The first registered handler gets id 1.
    pub fn new() -> Self {
        Self {
            handlers: heapless::Vec::new(),
            next_id: 1,
        }
    }

    pub fn is_full(&self) -> bool {
        self.handlers.is_full()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// All records in registration order. The order is observable and
    /// load-bearing for diagnostics.
    pub fn entries(
        &self,
    ) -> &[HandlerEntry<'a, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>]
    {
        &self.handlers
    }

    pub fn get(
        &self,
        id: HandlerId,
    ) -> Option<
        &HandlerEntry<'a, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>,
    > {
        self.handlers.iter().find(|h| h.id == id)
    }

    /// Allocates a slot and assigns the next id. The caller must have
    /// reserved topic capacity beforehand.
    pub(crate) fn allocate(
        &mut self,
        threshold: Level,
        sink: &'a dyn Sink,
        topics: heapless::Vec<TopicName<MAX_TOPIC_NAME_LENGTH>, MAX_TOPICS_PER_HANDLER>,
        name: Option<heapless::String<MAX_HANDLER_NAME_LENGTH>>,
    ) -> Result<HandlerId> {
        let id = HandlerId::new(self.next_id);
        let entry = HandlerEntry {
            id,
            name,
            threshold,
            sink,
            topics,
            enabled: true,
        };
        self.handlers
            .push(entry)
            .map_err(|_| Error::MaxHandlersReached {
                max_handlers: MAX_HANDLERS,
            })?;
        self.next_id += 1;
        Ok(id)
    }

    /// Removes the record at `pos`, left-compacting the survivors. Their
    /// order and ids are unchanged.
    pub(crate) fn take(
        &mut self,
        pos: usize,
    ) -> HandlerEntry<'a, MAX_TOPIC_NAME_LENGTH, MAX_HANDLER_NAME_LENGTH, MAX_TOPICS_PER_HANDLER>
    {
        self.handlers.remove(pos)
    }

    pub(crate) fn position_by_id(&self, id: HandlerId) -> Option<usize> {
        self.handlers.iter().position(|h| h.id == id)
    }

    /// First exact name match; unnamed records never match.
    pub(crate) fn position_by_name(&self, name: &str) -> Option<usize> {
        self.handlers.iter().position(|h| h.name() == Some(name))
    }

    pub(crate) fn set_enabled(&mut self, id: HandlerId, enabled: bool) -> Result<()> {
        let entry = self
            .handlers
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(Error::HandlerNotFound)?;
        entry.enabled = enabled;
        Ok(())
    }

    /// Drops every record and restarts the id sequence at 1.
    pub(crate) fn clear(&mut self) {
        self.handlers.clear();
        self.next_id = 1;
    }
}

impl<
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_HANDLER_NAME_LENGTH: usize,
        const MAX_HANDLERS: usize,
        const MAX_TOPICS_PER_HANDLER: usize,
    > Default
    for HandlerRegistry<
        '_,
        MAX_TOPIC_NAME_LENGTH,
        MAX_HANDLER_NAME_LENGTH,
        MAX_HANDLERS,
        MAX_TOPICS_PER_HANDLER,
    >
{
    fn default() -> Self {
        Self::new()
    }
}
