//! # PicoLog
//!
//! Bounded, allocation-free log routing for embedded `no_std` systems.
//!
//! PicoLog matches emitted log events against registered output handlers
//! by severity threshold and topic subscription. Handlers are arbitrary
//! sinks (serial, file, network - supplied by the embedder); the library
//! only does the bookkeeping and the fan-out.
//!
//! ## Features
//!
//! - **no_std** compatible - Fully embedded, no standard library
//! - **Heapless** - All stack/static allocation, no heap usage
//! - **Topic routing** - Handlers subscribe to named topics; an emit on a
//!   topic reaches only that topic's subscribers, in registration order
//! - **Severity thresholds** - Each handler sets its own minimum [`Level`]
//! - **Configurable** - Compile-time capacities via const generics
//! - **Pluggable timestamps** - Install a [`TimeSource`] or fall back to
//!   an internal sequence counter
//!
//! ## Limitations
//!
//! - No topic wildcards; topic names match exactly
//! - Synchronous delivery only (no queuing, no async)
//! - Single-threaded by construction; wrap the router in your platform's
//!   mutex to share it across tasks or interrupt handlers
//!
//! ## Example
//!
//! ```rust,ignore
//! use picolog::prelude::MediumRouter;
//! use picolog::{Event, Level};
//!
//! let serial = |event: &Event<'_>| {
//!     // write to UART, e.g. via a captured peripheral handle
//! };
//!
//! let mut router = MediumRouter::new();
//! router.register(Level::Info, &serial, &["NET", "SYS"], Some("serial"))?;
//!
//! router.emit(Level::Info, "NET", "link up");
//! router.emit_fmt(Level::Warn, "SYS", format_args!("vbat {} mV", 3100))?;
//! ```
//!
//! For a process-wide instance, place the router in a `static` behind your
//! platform's mutex (e.g. `critical_section::Mutex<RefCell<...>>`); the
//! library itself never holds global state.
//!
//! ## Configuration
//!
//! All capacities are const generic parameters of [`LogRouter`]:
//!
//! - `MAX_TOPIC_NAME_LENGTH`: Maximum length of topic names
//! - `MAX_HANDLER_NAME_LENGTH`: Maximum length of handler names
//! - `MAX_HANDLERS`: Maximum number of registered handlers
//! - `MAX_TOPICS`: Maximum number of distinct topics
//! - `MAX_SUBSCRIBERS_PER_TOPIC`: Maximum subscribers per topic
//! - `MAX_TOPICS_PER_HANDLER`: Maximum subscriptions per handler
//! - `FMT_BUFFER_SIZE`: Buffer size for [`LogRouter::emit_fmt`]
//!
//! Every operation is bounded-time in these capacities, and failure is an
//! ordinary [`Error`] value - nothing panics or aborts.

#![no_std]

pub mod dispatch;
pub mod error;
pub mod event;
pub mod handlers;
pub mod level;
pub mod router;
pub mod time;
pub mod topics;

// Re-export commonly used types
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use event::Event;
pub use handlers::{HandlerEntry, HandlerId, HandlerRegistry, Sink};
pub use level::Level;
pub use router::LogRouter;
pub use time::TimeSource;
pub use topics::{TopicName, TopicRegistry};

/// Common router configurations
pub mod prelude {
    use super::LogRouter;

    /// Small configuration: 4 handlers, 4 topics
    pub type SmallRouter<'a> = LogRouter<'a, 16, 12, 4, 4, 4, 2, 64>;

    /// Medium configuration: 8 handlers, 8 topics
    pub type MediumRouter<'a> = LogRouter<'a, 32, 16, 8, 8, 8, 4, 128>;

    /// Large configuration: 16 handlers, 16 topics
    pub type LargeRouter<'a> = LogRouter<'a, 48, 24, 16, 16, 16, 8, 256>;
}
