//! Error types for PicoLog
//!
//! no_std compatible error handling

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Maximum number of registered handlers reached
    MaxHandlersReached { max_handlers: usize },
    /// Maximum number of distinct topics reached
    MaxTopicsReached { max_topics: usize },
    /// Maximum number of subscribers per topic reached
    MaxSubscribersPerTopicReached { max_subscribers: usize },
    /// Topic name length exceeded maximum allowed length
    TopicNameLengthExceeded {
        max_length: usize,
        actual_length: usize,
    },
    /// Handler name length exceeded maximum allowed length
    HandlerNameLengthExceeded {
        max_length: usize,
        actual_length: usize,
    },
    /// No handler with the given id or name is registered
    HandlerNotFound,
    /// Formatted message did not fit the format buffer and was truncated
    MessageTruncated { buffer_size: usize },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MaxHandlersReached { max_handlers } => {
                write!(f, "Maximum number of handlers reached: max {}", max_handlers)
            }
            Error::MaxTopicsReached { max_topics } => {
                write!(f, "Maximum number of topics reached: max {}", max_topics)
            }
            Error::MaxSubscribersPerTopicReached { max_subscribers } => {
                write!(
                    f,
                    "Maximum number of subscribers per topic reached: max {}",
                    max_subscribers
                )
            }
            Error::TopicNameLengthExceeded {
                max_length,
                actual_length,
            } => {
                write!(
                    f,
                    "Topic name length exceeded: max {}, actual {}",
                    max_length, actual_length
                )
            }
            Error::HandlerNameLengthExceeded {
                max_length,
                actual_length,
            } => {
                write!(
                    f,
                    "Handler name length exceeded: max {}, actual {}",
                    max_length, actual_length
                )
            }
            Error::HandlerNotFound => write!(f, "No handler with the given id or name"),
            Error::MessageTruncated { buffer_size } => {
                write!(
                    f,
                    "Formatted message truncated to {} bytes",
                    buffer_size
                )
            }
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
