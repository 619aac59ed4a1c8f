//! Time abstraction for different platforms

/// Timestamp source trait
///
/// Abstracts timestamp acquisition for both std and embedded platforms.
/// The returned value is opaque to the library (Unix seconds, microseconds
/// since boot, an RTC reading - whatever the embedder's sinks expect).
pub trait TimeSource {
    /// Get the current timestamp
    fn now(&self) -> u64;
}
