//! Pipeline configuration.

use std::error::Error;
use std::fmt;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised when building a [`StreamConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The per-stage channel capacity was set to zero.
    InvalidBufferSize,

    /// The concurrency level was set to zero.
    InvalidConcurrency,
}

impl fmt::Display for StreamError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBufferSize => write!(formatter, "buffer size must be greater than 0"),
            Self::InvalidConcurrency => write!(formatter, "concurrency must be greater than 0"),
        }
    }
}

impl Error for StreamError {}

// =============================================================================
// StreamConfig
// =============================================================================

/// Settings inherited by every stage appended to a stream.
///
/// - `buffer_size`: capacity of the channel between a stage and the next.
/// - `concurrency`: in-flight limit used by
///   [`map_parallel`](super::Stream::map_parallel) and
///   [`then_parallel`](super::Stream::then_parallel).
///
/// # Examples
///
/// ```rust
/// use fpkit::stream::{StreamConfig, StreamError};
///
/// let config = StreamConfig::default().with_buffer_size(8)?.with_concurrency(2)?;
/// assert_eq!(config.buffer_size(), 8);
/// assert_eq!(config.concurrency(), 2);
///
/// assert_eq!(StreamConfig::try_new(0, 1), Err(StreamError::InvalidBufferSize));
/// # Ok::<(), StreamError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamConfig {
    buffer_size: usize,
    concurrency: usize,
}

impl StreamConfig {
    /// Channel capacity used when none is configured.
    pub const DEFAULT_BUFFER_SIZE: usize = 64;

    /// Creates a config.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidBufferSize`] or
    /// [`StreamError::InvalidConcurrency`] for zero values.
    pub const fn try_new(buffer_size: usize, concurrency: usize) -> Result<Self, StreamError> {
        if buffer_size == 0 {
            return Err(StreamError::InvalidBufferSize);
        }
        if concurrency == 0 {
            return Err(StreamError::InvalidConcurrency);
        }
        Ok(Self {
            buffer_size,
            concurrency,
        })
    }

    /// Creates a config.
    ///
    /// # Panics
    ///
    /// Panics if either value is zero.
    #[must_use]
    pub fn new(buffer_size: usize, concurrency: usize) -> Self {
        Self::try_new(buffer_size, concurrency).unwrap_or_else(|error| panic!("{error}"))
    }

    /// Returns a copy with a different channel capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidBufferSize`] if `buffer_size` is zero.
    pub const fn with_buffer_size(self, buffer_size: usize) -> Result<Self, StreamError> {
        Self::try_new(buffer_size, self.concurrency)
    }

    /// Returns a copy with a different concurrency level.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConcurrency`] if `concurrency` is zero.
    pub const fn with_concurrency(self, concurrency: usize) -> Result<Self, StreamError> {
        Self::try_new(self.buffer_size, concurrency)
    }

    /// Capacity of each inter-stage channel.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Default in-flight limit of the parallel maps.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }
}

impl Default for StreamConfig {
    /// `buffer_size` of [`DEFAULT_BUFFER_SIZE`](Self::DEFAULT_BUFFER_SIZE)
    /// and one unit of concurrency per CPU.
    fn default() -> Self {
        Self {
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
            concurrency: num_cpus::get().max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_uses_cpu_count() {
        let config = StreamConfig::default();
        assert_eq!(config.buffer_size(), 64);
        assert_eq!(config.concurrency(), num_cpus::get().max(1));
    }

    #[rstest]
    #[case(0, 1, StreamError::InvalidBufferSize)]
    #[case(1, 0, StreamError::InvalidConcurrency)]
    #[case(0, 0, StreamError::InvalidBufferSize)]
    fn try_new_rejects_zero(
        #[case] buffer_size: usize,
        #[case] concurrency: usize,
        #[case] expected: StreamError,
    ) {
        assert_eq!(StreamConfig::try_new(buffer_size, concurrency), Err(expected));
    }

    #[rstest]
    fn with_methods_keep_other_field() {
        let config = StreamConfig::new(4, 3);
        assert_eq!(config.with_buffer_size(9).map(|c| c.concurrency()), Ok(3));
        assert_eq!(config.with_concurrency(9).map(|c| c.buffer_size()), Ok(4));
        assert_eq!(config.with_concurrency(0), Err(StreamError::InvalidConcurrency));
    }

    #[rstest]
    #[should_panic(expected = "buffer size must be greater than 0")]
    fn new_panics_on_zero_buffer() {
        let _ = StreamConfig::new(0, 1);
    }

    #[rstest]
    #[case(StreamError::InvalidBufferSize, "buffer size")]
    #[case(StreamError::InvalidConcurrency, "concurrency")]
    fn error_display(#[case] error: StreamError, #[case] fragment: &str) {
        assert!(error.to_string().contains(fragment));
    }
}
