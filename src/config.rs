//! Construction-time settings for [`FragmentAssembler`](crate::FragmentAssembler).

use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Initial capacity of each session's reassembly buffer.
pub const DEFAULT_INITIAL_BUFFER_CAPACITY: usize = 4096;

/// Largest reassembly buffer the assembler will grow to.
///
/// Frame lengths travel as 32-bit integers, so a message cannot usefully
/// exceed `i32::MAX` less a little headroom.
pub const DEFAULT_MAX_BUFFER_CAPACITY: NonZeroUsize = match NonZeroUsize::new(i32::MAX as usize - 8) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// Settings that bound per-session reassembly storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Capacity allocated when a session first starts a fragmented message.
    pub initial_buffer_capacity: usize,
    /// Hard cap on a single session's reassembly buffer.
    pub max_buffer_capacity: NonZeroUsize,
}

impl AssemblerConfig {
    /// Create a configuration with the given initial capacity and the
    /// default ceiling.
    #[must_use]
    pub const fn with_initial_capacity(initial_buffer_capacity: usize) -> Self {
        Self {
            initial_buffer_capacity,
            max_buffer_capacity: DEFAULT_MAX_BUFFER_CAPACITY,
        }
    }

    /// Replace the buffer ceiling.
    #[must_use]
    pub const fn max_buffer_capacity(mut self, max_buffer_capacity: NonZeroUsize) -> Self {
        self.max_buffer_capacity = max_buffer_capacity;
        self
    }

    /// Check that the settings are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InitialCapacityTooLarge`] when the initial
    /// capacity exceeds the ceiling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_buffer_capacity > self.max_buffer_capacity.get() {
            return Err(ConfigError::InitialCapacityTooLarge {
                initial: self.initial_buffer_capacity,
                max: self.max_buffer_capacity,
            });
        }
        Ok(())
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self { Self::with_initial_capacity(DEFAULT_INITIAL_BUFFER_CAPACITY) }
}
