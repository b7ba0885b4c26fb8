//! Growable append-only byte store used to stitch fragments together.
//!
//! [`BufferBuilder`] separates its logical length (the *limit*) from the
//! capacity of its backing storage. Appends only ever grow storage through
//! [`BufferBuilder::ensure_capacity`], which doubles the capacity until the
//! request fits so that a message built from many fragments costs amortised
//! linear copying. [`BufferBuilder::reset`] empties the buffer but keeps the
//! allocation, letting a session reuse it for its next message.

use std::num::NonZeroUsize;

use crate::{config::DEFAULT_MAX_BUFFER_CAPACITY, error::BufferError};

/// Smallest capacity a buffer grows to from empty storage.
const MIN_GROWTH_CAPACITY: usize = 64;

/// Owned, capacity-growing byte store with append and reset operations.
///
/// # Examples
///
/// ```
/// use fragment_assembler::BufferBuilder;
/// let mut builder = BufferBuilder::new(4);
/// builder.append(b"hello")?.append(b" world")?;
/// assert_eq!(builder.as_slice(), b"hello world");
/// assert!(builder.capacity() >= 11);
///
/// builder.reset();
/// assert!(builder.is_empty());
/// # Ok::<(), fragment_assembler::BufferError>(())
/// ```
#[derive(Debug)]
pub struct BufferBuilder {
    buffer: Vec<u8>,
    initial_capacity: usize,
    max_capacity: NonZeroUsize,
}

impl BufferBuilder {
    /// Create a buffer with `initial_capacity` bytes of storage and the
    /// default capacity ceiling.
    #[must_use]
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_max_capacity(initial_capacity, DEFAULT_MAX_BUFFER_CAPACITY)
    }

    /// Create a buffer that refuses to grow beyond `max_capacity` bytes.
    ///
    /// An initial capacity above the ceiling is clamped to it.
    #[must_use]
    pub fn with_max_capacity(initial_capacity: usize, max_capacity: NonZeroUsize) -> Self {
        let initial_capacity = initial_capacity.min(max_capacity.get());
        Self {
            buffer: Vec::with_capacity(initial_capacity),
            initial_capacity,
            max_capacity,
        }
    }

    /// Number of bytes appended since the last reset.
    #[must_use]
    pub fn limit(&self) -> usize { self.buffer.len() }

    /// Report whether nothing has been appended since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Size of the backing storage in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize { self.buffer.capacity() }

    /// Capacity the buffer was created with.
    #[must_use]
    pub const fn initial_capacity(&self) -> usize { self.initial_capacity }

    /// Ceiling the buffer will not grow past.
    #[must_use]
    pub const fn max_capacity(&self) -> NonZeroUsize { self.max_capacity }

    /// Borrow the bytes appended since the last reset.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] { self.buffer.as_slice() }

    /// Discard the content while keeping the allocated capacity.
    pub fn reset(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    /// Append `bytes` after the current content, growing storage if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError`] when the buffer cannot grow to hold the bytes.
    /// The existing content is left untouched in that case.
    pub fn append(&mut self, bytes: &[u8]) -> Result<&mut Self, BufferError> {
        self.ensure_capacity(bytes.len())?;
        self.buffer.extend_from_slice(bytes);
        Ok(self)
    }

    /// Make room for `additional` more bytes.
    ///
    /// This is the only operation that reallocates. Capacity doubles from its
    /// current size until the request fits, bounded by the ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityExceeded`] when the request is beyond
    /// the ceiling and [`BufferError::AllocationFailed`] when the allocator
    /// refuses.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<(), BufferError> {
        let limit = self.max_capacity;
        let required =
            self.buffer
                .len()
                .checked_add(additional)
                .ok_or(BufferError::CapacityExceeded {
                    required: usize::MAX,
                    limit,
                })?;
        if required <= self.buffer.capacity() {
            return Ok(());
        }
        if required > limit.get() {
            return Err(BufferError::CapacityExceeded { required, limit });
        }

        let grown = grown_capacity(self.buffer.capacity(), required, limit.get());
        self.buffer.try_reserve_exact(grown - self.buffer.len())?;
        Ok(())
    }

    /// Release storage beyond the larger of the content and the initial
    /// capacity.
    pub fn compact(&mut self) {
        let target = self.buffer.len().max(self.initial_capacity);
        if self.buffer.capacity() > target {
            self.buffer.shrink_to(target);
        }
    }
}

fn grown_capacity(current: usize, required: usize, max: usize) -> usize {
    let mut capacity = current.max(MIN_GROWTH_CAPACITY);
    while capacity < required {
        capacity = capacity.saturating_mul(2);
    }
    capacity.min(max)
}

#[cfg(test)]
mod tests;
