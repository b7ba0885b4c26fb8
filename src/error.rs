//! Error types surfaced by the assembler and its buffers.
//!
//! Orphan fragments are not errors: they are dropped and counted. The
//! variants here cover the cases a caller must act on, namely storage that
//! cannot grow and fragment ranges that do not fit their buffer.

use std::{collections::TryReserveError, num::NonZeroUsize};

use thiserror::Error;

use crate::SessionId;

/// Errors produced while growing a [`BufferBuilder`](crate::BufferBuilder).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// The append would push the buffer beyond its configured ceiling.
    #[error("buffer capacity exceeded: required {required} bytes, limit {limit}")]
    CapacityExceeded { required: usize, limit: NonZeroUsize },
    /// The allocator could not satisfy the growth request.
    #[error("buffer allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

/// Errors returned by [`FragmentAssembler::on_fragment`](crate::FragmentAssembler::on_fragment).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// The fragment's byte range does not lie within the supplied buffer.
    #[error("fragment range {offset}+{length} exceeds buffer of {buffer_length} bytes")]
    FragmentOutOfBounds {
        offset: usize,
        length: usize,
        buffer_length: usize,
    },
    /// The session's reassembly buffer could not hold the fragment.
    #[error("session {session_id} reassembly failed: {source}")]
    Buffer {
        session_id: SessionId,
        #[source]
        source: BufferError,
    },
}

/// Errors produced when validating an [`AssemblerConfig`](crate::AssemblerConfig).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The initial buffer capacity is larger than the permitted maximum.
    #[error("initial buffer capacity {initial} exceeds maximum {max}")]
    InitialCapacityTooLarge { initial: usize, max: NonZeroUsize },
}
