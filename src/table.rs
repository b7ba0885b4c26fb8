//! Per-session reassembly storage.
//!
//! [`SessionTable`] owns one [`BufferBuilder`] per sending session. Entries
//! are created lazily when a session first starts a fragmented message and
//! live until removed, so a session reuses its buffer across messages.

use std::{collections::HashMap, num::NonZeroUsize};

use crate::{BufferBuilder, SessionId};

/// Mapping from session identifier to that session's reassembly buffer.
#[derive(Debug, Default)]
pub struct SessionTable {
    buffers: HashMap<SessionId, BufferBuilder>,
}

impl SessionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Return the buffer for `session_id`, creating one with the given
    /// capacities if the session has none.
    pub fn get_or_create(
        &mut self,
        session_id: SessionId,
        initial_capacity: usize,
        max_capacity: NonZeroUsize,
    ) -> &mut BufferBuilder {
        self.buffers
            .entry(session_id)
            .or_insert_with(|| BufferBuilder::with_max_capacity(initial_capacity, max_capacity))
    }

    /// Return the buffer for `session_id` without creating one.
    pub fn get(&mut self, session_id: SessionId) -> Option<&mut BufferBuilder> {
        self.buffers.get_mut(&session_id)
    }

    /// Remove and return the buffer for `session_id`.
    pub fn remove(&mut self, session_id: SessionId) -> Option<BufferBuilder> {
        self.buffers.remove(&session_id)
    }

    /// Number of sessions holding a buffer.
    #[must_use]
    pub fn len(&self) -> usize { self.buffers.len() }

    /// Report whether no session holds a buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffers.is_empty() }
}
