//! Inbound adapter that turns a fragment stream into whole messages.
//!
//! [`FragmentAssembler`] sits between the transport and a downstream
//! [`FragmentHandler`]. Unfragmented messages are handed straight through
//! without copying. Fragmented messages are accumulated per session in a
//! [`BufferBuilder`](crate::BufferBuilder) and forwarded once, with a
//! synthesized [`AssemblyHeader`], when their final fragment arrives.
//!
//! Each session is in one of two states: idle (its buffer is absent or empty)
//! or accumulating. A begin fragment always starts a fresh accumulation,
//! discarding whatever an earlier message left behind; continuation and end
//! fragments for an idle session are dropped. Fragments of one session must
//! arrive in the order they were sent, and nothing is reordered or evicted on
//! a timer.

use log::{debug, trace};

use crate::{
    AssemblerConfig,
    AssemblyHeader,
    FragmentHandler,
    Header,
    SessionId,
    SessionTable,
    error::AssemblyError,
    metrics::{self, FragmentKind},
};

/// Reassembles fragmented messages and forwards only whole messages.
///
/// The assembler owns every session buffer it creates. Buffers grow as
/// needed and are kept between messages; call
/// [`free_session_buffer`](Self::free_session_buffer) when a session goes
/// away to release its memory.
///
/// All methods take `&mut self`. Callers polling one transport from several
/// threads must serialise access, for example behind a `Mutex`.
///
/// # Examples
///
/// ```
/// use fragment_assembler::{DataHeader, FragmentAssembler, FrameFlags, Header, SessionId};
///
/// let mut messages = Vec::new();
/// let mut assembler =
///     FragmentAssembler::new(|buffer: &[u8], offset: usize, length: usize, _: &dyn Header| {
///         messages.push(buffer[offset..offset + length].to_vec());
///     });
///
/// let session = SessionId::new(7);
/// let begin = DataHeader::new(session, FrameFlags::BEGIN).with_payload_length(3);
/// let end = DataHeader::new(session, FrameFlags::END).with_payload_length(2);
/// assembler.on_fragment(b"abc", 0, 3, &begin)?;
/// assembler.on_fragment(b"de", 0, 2, &end)?;
/// drop(assembler);
///
/// assert_eq!(messages, vec![b"abcde".to_vec()]);
/// # Ok::<(), fragment_assembler::AssemblyError>(())
/// ```
#[derive(Debug)]
pub struct FragmentAssembler<H> {
    delegate: H,
    config: AssemblerConfig,
    sessions: SessionTable,
    dropped_fragments: u64,
}

impl<H: FragmentHandler> FragmentAssembler<H> {
    /// Create an assembler forwarding whole messages to `delegate`, using
    /// the default configuration.
    #[must_use]
    pub fn new(delegate: H) -> Self { Self::with_config(delegate, AssemblerConfig::default()) }

    /// Create an assembler whose session buffers start at
    /// `initial_buffer_capacity` bytes.
    #[must_use]
    pub fn with_initial_capacity(delegate: H, initial_buffer_capacity: usize) -> Self {
        Self::with_config(
            delegate,
            AssemblerConfig::with_initial_capacity(initial_buffer_capacity),
        )
    }

    /// Create an assembler from explicit configuration.
    ///
    /// An initial capacity above the configured ceiling is clamped to it.
    #[must_use]
    pub fn with_config(delegate: H, config: AssemblerConfig) -> Self {
        Self {
            delegate,
            config,
            sessions: SessionTable::new(),
            dropped_fragments: 0,
        }
    }

    /// Accept the fragment held in `buffer[offset..offset + length]`.
    ///
    /// Whole messages are forwarded immediately, fragmented ones once their
    /// end fragment arrives. At most one downstream call happens per
    /// invocation and it completes before this method returns.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::FragmentOutOfBounds`] when the range does
    /// not fit `buffer`, and [`AssemblyError::Buffer`] when the session's
    /// buffer cannot grow to hold the fragment. In the latter case the
    /// session's partial message is discarded.
    pub fn on_fragment(
        &mut self,
        buffer: &[u8],
        offset: usize,
        length: usize,
        header: &dyn Header,
    ) -> Result<(), AssemblyError> {
        let payload = offset
            .checked_add(length)
            .and_then(|end| buffer.get(offset..end))
            .ok_or(AssemblyError::FragmentOutOfBounds {
                offset,
                length,
                buffer_length: buffer.len(),
            })?;
        let flags = header.flags();

        if flags.is_unfragmented() {
            metrics::inc_fragments(FragmentKind::Unfragmented);
            self.delegate.on_fragment(buffer, offset, length, header);
            return Ok(());
        }

        let session_id = header.session_id();
        if flags.is_begin() {
            metrics::inc_fragments(FragmentKind::Begin);
            return self.begin(session_id, payload);
        }

        let kind = if flags.is_end() {
            FragmentKind::End
        } else {
            FragmentKind::Middle
        };
        metrics::inc_fragments(kind);

        let Some(builder) = self.sessions.get(session_id).filter(|b| !b.is_empty()) else {
            self.dropped_fragments += 1;
            metrics::inc_dropped();
            debug!(
                "dropping fragment without assembly: session_id={session_id}, flags={flags}, \
                 length={length}"
            );
            return Ok(());
        };

        if let Err(source) = builder.append(payload) {
            builder.reset();
            return Err(AssemblyError::Buffer { session_id, source });
        }

        if kind == FragmentKind::End {
            let message_length = builder.limit();
            let assembly_header = AssemblyHeader::compose(header, message_length);
            metrics::inc_assembled();
            trace!("forwarding reassembled message: session_id={session_id}, length={message_length}");
            self.delegate
                .on_fragment(builder.as_slice(), 0, message_length, &assembly_header);
            builder.reset();
        }
        Ok(())
    }

    fn begin(&mut self, session_id: SessionId, payload: &[u8]) -> Result<(), AssemblyError> {
        let builder = self.sessions.get_or_create(
            session_id,
            self.config.initial_buffer_capacity,
            self.config.max_buffer_capacity,
        );
        if !builder.is_empty() {
            debug!(
                "restarting assembly: session_id={session_id}, discarded={}",
                builder.limit()
            );
        }
        builder.reset();
        if let Err(source) = builder.append(payload) {
            builder.reset();
            return Err(AssemblyError::Buffer { session_id, source });
        }
        Ok(())
    }
}

impl<H> FragmentAssembler<H> {
    /// Release the buffer held for `session_id`.
    ///
    /// Returns `true` when a buffer existed. Later continuation fragments for
    /// the session are dropped until a new begin fragment arrives.
    pub fn free_session_buffer(&mut self, session_id: SessionId) -> bool {
        let freed = self.sessions.remove(session_id).is_some();
        if freed {
            debug!("freed session buffer: session_id={session_id}");
        }
        freed
    }

    /// Shrink the buffer held for `session_id` back towards the configured
    /// initial capacity, keeping any partial message it holds.
    ///
    /// Returns `true` when a buffer existed. Use this after an unusually
    /// large message, or when an end fragment was lost, to release memory
    /// without forgetting the session.
    pub fn compact_session_buffer(&mut self, session_id: SessionId) -> bool {
        let Some(builder) = self.sessions.get(session_id) else {
            return false;
        };
        let before = builder.capacity();
        builder.compact();
        trace!(
            "compacted session buffer: session_id={session_id}, before={before}, after={}",
            builder.capacity()
        );
        true
    }

    /// Number of fragments dropped because their session had no assembly in
    /// progress.
    #[must_use]
    pub const fn dropped_fragments(&self) -> u64 { self.dropped_fragments }

    /// Number of sessions currently holding a buffer.
    #[must_use]
    pub fn active_sessions(&self) -> usize { self.sessions.len() }

    /// Configuration the assembler was built with.
    #[must_use]
    pub const fn config(&self) -> &AssemblerConfig { &self.config }

    /// Borrow the downstream handler.
    #[must_use]
    pub const fn delegate(&self) -> &H { &self.delegate }

    /// Mutably borrow the downstream handler.
    pub fn delegate_mut(&mut self) -> &mut H { &mut self.delegate }

    /// Consume the assembler, returning the downstream handler.
    #[must_use]
    pub fn into_delegate(self) -> H { self.delegate }
}
