use super::{HEADER_LENGTH, Header};
use crate::{FrameFlags, SessionId};

/// Owned description of a single data frame.
///
/// Transports that already hold the frame metadata in another form can
/// implement [`Header`] directly; this type covers everything else and backs
/// the snapshots taken by [`AssemblyHeader`](super::AssemblyHeader).
///
/// # Examples
///
/// ```
/// use fragment_assembler::{DataHeader, FrameFlags, Header, SessionId};
/// let header = DataHeader::new(SessionId::new(3), FrameFlags::BEGIN)
///     .with_frame_length(132)
///     .with_term_offset(256);
/// assert!(header.flags().is_begin());
/// assert_eq!(header.payload_length(), 100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataHeader {
    frame_length: usize,
    flags: FrameFlags,
    term_offset: i64,
    session_id: SessionId,
    stream_id: i32,
    term_id: i32,
    initial_term_id: i32,
    position_bits_shift: u8,
}

impl DataHeader {
    /// Create a header for an empty frame at the start of the initial term.
    #[must_use]
    pub const fn new(session_id: SessionId, flags: FrameFlags) -> Self {
        Self {
            frame_length: HEADER_LENGTH,
            flags,
            term_offset: 0,
            session_id,
            stream_id: 0,
            term_id: 0,
            initial_term_id: 0,
            position_bits_shift: 16,
        }
    }

    /// Copy every field out of another header implementation.
    #[must_use]
    pub fn snapshot(header: &dyn Header) -> Self {
        Self {
            frame_length: header.frame_length(),
            flags: header.flags(),
            term_offset: header.term_offset(),
            session_id: header.session_id(),
            stream_id: header.stream_id(),
            term_id: header.term_id(),
            initial_term_id: header.initial_term_id(),
            position_bits_shift: header.position_bits_shift(),
        }
    }

    /// Set the frame length, header included.
    #[must_use]
    pub const fn with_frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    /// Set the frame length from a payload length.
    #[must_use]
    pub const fn with_payload_length(self, payload_length: usize) -> Self {
        self.with_frame_length(payload_length + HEADER_LENGTH)
    }

    /// Set the frame flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: FrameFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the offset of the frame within its term.
    #[must_use]
    pub const fn with_term_offset(mut self, term_offset: i64) -> Self {
        self.term_offset = term_offset;
        self
    }

    /// Set the stream identifier.
    #[must_use]
    pub const fn with_stream_id(mut self, stream_id: i32) -> Self {
        self.stream_id = stream_id;
        self
    }

    /// Set the active and initial term identifiers.
    #[must_use]
    pub const fn with_terms(mut self, term_id: i32, initial_term_id: i32) -> Self {
        self.term_id = term_id;
        self.initial_term_id = initial_term_id;
        self
    }

    /// Set the position bits shift derived from the term length.
    #[must_use]
    pub const fn with_position_bits_shift(mut self, position_bits_shift: u8) -> Self {
        self.position_bits_shift = position_bits_shift;
        self
    }

    /// Length of the payload carried after the fixed header.
    #[must_use]
    pub const fn payload_length(&self) -> usize { self.frame_length.saturating_sub(HEADER_LENGTH) }
}

impl Header for DataHeader {
    fn frame_length(&self) -> usize { self.frame_length }

    fn flags(&self) -> FrameFlags { self.flags }

    fn term_offset(&self) -> i64 { self.term_offset }

    fn session_id(&self) -> SessionId { self.session_id }

    fn stream_id(&self) -> i32 { self.stream_id }

    fn term_id(&self) -> i32 { self.term_id }

    fn initial_term_id(&self) -> i32 { self.initial_term_id }

    fn position_bits_shift(&self) -> u8 { self.position_bits_shift }
}
