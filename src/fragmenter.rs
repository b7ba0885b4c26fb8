//! Sender-side helper that splits messages into term-laid-out fragments.
//!
//! [`Fragmenter`] mirrors what a publisher does before handing frames to the
//! transport: it chunks a payload into pieces no larger than the configured
//! limit, flags the first and last pieces, and assigns each frame a term
//! offset aligned to [`FRAME_ALIGNMENT`]. It exists so that tests and the
//! demo binary can produce realistic fragment streams for the assembler.

use std::num::NonZeroUsize;

use crate::{
    DataHeader,
    FrameFlags,
    SessionId,
    header::{FRAME_ALIGNMENT, HEADER_LENGTH, align},
};

/// Default `position_bits_shift`, matching a 64 KiB term.
const DEFAULT_POSITION_BITS_SHIFT: u8 = 16;

/// A single outbound frame: its header and owned payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    header: DataHeader,
    payload: Vec<u8>,
}

impl Fragment {
    /// Header describing this frame.
    #[must_use]
    pub const fn header(&self) -> &DataHeader { &self.header }

    /// Payload bytes carried by this frame.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the fragment, returning its header and payload.
    #[must_use]
    pub fn into_parts(self) -> (DataHeader, Vec<u8>) { (self.header, self.payload) }
}

/// Splits payloads into fragments for a single session and stream.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use fragment_assembler::{Fragmenter, Header, SessionId};
///
/// let mut fragmenter =
///     Fragmenter::new(NonZeroUsize::new(4).expect("non-zero")).with_session(SessionId::new(9));
/// let fragments = fragmenter.fragment(b"0123456789");
/// assert_eq!(fragments.len(), 3);
/// assert!(fragments[0].header().flags().is_begin());
/// assert!(fragments[2].header().flags().is_end());
/// ```
#[derive(Clone, Debug)]
pub struct Fragmenter {
    max_payload_length: NonZeroUsize,
    session_id: SessionId,
    stream_id: i32,
    initial_term_id: i32,
    term_id: i32,
    term_offset: i64,
    position_bits_shift: u8,
}

impl Fragmenter {
    /// Create a fragmenter that caps each fragment at `max_payload_length`
    /// payload bytes.
    #[must_use]
    pub const fn new(max_payload_length: NonZeroUsize) -> Self {
        Self {
            max_payload_length,
            session_id: SessionId::new(0),
            stream_id: 0,
            initial_term_id: 0,
            term_id: 0,
            term_offset: 0,
            position_bits_shift: DEFAULT_POSITION_BITS_SHIFT,
        }
    }

    /// Tag fragments with `session_id`.
    #[must_use]
    pub const fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = session_id;
        self
    }

    /// Tag fragments with `stream_id`.
    #[must_use]
    pub const fn with_stream_id(mut self, stream_id: i32) -> Self {
        self.stream_id = stream_id;
        self
    }

    /// Start the stream at `initial_term_id`.
    #[must_use]
    pub const fn with_initial_term_id(mut self, initial_term_id: i32) -> Self {
        self.initial_term_id = initial_term_id;
        self.term_id = initial_term_id;
        self
    }

    /// Use terms of `1 << position_bits_shift` bytes. Shifts too large to
    /// represent a term length leave every frame in the first term.
    #[must_use]
    pub const fn with_position_bits_shift(mut self, position_bits_shift: u8) -> Self {
        self.position_bits_shift = position_bits_shift;
        self
    }

    /// Maximum payload bytes per fragment.
    #[must_use]
    pub const fn max_payload_length(&self) -> NonZeroUsize { self.max_payload_length }

    /// Session the fragments are tagged with.
    #[must_use]
    pub const fn session_id(&self) -> SessionId { self.session_id }

    /// Split `payload` into fragments, advancing the term position.
    ///
    /// A payload that fits in one fragment, including an empty one, yields a
    /// single unfragmented frame. A frame that would cross the end of the
    /// current term starts the next term instead.
    #[must_use]
    pub fn fragment(&mut self, payload: &[u8]) -> Vec<Fragment> {
        let max = self.max_payload_length.get();
        if payload.len() <= max {
            return vec![self.frame(FrameFlags::UNFRAGMENTED, payload)];
        }

        let mut chunks = payload.chunks(max).peekable();
        let mut fragments = Vec::with_capacity(payload.len().div_ceil(max));
        let mut flags = FrameFlags::BEGIN;
        while let Some(chunk) = chunks.next() {
            if chunks.peek().is_none() {
                flags = FrameFlags::END;
            }
            fragments.push(self.frame(flags, chunk));
            flags = FrameFlags::NONE;
        }
        fragments
    }

    fn frame(&mut self, flags: FrameFlags, chunk: &[u8]) -> Fragment {
        let frame_length = chunk.len() + HEADER_LENGTH;
        let aligned = align(
            i64::try_from(frame_length).unwrap_or(i64::MAX),
            FRAME_ALIGNMENT,
        );
        let term_length = 1_i64
            .checked_shl(u32::from(self.position_bits_shift))
            .filter(|length| *length > 0)
            .unwrap_or(i64::MAX);
        if self.term_offset > 0 && self.term_offset.saturating_add(aligned) > term_length {
            self.term_id = self.term_id.wrapping_add(1);
            self.term_offset = 0;
        }

        let header = DataHeader::new(self.session_id, flags)
            .with_frame_length(frame_length)
            .with_term_offset(self.term_offset)
            .with_stream_id(self.stream_id)
            .with_terms(self.term_id, self.initial_term_id)
            .with_position_bits_shift(self.position_bits_shift);
        self.term_offset += aligned;

        Fragment {
            header,
            payload: chunk.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rstest::rstest;

    use super::Fragmenter;
    use crate::{FrameFlags, Header, SessionId};

    fn fragmenter(max: usize) -> Fragmenter {
        Fragmenter::new(NonZeroUsize::new(max).expect("non-zero")).with_session(SessionId::new(3))
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(8)]
    fn small_payload_is_unfragmented(#[case] length: usize) {
        let fragments = fragmenter(8).fragment(&vec![1; length]);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].header().flags(), FrameFlags::UNFRAGMENTED);
        assert_eq!(fragments[0].payload().len(), length);
    }

    #[test]
    fn large_payload_is_flagged_begin_middle_end() {
        let payload: Vec<u8> = (0..20).collect();
        let fragments = fragmenter(8).fragment(&payload);

        let flags: Vec<_> = fragments.iter().map(|f| f.header().flags()).collect();
        assert_eq!(
            flags,
            vec![FrameFlags::BEGIN, FrameFlags::NONE, FrameFlags::END]
        );
        let joined: Vec<u8> = fragments
            .iter()
            .flat_map(|f| f.payload().to_vec())
            .collect();
        assert_eq!(joined, payload);
        assert!(fragments.iter().all(|f| f.header().session_id() == SessionId::new(3)));
    }

    #[test]
    fn term_offsets_advance_by_aligned_frame_length() {
        let fragments = fragmenter(100).fragment(&[0; 250]);
        let offsets: Vec<_> = fragments.iter().map(|f| f.header().term_offset()).collect();
        // Frames of 132, 132 and 82 bytes align to 160, 160 and 96.
        assert_eq!(offsets, vec![0, 160, 320]);
        assert_eq!(fragments[2].header().frame_length(), 82);
    }

    #[test]
    fn frames_roll_into_next_term() {
        let mut fragmenter = fragmenter(64)
            .with_position_bits_shift(7)
            .with_initial_term_id(5);
        let fragments = fragmenter.fragment(&[0; 160]);

        let terms: Vec<_> = fragments
            .iter()
            .map(|f| (f.header().term_id(), f.header().term_offset()))
            .collect();
        assert_eq!(terms, vec![(5, 0), (6, 0), (7, 0)]);
        assert_eq!(fragments[2].header().initial_term_id(), 5);
    }

    #[test]
    fn oversized_shift_keeps_frames_in_one_term() {
        let mut fragmenter = fragmenter(64)
            .with_position_bits_shift(64)
            .with_initial_term_id(5);
        let fragments = fragmenter.fragment(&[0; 160]);

        let terms: Vec<_> = fragments
            .iter()
            .map(|f| (f.header().term_id(), f.header().term_offset()))
            .collect();
        assert_eq!(terms, vec![(5, 0), (5, 96), (5, 192)]);
    }
}
