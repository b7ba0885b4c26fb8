use super::{DataHeader, HEADER_LENGTH, Header};
use crate::{FrameFlags, SessionId};

/// Header presented to downstream handlers for a reassembled message.
///
/// The composed header is derived from the terminal fragment. It reports
/// [`FrameFlags::UNFRAGMENTED`] alongside whatever other flags the terminal
/// fragment carried, a frame length covering the whole message, and a term
/// offset moved back to where the first fragment began. The stream position
/// therefore matches the end of the terminal fragment.
///
/// # Examples
///
/// ```
/// use fragment_assembler::{AssemblyHeader, DataHeader, FrameFlags, Header, SessionId};
/// let terminal = DataHeader::new(SessionId::new(1), FrameFlags::END)
///     .with_payload_length(50)
///     .with_term_offset(288);
/// let composed = AssemblyHeader::compose(&terminal, 250);
/// assert!(composed.flags().is_unfragmented());
/// assert_eq!(composed.frame_length(), 282);
/// assert_eq!(composed.term_offset(), 88);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssemblyHeader {
    terminal: DataHeader,
    frame_length: usize,
}

impl AssemblyHeader {
    /// Compose the header for a message of `message_length` bytes completed
    /// by the fragment described by `terminal`.
    #[must_use]
    pub fn compose(terminal: &dyn Header, message_length: usize) -> Self {
        Self {
            terminal: DataHeader::snapshot(terminal),
            frame_length: message_length.saturating_add(HEADER_LENGTH),
        }
    }

    /// Frame length reported by the terminal fragment itself.
    #[must_use]
    pub fn terminal_frame_length(&self) -> usize { self.terminal.frame_length() }

    /// Header of the terminal fragment as received.
    #[must_use]
    pub const fn terminal(&self) -> &DataHeader { &self.terminal }
}

impl Header for AssemblyHeader {
    fn frame_length(&self) -> usize { self.frame_length }

    fn flags(&self) -> FrameFlags { self.terminal.flags() | FrameFlags::UNFRAGMENTED }

    fn term_offset(&self) -> i64 {
        let composed = i64::try_from(self.frame_length).unwrap_or(i64::MAX);
        let raw = i64::try_from(self.terminal.frame_length()).unwrap_or(i64::MAX);
        self.terminal.term_offset() - (composed - raw)
    }

    fn session_id(&self) -> SessionId { self.terminal.session_id() }

    fn stream_id(&self) -> i32 { self.terminal.stream_id() }

    fn term_id(&self) -> i32 { self.terminal.term_id() }

    fn initial_term_id(&self) -> i32 { self.terminal.initial_term_id() }

    fn position_bits_shift(&self) -> u8 { self.terminal.position_bits_shift() }
}
