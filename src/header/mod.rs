//! Fragment metadata consumed and produced by the assembler.
//!
//! The transport describes each fragment through the [`Header`] accessor
//! trait. [`DataHeader`] is the plain value implementation used by transports
//! and tests, while [`AssemblyHeader`] is synthesized for every reassembled
//! message so that downstream handlers see it as a single unfragmented frame
//! positioned where its first fragment began.

use crate::{FrameFlags, SessionId};

/// Length in bytes of the fixed data frame header that precedes each payload.
pub const HEADER_LENGTH: usize = 32;

/// Alignment applied to frames laid out within a term.
pub const FRAME_ALIGNMENT: usize = 32;

/// Read access to the metadata of a received fragment.
///
/// All accessors describe the frame as it sits in the sender's term: the
/// frame length includes [`HEADER_LENGTH`] and the term offset locates the
/// start of that header.
pub trait Header {
    /// Length of the frame including its header.
    fn frame_length(&self) -> usize;

    /// Begin/end markers and any other frame flags.
    fn flags(&self) -> FrameFlags;

    /// Offset of the frame header within its term.
    fn term_offset(&self) -> i64;

    /// Session that published the frame.
    fn session_id(&self) -> SessionId;

    /// Stream the frame belongs to.
    fn stream_id(&self) -> i32;

    /// Term the frame was written in.
    fn term_id(&self) -> i32;

    /// Term identifier the stream started from.
    fn initial_term_id(&self) -> i32;

    /// Number of bits to shift a term count by to obtain a stream position.
    fn position_bits_shift(&self) -> u8;

    /// Stream position just past the end of this frame.
    fn position(&self) -> i64 {
        let aligned = align(
            self.term_offset()
                .saturating_add(i64::try_from(self.frame_length()).unwrap_or(i64::MAX)),
            FRAME_ALIGNMENT,
        );
        compute_position(
            self.term_id(),
            aligned,
            self.position_bits_shift(),
            self.initial_term_id(),
        )
    }
}

/// Compute a stream position from term coordinates.
///
/// Term identifiers wrap, so the term count is taken with wrapping
/// subtraction before widening. Transports use shifts of 16 to 30; larger
/// shifts, or offsets that would overflow, saturate instead of panicking.
///
/// # Examples
///
/// ```
/// use fragment_assembler::header::compute_position;
/// assert_eq!(compute_position(7, 64, 16, 5), (2 << 16) + 64);
/// ```
#[must_use]
pub fn compute_position(
    term_id: i32,
    term_offset: i64,
    position_bits_shift: u8,
    initial_term_id: i32,
) -> i64 {
    let term_count = i64::from(term_id.wrapping_sub(initial_term_id));
    let term_base = match term_count.checked_shl(u32::from(position_bits_shift)) {
        Some(base) if base >> position_bits_shift == term_count => base,
        _ if term_count == 0 => 0,
        _ if term_count < 0 => i64::MIN,
        _ => i64::MAX,
    };
    term_base.saturating_add(term_offset)
}

/// Round `value` up to the next multiple of `alignment`, which must be a
/// power of two.
#[must_use]
pub fn align(value: i64, alignment: usize) -> i64 {
    let mask = i64::try_from(alignment).map_or(0, |a| a - 1);
    (value + mask) & !mask
}

mod assembly;
mod data;

pub use assembly::AssemblyHeader;
pub use data::DataHeader;
