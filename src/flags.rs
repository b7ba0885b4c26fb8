//! Frame flag bitset carried by every data fragment.
//!
//! The sender marks the first fragment of a message with [`FrameFlags::BEGIN`]
//! and the last with [`FrameFlags::END`]. A message that fits in a single
//! fragment carries both, which is spelled [`FrameFlags::UNFRAGMENTED`].

use std::ops::{BitAnd, BitOr, BitOrAssign};

use derive_more::{From, Into};

/// Bitset of per-fragment flags.
///
/// # Examples
///
/// ```
/// use fragment_assembler::FrameFlags;
/// let flags = FrameFlags::BEGIN | FrameFlags::END;
/// assert!(flags.is_unfragmented());
/// assert_eq!(flags, FrameFlags::UNFRAGMENTED);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, From, Into)]
pub struct FrameFlags(u8);

impl FrameFlags {
    /// No flags set: a continuation fragment in the middle of a message.
    pub const NONE: Self = Self(0x00);
    /// First fragment of a message.
    pub const BEGIN: Self = Self(0x80);
    /// Last fragment of a message.
    pub const END: Self = Self(0x40);
    /// Whole message carried by a single fragment.
    pub const UNFRAGMENTED: Self = Self(Self::BEGIN.0 | Self::END.0);
    /// Sender signalled the end of its stream.
    pub const END_OF_STREAM: Self = Self(0x20);

    /// Wrap a raw flags byte.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self { Self(bits) }

    /// Return the raw flags byte.
    #[must_use]
    pub const fn bits(self) -> u8 { self.0 }

    /// Report whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    /// Report whether the fragment opens a message.
    #[must_use]
    pub const fn is_begin(self) -> bool { self.contains(Self::BEGIN) }

    /// Report whether the fragment closes a message.
    #[must_use]
    pub const fn is_end(self) -> bool { self.contains(Self::END) }

    /// Report whether the fragment carries a whole message.
    #[must_use]
    pub const fn is_unfragmented(self) -> bool { self.contains(Self::UNFRAGMENTED) }
}

impl BitOr for FrameFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output { Self(self.0 | rhs.0) }
}

impl BitOrAssign for FrameFlags {
    fn bitor_assign(&mut self, rhs: Self) { self.0 |= rhs.0; }
}

impl BitAnd for FrameFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output { Self(self.0 & rhs.0) }
}

impl std::fmt::Display for FrameFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::FrameFlags;

    #[rstest]
    #[case(FrameFlags::BEGIN, true, false, false)]
    #[case(FrameFlags::END, false, true, false)]
    #[case(FrameFlags::NONE, false, false, false)]
    #[case(FrameFlags::UNFRAGMENTED, true, true, true)]
    #[case(FrameFlags::UNFRAGMENTED | FrameFlags::END_OF_STREAM, true, true, true)]
    #[case(FrameFlags::BEGIN | FrameFlags::END_OF_STREAM, true, false, false)]
    fn predicates_follow_bits(
        #[case] flags: FrameFlags,
        #[case] begin: bool,
        #[case] end: bool,
        #[case] unfragmented: bool,
    ) {
        assert_eq!(flags.is_begin(), begin);
        assert_eq!(flags.is_end(), end);
        assert_eq!(flags.is_unfragmented(), unfragmented);
    }

    #[test]
    fn unfragmented_is_begin_or_end() {
        assert_eq!(FrameFlags::UNFRAGMENTED.bits(), 0xC0);
        assert_eq!(FrameFlags::BEGIN | FrameFlags::END, FrameFlags::UNFRAGMENTED);
        assert_eq!(FrameFlags::UNFRAGMENTED & FrameFlags::END, FrameFlags::END);
    }

    #[test]
    fn display_renders_hex() {
        assert_eq!(FrameFlags::BEGIN.to_string(), "0x80");
        assert_eq!(FrameFlags::from(0x20_u8).to_string(), "0x20");
    }
}
