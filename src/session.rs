use derive_more::{Display, From, Into};

/// Identifier of the sending session that published a fragment.
///
/// Fragments from different sessions are reassembled independently.
///
/// # Examples
///
/// ```
/// use fragment_assembler::SessionId;
/// let id = SessionId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct SessionId(i32);

impl SessionId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> i32 { self.0 }
}
