//! Metric helpers for `fragment_assembler`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking fragments received, labelled by kind.
pub const FRAGMENTS_RECEIVED: &str = "fragment_assembler_fragments_total";
/// Name of the counter tracking messages completed by reassembly.
pub const MESSAGES_ASSEMBLED: &str = "fragment_assembler_messages_assembled_total";
/// Name of the counter tracking fragments dropped for lack of an assembly.
pub const FRAGMENTS_DROPPED: &str = "fragment_assembler_dropped_fragments_total";

/// Position of a fragment within its message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    /// Whole message in one fragment.
    Unfragmented,
    /// First fragment of a larger message.
    Begin,
    /// Fragment between the first and the last.
    Middle,
    /// Last fragment of a larger message.
    End,
}

impl FragmentKind {
    /// Label value recorded for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FragmentKind::Unfragmented => "unfragmented",
            FragmentKind::Begin => "begin",
            FragmentKind::Middle => "middle",
            FragmentKind::End => "end",
        }
    }
}

/// Record a received fragment of the given kind.
pub fn inc_fragments(kind: FragmentKind) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_RECEIVED, "kind" => kind.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}

/// Record a message completed by reassembly.
pub fn inc_assembled() {
    #[cfg(feature = "metrics")]
    counter!(MESSAGES_ASSEMBLED).increment(1);
}

/// Record a fragment dropped because its session had no assembly in
/// progress.
pub fn inc_dropped() {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_DROPPED).increment(1);
}
