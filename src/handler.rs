//! Downstream capability that receives whole messages.

use crate::Header;

/// Consumer of whole messages forwarded by the assembler.
///
/// The handler borrows `buffer` and `header` for the duration of the call
/// only: the buffer is either the transport's receive buffer or the session's
/// reassembly storage, and both are reused once the call returns. Copy out
/// anything that must outlive it.
///
/// Any `FnMut(&[u8], usize, usize, &dyn Header)` closure is a handler.
///
/// # Examples
///
/// ```
/// use fragment_assembler::{FragmentHandler, Header};
///
/// struct Counter(usize);
///
/// impl FragmentHandler for Counter {
///     fn on_fragment(&mut self, _buffer: &[u8], _offset: usize, length: usize, _header: &dyn Header) {
///         self.0 += length;
///     }
/// }
/// ```
pub trait FragmentHandler {
    /// Handle the message occupying `buffer[offset..offset + length]`.
    fn on_fragment(&mut self, buffer: &[u8], offset: usize, length: usize, header: &dyn Header);
}

impl<F> FragmentHandler for F
where
    F: FnMut(&[u8], usize, usize, &dyn Header),
{
    fn on_fragment(&mut self, buffer: &[u8], offset: usize, length: usize, header: &dyn Header) {
        self(buffer, offset, length, header);
    }
}
