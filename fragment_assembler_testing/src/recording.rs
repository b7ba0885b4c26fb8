//! Downstream handler that records what the assembler forwards.

use bytes::Bytes;
use fragment_assembler::{
    AssemblyError,
    DataHeader,
    Fragment,
    FragmentAssembler,
    FragmentHandler,
    Header,
};
use rstest::fixture;

/// Copy of one downstream call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedMessage {
    /// Bytes of `buffer[offset..offset + length]`.
    pub payload: Bytes,
    /// Offset passed to the handler.
    pub offset: usize,
    /// Length passed to the handler.
    pub length: usize,
    /// Snapshot of the header passed to the handler.
    pub header: DataHeader,
    /// Address of the buffer the handler was lent.
    pub buffer_addr: usize,
}

/// [`FragmentHandler`] that keeps a copy of every message it receives.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    messages: Vec<RecordedMessage>,
}

impl RecordingHandler {
    /// Messages received so far, in arrival order.
    pub fn messages(&self) -> &[RecordedMessage] { &self.messages }

    /// Payloads received so far, in arrival order.
    pub fn payloads(&self) -> Vec<&[u8]> {
        self.messages.iter().map(|m| m.payload.as_ref()).collect()
    }

    /// Remove and return the recorded messages.
    pub fn take(&mut self) -> Vec<RecordedMessage> { std::mem::take(&mut self.messages) }
}

impl FragmentHandler for RecordingHandler {
    fn on_fragment(&mut self, buffer: &[u8], offset: usize, length: usize, header: &dyn Header) {
        self.messages.push(RecordedMessage {
            payload: Bytes::copy_from_slice(&buffer[offset..offset + length]),
            offset,
            length,
            header: DataHeader::snapshot(header),
            buffer_addr: buffer.as_ptr() as usize,
        });
    }
}

/// Feed every fragment to `assembler` in order.
///
/// # Errors
///
/// Returns the first [`AssemblyError`] raised by the assembler.
pub fn deliver_all<H: FragmentHandler>(
    assembler: &mut FragmentAssembler<H>,
    fragments: &[Fragment],
) -> Result<(), AssemblyError> {
    for fragment in fragments {
        let payload = fragment.payload();
        assembler.on_fragment(payload, 0, payload.len(), fragment.header())?;
    }
    Ok(())
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn recorder() -> RecordingHandler { RecordingHandler::default() }
