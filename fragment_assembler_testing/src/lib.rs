//! Utilities for exercising a
//! [`FragmentAssembler`](fragment_assembler::FragmentAssembler) in tests.
//!
//! [`RecordingHandler`] copies every message it is handed so tests can assert
//! on deliveries after the borrowed buffers are gone, and [`LoggerHandle`]
//! serialises access to captured log records.
//!
//! ```rust
//! use fragment_assembler::{FragmentAssembler, Fragmenter, SessionId};
//! use fragment_assembler_testing::{RecordingHandler, deliver_all};
//! use std::num::NonZeroUsize;
//!
//! let mut fragmenter = Fragmenter::new(NonZeroUsize::new(4).unwrap()).with_session(SessionId::new(1));
//! let mut assembler = FragmentAssembler::new(RecordingHandler::default());
//! deliver_all(&mut assembler, &fragmenter.fragment(b"hello world")).unwrap();
//! assert_eq!(assembler.delegate().payloads(), vec![&b"hello world"[..]]);
//! ```

pub mod logging;
pub mod recording;

pub use logging::{LoggerHandle, logger};
pub use recording::{RecordedMessage, RecordingHandler, deliver_all, recorder};
