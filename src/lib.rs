#![doc(html_root_url = "https://docs.rs/fragment_assembler/latest")]
//! Public API for the `fragment_assembler` library.
//!
//! This crate reassembles messages that a segmented datagram transport split
//! into fragments. [`FragmentAssembler`] watches the fragment stream of each
//! sending session, stitches fragmented messages together in per-session
//! buffers and forwards only whole messages to a downstream
//! [`FragmentHandler`]. Messages that arrive in a single fragment are passed
//! through without copying.

pub mod assembler;
pub mod buffer;
pub mod config;
pub mod error;
pub mod flags;
pub mod fragmenter;
pub mod handler;
pub mod header;
pub mod metrics;
pub mod session;
pub mod table;

pub use assembler::FragmentAssembler;
pub use buffer::BufferBuilder;
pub use config::{AssemblerConfig, DEFAULT_INITIAL_BUFFER_CAPACITY, DEFAULT_MAX_BUFFER_CAPACITY};
pub use error::{AssemblyError, BufferError, ConfigError};
pub use flags::FrameFlags;
pub use fragmenter::{Fragment, Fragmenter};
pub use handler::FragmentHandler;
pub use header::{AssemblyHeader, DataHeader, FRAME_ALIGNMENT, HEADER_LENGTH, Header};
pub use crate::metrics::{FRAGMENTS_DROPPED, FRAGMENTS_RECEIVED, FragmentKind, MESSAGES_ASSEMBLED};
pub use session::SessionId;
pub use table::SessionTable;
