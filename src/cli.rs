//! Command line interface for the `fragment-assembler` demo binary.
//!
//! The binary fragments synthetic messages for several sessions, interleaves
//! the fragments and feeds them through a
//! [`FragmentAssembler`](fragment_assembler::FragmentAssembler).

use clap::Parser;

/// Command line arguments for the `fragment-assembler` binary.
#[derive(Debug, Parser)]
#[command(
    name = "fragment-assembler",
    version,
    about = "Fragment and reassemble synthetic messages"
)]
pub struct Cli {
    /// Length in bytes of each message.
    #[arg(short = 'l', long, default_value_t = 10_000)]
    pub message_length: usize,
    /// Largest payload carried by one fragment.
    #[arg(short = 'p', long, default_value_t = 1376)]
    pub max_payload: usize,
    /// Number of sending sessions whose fragments are interleaved.
    #[arg(short, long, default_value_t = 2)]
    pub sessions: u16,
    /// Messages sent by each session.
    #[arg(short, long, default_value_t = 10)]
    pub messages: usize,
    /// Initial capacity of each session's reassembly buffer.
    #[arg(long, default_value_t = 4096)]
    pub initial_capacity: usize,
}
