//! Demo binary for `fragment_assembler`.
//!
//! Fragments synthetic messages for a number of sessions, interleaves the
//! fragments round-robin across sessions and reports what the assembler
//! delivered.

mod cli;

use std::{error::Error, num::NonZeroUsize};

use clap::Parser;
use fragment_assembler::{
    AssemblerConfig,
    Fragment,
    FragmentAssembler,
    Fragmenter,
    Header,
    SessionId,
};
use tracing::info;

fn pattern(session_id: SessionId, message: usize, length: usize) -> Vec<u8> {
    (0..length)
        .map(|i| {
            i.wrapping_add(message).wrapping_mul(31).to_le_bytes()[0]
                ^ session_id.get().to_le_bytes()[0]
        })
        .collect()
}

fn interleave(per_session: Vec<Vec<Fragment>>) -> Vec<Fragment> {
    let mut queues: Vec<_> = per_session.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::new();
    loop {
        let before = out.len();
        out.extend(queues.iter_mut().filter_map(Iterator::next));
        if out.len() == before {
            return out;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Enable structured logging for the demo.
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let max_payload = NonZeroUsize::new(cli.max_payload).ok_or("max payload must be non-zero")?;
    let config = AssemblerConfig::with_initial_capacity(cli.initial_capacity);
    config.validate()?;

    let mut fragmenters: Vec<_> = (0..cli.sessions)
        .map(|session| {
            Fragmenter::new(max_payload)
                .with_session(SessionId::new(i32::from(session) + 1))
                .with_stream_id(10)
        })
        .collect();

    let mut delivered = 0_usize;
    let mut corrupted = 0_usize;
    let mut received_bytes = 0_usize;
    let mut counts = vec![0_usize; usize::from(cli.sessions) + 1];
    let mut assembler = FragmentAssembler::with_config(
        |buffer: &[u8], offset: usize, length: usize, header: &dyn Header| {
            let session_id = header.session_id();
            let slot = usize::try_from(session_id.get()).unwrap_or_default();
            let message = counts.get(slot).copied().unwrap_or_default();
            if buffer[offset..offset + length] != pattern(session_id, message, length)[..] {
                corrupted += 1;
            }
            if let Some(count) = counts.get_mut(slot) {
                *count += 1;
            }
            delivered += 1;
            received_bytes += length;
        },
        config,
    );

    let mut fragments_sent = 0_usize;
    for message in 0..cli.messages {
        let per_session: Vec<_> = fragmenters
            .iter_mut()
            .map(|fragmenter| {
                let payload = pattern(fragmenter.session_id(), message, cli.message_length);
                fragmenter.fragment(&payload)
            })
            .collect();
        for fragment in interleave(per_session) {
            let payload = fragment.payload();
            assembler.on_fragment(payload, 0, payload.len(), fragment.header())?;
            fragments_sent += 1;
        }
    }

    let dropped = assembler.dropped_fragments();
    drop(assembler);
    info!(
        fragments_sent,
        delivered, received_bytes, corrupted, dropped, "reassembly complete"
    );
    println!(
        "{delivered} messages ({received_bytes} bytes) reassembled from {fragments_sent} \
         fragments; {corrupted} corrupted, {dropped} dropped"
    );

    if corrupted > 0 {
        return Err(format!("{corrupted} messages did not match what was sent").into());
    }
    Ok(())
}
