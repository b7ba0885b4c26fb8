//! End-to-end tests feeding fragmenter output through the assembler.

use std::num::NonZeroUsize;

use fragment_assembler::{
    Fragment,
    FragmentAssembler,
    Fragmenter,
    FrameFlags,
    HEADER_LENGTH,
    Header,
    SessionId,
};
use fragment_assembler_testing::{RecordingHandler, deliver_all, recorder};
use rstest::rstest;

fn fragmenter(session: i32, max_payload: usize) -> Fragmenter {
    Fragmenter::new(NonZeroUsize::new(max_payload).expect("non-zero"))
        .with_session(SessionId::new(session))
        .with_stream_id(1001)
        .with_initial_term_id(-3)
}

fn payload(seed: u8, length: usize) -> Vec<u8> {
    (0..length)
        .map(|i| seed.wrapping_add(u8::try_from(i % 251).expect("fits in u8")))
        .collect()
}

#[rstest]
#[case(1, 1)]
#[case(100, 1)]
#[case(1408, 3)]
#[case(4096, 7)]
fn messages_survive_fragmentation(
    recorder: RecordingHandler,
    #[case] length: usize,
    #[case] max_payload: usize,
) {
    let mut assembler = FragmentAssembler::with_initial_capacity(recorder, 16);
    let message = payload(7, length);
    let fragments = fragmenter(11, max_payload).fragment(&message);

    deliver_all(&mut assembler, &fragments).expect("fragments accepted");

    let [delivered] = assembler.delegate().messages() else {
        panic!("expected one delivered message");
    };
    assert_eq!(delivered.payload.as_ref(), message.as_slice());
    assert_eq!(delivered.length, length);
    assert!(delivered.header.flags().is_unfragmented());
    assert_eq!(delivered.header.frame_length(), length + HEADER_LENGTH);
}

#[rstest]
fn unfragmented_delivery_borrows_transport_buffer(recorder: RecordingHandler) {
    let mut assembler = FragmentAssembler::new(recorder);
    let fragments = fragmenter(1, 64).fragment(b"small");
    let fragment = &fragments[0];

    deliver_all(&mut assembler, &fragments).expect("fragment accepted");

    let delivered = &assembler.delegate().messages()[0];
    assert_eq!(delivered.buffer_addr, fragment.payload().as_ptr() as usize);
    assert_eq!(&delivered.header, fragment.header());
}

#[rstest]
fn composed_position_matches_terminal_fragment(recorder: RecordingHandler) {
    let mut assembler = FragmentAssembler::new(recorder);
    let mut fragmenter = fragmenter(5, 100);
    let warmup = fragmenter.fragment(&payload(1, 40));
    let fragments = fragmenter.fragment(&payload(2, 250));
    let terminal = fragments.last().expect("fragments").header().position();

    deliver_all(&mut assembler, &warmup).expect("warmup accepted");
    deliver_all(&mut assembler, &fragments).expect("fragments accepted");

    let messages = assembler.delegate().messages();
    assert_eq!(messages.len(), 2);
    let composed = &messages[1].header;
    assert_eq!(composed.position(), terminal);
    assert_eq!(composed.stream_id(), 1001);
    assert_eq!(composed.initial_term_id(), -3);
}

fn round_robin(streams: &[Vec<Fragment>]) -> Vec<&Fragment> {
    let longest = streams.iter().map(Vec::len).max().unwrap_or_default();
    (0..longest)
        .flat_map(move |i| streams.iter().filter_map(move |s| s.get(i)))
        .collect()
}

#[rstest]
fn many_sessions_interleave_without_bleed(recorder: RecordingHandler) {
    let mut assembler = FragmentAssembler::with_initial_capacity(recorder, 32);
    let streams: Vec<Vec<Fragment>> = (1..=5)
        .map(|session| {
            let length = usize::try_from(session).expect("positive") * 97;
            let seed = u8::try_from(session).expect("small");
            fragmenter(session, 40).fragment(&payload(seed, length))
        })
        .collect();

    for fragment in round_robin(&streams) {
        let bytes = fragment.payload();
        assembler
            .on_fragment(bytes, 0, bytes.len(), fragment.header())
            .expect("fragment accepted");
    }

    let messages = assembler.delegate().messages();
    assert_eq!(messages.len(), 5);
    for message in messages {
        let session = message.header.session_id().get();
        let seed = u8::try_from(session).expect("small");
        let length = usize::try_from(session).expect("positive") * 97;
        assert_eq!(message.payload.as_ref(), payload(seed, length).as_slice());
    }
    assert_eq!(assembler.active_sessions(), 5);
    assert_eq!(assembler.dropped_fragments(), 0);
}

#[rstest]
fn lost_end_is_replaced_by_next_message(recorder: RecordingHandler) {
    let mut assembler = FragmentAssembler::new(recorder);
    let mut fragmenter = fragmenter(3, 10);
    let mut lost = fragmenter.fragment(&payload(1, 35));
    let end = lost.pop().expect("end fragment");
    assert!(end.header().flags().is_end());
    let next = fragmenter.fragment(&payload(9, 25));

    deliver_all(&mut assembler, &lost).expect("partial accepted");
    deliver_all(&mut assembler, &next).expect("next accepted");

    let delivered = assembler.delegate_mut().take();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].payload.as_ref(), payload(9, 25).as_slice());
    assert!(assembler.delegate().messages().is_empty());
}

#[rstest]
fn freeing_mid_message_drops_the_rest(recorder: RecordingHandler) {
    let mut assembler = FragmentAssembler::new(recorder);
    let fragments = fragmenter(4, 10).fragment(&payload(0, 30));

    deliver_all(&mut assembler, &fragments[..1]).expect("begin accepted");
    assert!(assembler.free_session_buffer(SessionId::new(4)));
    deliver_all(&mut assembler, &fragments[1..]).expect("rest accepted");

    assert!(assembler.delegate().messages().is_empty());
    assert_eq!(assembler.dropped_fragments(), 2);
    assert_eq!(assembler.active_sessions(), 0);
}

#[rstest]
fn end_of_stream_flag_survives_reassembly(recorder: RecordingHandler) {
    let mut assembler = FragmentAssembler::new(recorder);
    let mut fragments = fragmenter(6, 4).fragment(b"goodbye!");
    let last = fragments.pop().expect("end fragment");
    let (header, bytes) = last.into_parts();
    let header = header.with_flags(header.flags() | FrameFlags::END_OF_STREAM);

    deliver_all(&mut assembler, &fragments).expect("begin accepted");
    assembler
        .on_fragment(&bytes, 0, bytes.len(), &header)
        .expect("end accepted");

    let flags = assembler.delegate().messages()[0].header.flags();
    assert!(flags.is_unfragmented());
    assert!(flags.contains(FrameFlags::END_OF_STREAM));
}
