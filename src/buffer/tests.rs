//! Tests for buffer growth, reset and compaction.

use std::num::NonZeroUsize;

use rstest::rstest;

use super::{BufferBuilder, grown_capacity};
use crate::BufferError;

#[rstest]
#[case(0, 10, 64)]
#[case(64, 65, 128)]
#[case(100, 1000, 1600)]
#[case(4096, 4097, 8192)]
fn growth_doubles_until_request_fits(
    #[case] current: usize,
    #[case] required: usize,
    #[case] expected: usize,
) {
    assert_eq!(grown_capacity(current, required, usize::MAX), expected);
}

#[test]
fn growth_is_bounded_by_ceiling() {
    assert_eq!(grown_capacity(64, 100, 100), 100);
}

#[test]
fn append_beyond_capacity_preserves_content() {
    let mut builder = BufferBuilder::new(8);
    let mut expected = Vec::new();
    for chunk in 0_u8..20 {
        let bytes = vec![chunk; usize::from(chunk) + 1];
        builder.append(&bytes).expect("append");
        expected.extend_from_slice(&bytes);
    }

    assert_eq!(builder.limit(), (1..=20).sum::<usize>());
    assert_eq!(builder.as_slice(), expected.as_slice());
    assert!(builder.capacity() >= builder.limit());
}

#[test]
fn reset_keeps_capacity_and_storage() {
    let mut builder = BufferBuilder::new(16);
    builder.append(&[1_u8; 200]).expect("append");
    let capacity = builder.capacity();
    let storage = builder.as_slice().as_ptr();

    builder.reset();
    assert_eq!(builder.limit(), 0);
    assert_eq!(builder.capacity(), capacity);

    builder.append(&[2_u8; 50]).expect("append");
    builder.append(&[3_u8; 50]).expect("append");
    assert_eq!(builder.limit(), 100);
    assert_eq!(builder.capacity(), capacity);
    assert_eq!(builder.as_slice().as_ptr(), storage);
    assert_eq!(&builder.as_slice()[..50], &[2_u8; 50]);
    assert_eq!(&builder.as_slice()[50..], &[3_u8; 50]);
}

#[test]
fn byte_at_a_time_growth_reallocates_logarithmically() {
    let mut builder = BufferBuilder::new(0);
    let mut growths = 0;
    let mut capacity = builder.capacity();
    for byte in 0..10_000_u32 {
        builder.append(&byte.to_le_bytes()[..1]).expect("append");
        if builder.capacity() != capacity {
            growths += 1;
            capacity = builder.capacity();
        }
    }
    assert_eq!(builder.limit(), 10_000);
    assert!(growths <= 10, "grew {growths} times");
}

#[test]
fn zero_initial_capacity_grows_on_first_append() {
    let mut builder = BufferBuilder::new(0);
    assert_eq!(builder.capacity(), 0);
    builder.append(b"abc").expect("append");
    assert_eq!(builder.as_slice(), b"abc");
}

#[test]
fn append_beyond_ceiling_is_rejected_without_losing_content() {
    let max = NonZeroUsize::new(8).expect("non-zero");
    let mut builder = BufferBuilder::with_max_capacity(4, max);
    builder.append(&[1, 2, 3, 4, 5]).expect("within ceiling");

    let err = builder
        .append(&[6, 7, 8, 9])
        .expect_err("growth past ceiling must fail");
    assert_eq!(
        err,
        BufferError::CapacityExceeded {
            required: 9,
            limit: max
        }
    );
    assert_eq!(builder.as_slice(), &[1, 2, 3, 4, 5]);
}

#[test]
fn append_exactly_to_ceiling_succeeds() {
    let max = NonZeroUsize::new(8).expect("non-zero");
    let mut builder = BufferBuilder::with_max_capacity(0, max);
    builder.append(&[0; 8]).expect("exactly at ceiling");
    assert_eq!(builder.limit(), 8);
}

#[test]
fn initial_capacity_is_clamped_to_ceiling() {
    let max = NonZeroUsize::new(8).expect("non-zero");
    let builder = BufferBuilder::with_max_capacity(1024, max);
    assert_eq!(builder.initial_capacity(), 8);
}

#[test]
fn compact_releases_excess_storage() {
    let mut builder = BufferBuilder::new(16);
    builder.append(&[0_u8; 4096]).expect("append");
    builder.reset();
    builder.compact();
    assert!(builder.capacity() < 4096);
    assert!(builder.capacity() >= 16);
}
