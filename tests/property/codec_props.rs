//! Position codec property tests.
//!
//! - decode(encode(xs)) == xs for any ascending 14-bit list
//! - every position costs 1 to 3 bytes
//! - counting terminal bytes equals the decoded length
//! - arbitrary bytes never panic the decoder

use proptest::prelude::*;
use proxrank::binary::{
    count_positions, decode_positions, encode_positions_to_vec, PositionDecoder,
    MAX_POSITION_BYTES,
};
use proxrank::{Position, WeightLevel, MAX_POSITION_OFFSET};

// ============================================================================
// STRATEGIES
// ============================================================================

fn level() -> impl Strategy<Value = WeightLevel> {
    (0u8..4).prop_map(WeightLevel::from_bits)
}

/// Ascending positions (ties allowed) within the 14-bit field.
fn position_list() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::vec((0..=MAX_POSITION_OFFSET, level()), 0..64).prop_map(|mut raw| {
        raw.sort_by_key(|&(offset, _)| offset);
        raw.into_iter()
            .map(|(offset, weight)| Position { offset, weight })
            .collect()
    })
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_round_trip(list in position_list()) {
        let bytes = encode_positions_to_vec(&list);
        prop_assert_eq!(decode_positions(&bytes).unwrap(), list);
    }

    #[test]
    fn prop_size_bounds(list in position_list()) {
        let bytes = encode_positions_to_vec(&list);
        prop_assert!(bytes.len() >= list.len());
        prop_assert!(bytes.len() <= list.len() * MAX_POSITION_BYTES);
    }

    #[test]
    fn prop_count_matches_decode(list in position_list()) {
        let bytes = encode_positions_to_vec(&list);
        prop_assert_eq!(count_positions(&bytes), list.len());
    }

    #[test]
    fn prop_terminal_bytes_have_high_bit_clear(list in position_list()) {
        let bytes = encode_positions_to_vec(&list);
        if let Some(last) = bytes.last() {
            prop_assert_eq!(last & 0x80, 0);
        }
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut decoded = 0usize;
        for item in PositionDecoder::new(&bytes) {
            match item {
                Ok(pos) => {
                    prop_assert!(pos.offset <= MAX_POSITION_OFFSET);
                    decoded += 1;
                }
                Err(_) => break,
            }
        }
        prop_assert!(decoded <= bytes.len());
    }
}
