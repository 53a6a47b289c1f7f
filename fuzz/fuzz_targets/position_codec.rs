// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the position payload codec.
//!
//! Payloads come back from an external index as opaque bytes. Decoding them
//! must return an error on garbage, never panic, and anything that decodes
//! must survive a re-encode unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxrank::binary::{
    count_positions, decode_positions, encode_positions_to_vec, PositionDecoder,
    MAX_POSITION_BYTES,
};
use proxrank::MAX_POSITION_OFFSET;

fuzz_target!(|data: &[u8]| {
    // The lazy decoder never yields past a corruption.
    let mut yielded = 0usize;
    for item in PositionDecoder::new(data) {
        match item {
            Ok(pos) => {
                assert!(pos.offset <= MAX_POSITION_OFFSET, "offset {} out of range", pos.offset);
                yielded += 1;
            }
            Err(_) => break,
        }
    }
    assert!(yielded <= data.len());

    let Ok(positions) = decode_positions(data) else {
        return;
    };
    assert_eq!(positions.len(), yielded);

    // Offsets accumulate, so a clean decode is always ascending.
    assert!(positions.windows(2).all(|w| w[0].offset <= w[1].offset));

    let reencoded = encode_positions_to_vec(&positions);
    assert!(reencoded.len() <= positions.len() * MAX_POSITION_BYTES);
    assert_eq!(count_positions(&reencoded), positions.len());

    let redecoded = decode_positions(&reencoded).expect("re-encoded payload must decode");
    assert_eq!(positions, redecoded, "round trip changed the positions");
});
