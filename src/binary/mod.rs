// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Compact wire form of a position list.
//!
//! The index framework stores one opaque byte string next to every indexed
//! lexeme. We put the lexeme's weighted positions there, so the distance
//! operator can rank a candidate before the full document is fetched.
//!
//! Positions are already sorted, so we store deltas. Deltas are small, so we
//! store them as little-endian 7-bit groups. The weight level rides in the
//! spare bits of the terminating byte, which means a position with a small
//! delta costs exactly one byte.
//!
//! # Payload Layout
//!
//! ```text
//! per position:
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │ 1 │ delta bits 0..7  │ ... │ 0 │ w w │ delta 5b   │
//! └──────────────────────┘     └──────────────────────┘
//!   continuation groups          terminating byte
//!   (while delta >= 32)          (bit 7 clear, bits 5-6 weight)
//! ```
//!
//! Counting positions never needs a decode: every position ends with
//! exactly one byte whose high bit is clear.

mod header;
mod positions;

pub use header::{
    CONTINUATION_BIT, GROUP_BITS, GROUP_MASK, MAX_POSITION_BYTES, TERMINAL_DELTA_LIMIT,
    TERMINAL_DELTA_MASK, WEIGHT_SHIFT,
};
pub use positions::{
    count_positions, decode_positions, encode_positions, encode_positions_to_vec,
    PositionDecoder,
};
