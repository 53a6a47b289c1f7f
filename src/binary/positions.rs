// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Position list encoding/decoding.
//!
//! Same idea as delta+varint postings, but tighter: the terminating byte only
//! has five delta bits because the other two carry the weight level. With
//! typical word spacing most positions fit in one byte.
//!
//! # References
//!
//! - **Varint (LEB128)**: little-endian base-128 groups with a continuation
//!   bit. See Google Protocol Buffers encoding:
//!   <https://protobuf.dev/programming-guides/encoding/>
//!
//! - **Delta Encoding for Postings**: Zobel & Moffat (2006): "Inverted Files
//!   for Text Search Engines", ACM Computing Surveys.

use std::io;

use super::header::{
    CONTINUATION_BIT, GROUP_BITS, GROUP_MASK, MAX_POSITION_BYTES, TERMINAL_DELTA_LIMIT,
    TERMINAL_DELTA_MASK, WEIGHT_SHIFT,
};
use crate::contracts::check_positions_ascending;
use crate::types::{Position, WeightLevel, MAX_POSITION_OFFSET};

// ============================================================================
// ENCODING
// ============================================================================

/// Append the payload for `positions` to `buf`.
///
/// Positions must already be ascending by offset; nothing is sorted here.
/// An empty list appends nothing.
pub fn encode_positions(positions: &[Position], buf: &mut Vec<u8>) {
    check_positions_ascending(positions);

    let mut prev = 0u16;
    for pos in positions {
        let mut delta = pos.offset.saturating_sub(prev);

        while delta >= TERMINAL_DELTA_LIMIT {
            buf.push((delta as u8 & GROUP_MASK) | CONTINUATION_BIT);
            delta >>= GROUP_BITS;
        }
        buf.push(delta as u8 | (pos.weight.bits() << WEIGHT_SHIFT));

        prev = pos.offset;
    }
}

/// Encode into a fresh buffer.
pub fn encode_positions_to_vec(positions: &[Position]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(positions.len());
    encode_positions(positions, &mut buf);
    buf
}

// ============================================================================
// DECODING
// ============================================================================

/// Lazy decoder: one position per `next()`, carrying the byte cursor and the
/// previous offset between calls.
///
/// Malformed input yields a single `Err` and then the iterator ends.
#[derive(Debug, Clone)]
pub struct PositionDecoder<'a> {
    bytes: &'a [u8],
    cursor: usize,
    prev: u16,
    failed: bool,
}

impl<'a> PositionDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        PositionDecoder {
            bytes,
            cursor: 0,
            prev: 0,
            failed: false,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    fn decode_next(&mut self) -> io::Result<Position> {
        let mut delta: u32 = 0;
        let mut shift: u32 = 0;

        for group in 0..MAX_POSITION_BYTES {
            let Some(&byte) = self.bytes.get(self.cursor) else {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "Truncated position payload",
                ));
            };
            self.cursor += 1;

            if byte & CONTINUATION_BIT != 0 {
                if group + 1 == MAX_POSITION_BYTES {
                    break;
                }
                delta |= u32::from(byte & GROUP_MASK) << shift;
                shift += GROUP_BITS;
                continue;
            }

            delta |= u32::from(byte & TERMINAL_DELTA_MASK) << shift;
            let offset = u32::from(self.prev) + delta;
            if offset > u32::from(MAX_POSITION_OFFSET) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Position offset {} exceeds 14-bit range", offset),
                ));
            }

            self.prev = offset as u16;
            return Ok(Position {
                offset: offset as u16,
                weight: WeightLevel::from_bits(byte >> WEIGHT_SHIFT),
            });
        }

        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Position delta exceeds maximum length (possible corruption)",
        ))
    }
}

impl Iterator for PositionDecoder<'_> {
    type Item = io::Result<Position>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.bytes.len() {
            return None;
        }
        let result = self.decode_next();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Decode a whole payload.
pub fn decode_positions(bytes: &[u8]) -> io::Result<Vec<Position>> {
    let mut out = Vec::with_capacity(count_positions(bytes));
    for pos in PositionDecoder::new(bytes) {
        out.push(pos?);
    }
    Ok(out)
}

/// Number of positions in a payload, without decoding it.
#[inline]
pub fn count_positions(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & CONTINUATION_BIT == 0).count()
}


// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================
//
// Run with: cargo kani
//
// Verified properties:
// 1. The decoder never panics for any short byte sequence
// 2. Roundtrip: decode(encode(p)) == p for any single valid position

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Decoding arbitrary bytes returns Ok or Err, never panics.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_decode_positions_no_panic() {
        let len: usize = kani::any_where(|&n| n <= MAX_POSITION_BYTES + 1);
        let mut bytes = [0u8; MAX_POSITION_BYTES + 1];
        for i in 0..len {
            bytes[i] = kani::any();
        }
        let _ = decode_positions(&bytes[..len]);
    }

    /// A single in-range position survives the roundtrip.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_single_position_roundtrip() {
        let offset: u16 = kani::any_where(|&o| o <= MAX_POSITION_OFFSET);
        let weight = WeightLevel::from_bits(kani::any());
        let original = [Position { offset, weight }];

        let bytes = encode_positions_to_vec(&original);
        kani::assert(bytes.len() <= MAX_POSITION_BYTES, "payload must be at most 3 bytes");

        let decoded = decode_positions(&bytes);
        kani::assert(decoded.is_ok(), "decoding an encoded position must succeed");
        if let Ok(decoded) = decoded {
            kani::assert(decoded.as_slice() == original.as_slice(), "roundtrip must preserve position");
        }
    }
}
