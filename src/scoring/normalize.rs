// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Whole-document normalization of a raw rank.
//!
//! Long documents match more by accident, so callers can divide the raw
//! score by some measure of document size. Flags combine; they are applied
//! in the order declared below, and any whose divisor would be zero is
//! skipped.

use bitflags::bitflags;

use super::core::SCORE_FLOOR;
use crate::types::Document;

bitflags! {
    /// Normalization methods, bit-compatible with the classic rank flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Normalization: u32 {
        /// Divide by `log2(total positions + 1)`.
        const LOG_LENGTH = 0x01;
        /// Divide by total positions.
        const LENGTH = 0x02;
        /// Extent distance; not applicable to this ranking, accepted and ignored.
        const EXT_DIST = 0x04;
        /// Divide by the number of distinct lexemes.
        const UNIQUE = 0x08;
        /// Divide by `log2(distinct lexemes + 1)`.
        const LOG_UNIQUE = 0x10;
        /// Replace `r` with `r / (r + 1)`.
        const RDIV_RPLUS1 = 0x20;
    }
}

/// Document size measures the normalizations divide by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    /// Occurrences, a no-position lexeme counting once.
    pub total_positions: usize,
    /// Distinct lexemes.
    pub unique_lexemes: usize,
}

impl DocumentStats {
    pub fn of(document: &Document) -> Self {
        DocumentStats {
            total_positions: document.total_positions(),
            unique_lexemes: document.len(),
        }
    }
}

/// Clamp a raw score to the positive floor, then apply `flags`.
pub fn normalize(raw: f32, stats: DocumentStats, flags: Normalization) -> f32 {
    let mut r = if raw < 0.0 { SCORE_FLOOR } else { raw };

    if flags.contains(Normalization::LOG_LENGTH) && stats.total_positions > 0 {
        r /= log2_plus_one(stats.total_positions);
    }
    if flags.contains(Normalization::LENGTH) && stats.total_positions > 0 {
        r /= stats.total_positions as f32;
    }
    if flags.contains(Normalization::UNIQUE) && stats.unique_lexemes > 0 {
        r /= stats.unique_lexemes as f32;
    }
    if flags.contains(Normalization::LOG_UNIQUE) && stats.unique_lexemes > 0 {
        r /= log2_plus_one(stats.unique_lexemes);
    }
    if flags.contains(Normalization::RDIV_RPLUS1) {
        r /= r + 1.0;
    }

    r
}

#[inline]
fn log2_plus_one(n: usize) -> f32 {
    ((n + 1) as f64).log2() as f32
}
