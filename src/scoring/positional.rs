// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking from index payloads alone.
//!
//! During an index scan the framework hands us, per deduplicated operand, the
//! compressed position list stored next to the matching key (or nothing, for
//! a key indexed without positions). That is enough to rank a candidate
//! before the full document is fetched.
//!
//! Unlike document ranking there is no prefix expansion here: each slot is
//! already one resolved entry. No normalization is applied, since document
//! size is unknown at this point.

use tracing::{debug, warn};

use super::core::{accumulate_pairs, rank_to_distance, term_score, NO_SCORE, SCORE_FLOOR};
use super::ranking::is_pairwise;
use super::weights::Weights;
use crate::binary::decode_positions;
use crate::error::{RankError, Result};
use crate::operand::dedupe_and_sort;
use crate::types::{EntryPositions, Position, Query};

/// Rank a candidate from one payload per deduplicated operand.
///
/// `payloads[i]` belongs to operand `i` of [`dedupe_and_sort`]; `None` is a
/// key stored without positions and scores as the synthetic marker. An empty
/// payload slice or an empty query ranks 0.
pub fn rank_positions(
    weights: &Weights,
    query: &Query,
    payloads: &[Option<&[u8]>],
) -> Result<f32> {
    if payloads.is_empty() || query.is_empty() {
        return Ok(0.0);
    }

    let expected = dedupe_and_sort(query).len();
    if payloads.len() != expected {
        return Err(RankError::PayloadCountMismatch {
            expected,
            actual: payloads.len(),
        });
    }

    let decoded = decode_all(payloads)?;
    let lists: Vec<EntryPositions<'_>> = decoded
        .iter()
        .map(|slot| match slot {
            Some(positions) => EntryPositions::real(positions),
            None => EntryPositions::synthetic(),
        })
        .collect();

    let pairwise = is_pairwise(query) && lists.len() >= 2;
    let raw = if pairwise {
        let mut score = NO_SCORE;
        for (i, current) in lists.iter().enumerate() {
            for earlier in &lists[..i] {
                accumulate_pairs(&mut score, weights, *current, *earlier);
            }
        }
        score
    } else {
        let sum: f32 = lists.iter().map(|list| term_score(weights, *list)).sum();
        sum / lists.len() as f32
    };

    let score = if raw < 0.0 { SCORE_FLOOR } else { raw };
    debug!(operands = lists.len(), pairwise, score, "ranked payloads");
    Ok(score)
}

/// `1 / rank_positions(..)`, widened for use as an ordering key.
pub fn positions_distance_with(
    weights: &Weights,
    query: &Query,
    payloads: &[Option<&[u8]>],
) -> Result<f64> {
    rank_positions(weights, query, payloads).map(rank_to_distance)
}

fn decode_all(payloads: &[Option<&[u8]>]) -> Result<Vec<Option<Vec<Position>>>> {
    payloads
        .iter()
        .enumerate()
        .map(|(operand, payload)| match payload {
            // An empty payload carries no positions, same as a missing one.
            Some(bytes) if !bytes.is_empty() => decode_positions(bytes)
                .map(Some)
                .map_err(|source| {
                    warn!(operand, len = bytes.len(), error = %source, "corrupt position payload");
                    RankError::CorruptPayload { operand, source }
                }),
            _ => Ok(None),
        })
        .collect()
}
