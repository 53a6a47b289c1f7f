// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind proximity ranking.
//!
//! Two terms close together are worth more than two terms far apart. The
//! proximity kernel turns a distance into a contribution near 1 for adjacent
//! words, decaying smoothly to nothing past ~100 words. Contributions are
//! combined like independent probabilities (noisy-OR), so every extra close
//! pair pushes the score toward 1 without ever crossing it.
//!
//! # Constants
//!
//! | Constant                 | Value          | Role                                   |
//! |--------------------------|----------------|----------------------------------------|
//! | `DEFAULT_WEIGHTS`        | 0.1/0.2/0.4/1  | Levels D, C, B, A                      |
//! | `MAX_PROXIMITY_DISTANCE` | 100            | Beyond this, pairs are "too far"       |
//! | `FAR_DISTANCE_SCORE`     | 1e-30          | Tiny, never zero: keeps products alive |
//! | `PI_SQUARED_OVER_SIX`    | 1.64493406685  | Limit of Σ 1/j², per-term normalizer   |
//! | `SCORE_FLOOR`            | 1e-20          | Replaces "no contribution" before 1/r  |

use tracing::trace;

use super::weights::Weights;
use crate::types::{EntryPositions, MAX_ENTRY_POS};

/// Default weight for levels D, C, B, A.
pub const DEFAULT_WEIGHTS: [f32; 4] = [0.1, 0.2, 0.4, 1.0];

/// Pairs further apart than this contribute `FAR_DISTANCE_SCORE`.
pub const MAX_PROXIMITY_DISTANCE: u32 = 100;

/// Kernel value past `MAX_PROXIMITY_DISTANCE`.
pub const FAR_DISTANCE_SCORE: f32 = 1e-30;

/// Σ 1/j² for j = 1..∞.
#[allow(clippy::excessive_precision)]
pub const PI_SQUARED_OVER_SIX: f32 = 1.644_934_066_85;

/// Pairwise accumulator sentinel: nothing contributed yet.
pub const NO_SCORE: f32 = -1.0;

/// Smallest rank handed out for a non-empty match.
pub const SCORE_FLOOR: f32 = 1e-20;

/// Proximity kernel: strictly decreasing on `[0, 100]`, `1e-30` beyond.
///
/// `1 / (1.005 + 0.05 * exp(d / 1.5 - 2))`, which is ~0.99 at `d = 0` and
/// ~0.907 at `d = 4`.
#[inline]
pub fn word_distance(distance: u32) -> f32 {
    if distance > MAX_PROXIMITY_DISTANCE {
        return FAR_DISTANCE_SCORE;
    }
    (1.0 / (1.005 + 0.05 * (f64::from(distance) / 1.5 - 2.0).exp())) as f32
}

/// Fold one contribution into a noisy-OR accumulator.
#[inline]
pub fn noisy_or(score: f32, contribution: f32) -> f32 {
    if score < 0.0 {
        contribution
    } else {
        1.0 - (1.0 - score) * (1.0 - contribution)
    }
}

/// Turn a rank into an ordering key: smaller is more relevant.
///
/// A zero rank yields `+inf`, the "least relevant" sentinel.
#[inline]
pub fn rank_to_distance(rank: f32) -> f64 {
    1.0 / f64::from(rank)
}

/// Score every position of `current` against every position of `earlier`.
///
/// Coincident real positions are skipped. A coincidence involving the
/// synthetic no-position marker is scored at distance `MAX_ENTRY_POS`.
pub fn accumulate_pairs(
    score: &mut f32,
    weights: &Weights,
    current: EntryPositions<'_>,
    earlier: EntryPositions<'_>,
) {
    for post in current.positions {
        for ct in earlier.positions {
            let mut dist = (i32::from(post.offset) - i32::from(ct.offset)).unsigned_abs();
            if dist == 0 {
                if !(current.synthetic || earlier.synthetic) {
                    continue;
                }
                dist = MAX_ENTRY_POS;
            }

            let curw = (weights.get(post.weight) * weights.get(ct.weight) * word_distance(dist)).sqrt();
            *score = noisy_or(*score, curw);
            trace!(
                left = post.offset,
                right = ct.offset,
                dist,
                contribution = curw,
                score = *score,
                "pair"
            );
        }
    }
}

/// Per-term score with diminishing returns over repeated occurrences.
///
/// Occurrence `j` (0-based, array order) adds `w_j / (j+1)²`; the strongest
/// occurrence (first one on ties) is counted at full weight instead of at
/// its own rank. Normalized by π²/6. Empty lists score 0.
pub fn term_score(weights: &Weights, positions: EntryPositions<'_>) -> f32 {
    let mut sum = 0.0f32;
    let mut max_weight = -1.0f32;
    let mut max_rank = 0usize;

    for (j, pos) in positions.positions.iter().enumerate() {
        let w = weights.get(pos.weight);
        let rank = (j + 1) as f32;
        sum += w / (rank * rank);
        if w > max_weight {
            max_weight = w;
            max_rank = j;
        }
    }

    let max_rank = (max_rank + 1) as f32;
    (max_weight + sum - max_weight / (max_rank * max_rank)) / PI_SQUARED_OVER_SIX
}
