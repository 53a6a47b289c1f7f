// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking a full document against a query.
//!
//! Kernel selection is by query root only: AND and PHRASE pick pairwise
//! proximity, anything else (OR, NOT, a bare term) picks per-term scoring.
//! Negation is never evaluated here; a document is ranked on what it
//! contains, not on what it lacks.

use tracing::debug;

use super::core::{accumulate_pairs, term_score, NO_SCORE};
use super::normalize::{normalize, DocumentStats, Normalization};
use super::weights::{WeightArray, Weights};
use crate::contracts::check_score_valid;
use crate::error::Result;
use crate::operand::{locate, SortedOperands};
use crate::types::{Document, EntryPositions, OperatorKind, Query, QueryOperand};

/// Whether the query root selects the pairwise kernel.
#[inline]
pub fn is_pairwise(query: &Query) -> bool {
    matches!(
        query.root_operator(),
        Some(OperatorKind::And | OperatorKind::Phrase)
    )
}

/// Pairwise proximity score over the deduplicated `operands`.
///
/// Operands are visited in order; each matched entry of operand `i` is paired
/// with the most recently matched entry of every earlier operand. Returns
/// `NO_SCORE` (negative) when no pair contributed. With fewer than two
/// operands this is [`rank_or`].
pub fn rank_and(weights: &Weights, document: &Document, operands: &[&QueryOperand]) -> f32 {
    if operands.len() < 2 {
        return rank_or(weights, document, operands);
    }

    let entries = document.entries();
    let mut seen: Vec<Option<EntryPositions<'_>>> = vec![None; operands.len()];
    let mut score = NO_SCORE;

    for (i, operand) in operands.iter().enumerate() {
        for entry in &entries[locate(document, operand)] {
            let current = entry.entry_positions();
            seen[i] = Some(current);
            for earlier in seen[..i].iter().flatten() {
                accumulate_pairs(&mut score, weights, current, *earlier);
            }
        }
    }

    score
}

/// Per-term score averaged over the deduplicated `operands`.
///
/// Every matched entry adds its [`term_score`]; the sum is divided by the
/// operand count, so unmatched operands pull the average down. No operands
/// scores 0.
pub fn rank_or(weights: &Weights, document: &Document, operands: &[&QueryOperand]) -> f32 {
    let entries = document.entries();
    let mut score = 0.0f32;

    for operand in operands {
        for entry in &entries[locate(document, operand)] {
            score += term_score(weights, entry.entry_positions());
        }
    }

    if !operands.is_empty() {
        score /= operands.len() as f32;
    }
    score
}

/// Rank `document` against `query`.
///
/// Returns 0 for an empty document or a query without operands. A pairwise
/// query where no pair contributed is floored to `SCORE_FLOOR` rather than
/// left negative; per-term scoring of a document matching nothing stays 0.
pub fn rank(
    document: &Document,
    query: &Query,
    weights: &Weights,
    normalization: Normalization,
) -> Result<f32> {
    let sorted = SortedOperands::build(query)?;
    if document.is_empty() || sorted.is_empty() {
        return Ok(0.0);
    }

    let pairwise = is_pairwise(query);
    let raw = if pairwise {
        rank_and(weights, document, sorted.operands())
    } else {
        rank_or(weights, document, sorted.operands())
    };

    let score = normalize(raw, DocumentStats::of(document), normalization);
    check_score_valid(score);

    debug!(
        operands = sorted.len(),
        entries = document.len(),
        pairwise,
        raw,
        score,
        "ranked document"
    );
    Ok(score)
}

/// [`rank`] with a caller-supplied weight array, validated first.
pub fn rank_with_config(
    document: &Document,
    query: &Query,
    weights: Option<&WeightArray>,
    normalization: Normalization,
) -> Result<f32> {
    let weights = Weights::resolve(weights)?;
    rank(document, query, &weights, normalization)
}
