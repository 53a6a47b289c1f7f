// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the ranking pipeline.
//!
//! Debug-mode assertions for the invariants every kernel silently relies on:
//!
//! 1. **Zero-cost in release builds** (`debug_assert!` only)
//! 2. **Early failure** in tests, close to the code that broke the invariant
//!
//! | Contract Function               | What breaks without it                    |
//! |---------------------------------|-------------------------------------------|
//! | `check_positions_ascending`     | codec deltas, per-term rank order         |
//! | `check_document_sorted`         | binary search in `locate`                 |
//! | `check_operands_sorted`         | operand index agreement with the index    |
//! | `check_operand_map`             | presence lookups in `pre_consistent`      |
//! | `check_score_valid`             | `1 / rank` distance ordering              |

use std::cmp::Ordering;

use crate::types::{compare_lexemes, DocEntry, Position, QueryNode, QueryOperand};

// ============================================================================
// COMPILE-TIME ASSERTIONS
// ============================================================================

const _: () = {
    use crate::types::{MAX_ENTRY_POS, MAX_POSITION_OFFSET};
    // The synthetic no-position marker sits on the last representable offset.
    assert!(MAX_POSITION_OFFSET as u32 + 1 == MAX_ENTRY_POS);
};

// ============================================================================
// POSITION CONTRACTS
// ============================================================================

/// Positions must be ascending by offset (ties allowed).
///
/// # Panics (debug builds only)
#[inline]
pub fn check_positions_ascending(positions: &[Position]) {
    for i in 1..positions.len() {
        debug_assert!(
            positions[i - 1].offset <= positions[i].offset,
            "Contract violation: positions not ascending - positions[{}].offset {} > positions[{}].offset {}",
            i - 1,
            positions[i - 1].offset,
            i,
            positions[i].offset
        );
    }
}

// ============================================================================
// DOCUMENT CONTRACTS
// ============================================================================

/// Document keys must be strictly ascending by (length, bytes).
///
/// # Panics (debug builds only)
#[inline]
pub fn check_document_sorted(entries: &[DocEntry]) {
    for i in 1..entries.len() {
        debug_assert!(
            compare_lexemes(entries[i - 1].lexeme.as_bytes(), entries[i].lexeme.as_bytes())
                == Ordering::Less,
            "Contract violation: document not sorted - entry[{}] {:?} >= entry[{}] {:?}",
            i - 1,
            entries[i - 1].lexeme,
            i,
            entries[i].lexeme
        );
    }
}

// ============================================================================
// OPERAND CONTRACTS
// ============================================================================

/// Deduplicated operands must be strictly ascending by (length, bytes).
#[inline]
pub fn check_operands_sorted(operands: &[&QueryOperand]) {
    for i in 1..operands.len() {
        debug_assert!(
            compare_lexemes(operands[i - 1].lexeme.as_bytes(), operands[i].lexeme.as_bytes())
                == Ordering::Less,
            "Contract violation: operands not deduplicated/sorted at {}",
            i
        );
    }
}

/// Every operand node maps to an operand with the same key; operators map to nothing.
#[inline]
pub fn check_operand_map(nodes: &[QueryNode], map: &[Option<usize>], operands: &[&QueryOperand]) {
    debug_assert_eq!(
        nodes.len(),
        map.len(),
        "Contract violation: operand map has {} slots for {} nodes",
        map.len(),
        nodes.len()
    );

    for (node, (item, slot)) in nodes.iter().zip(map).enumerate() {
        match item {
            QueryNode::Operand(op) => debug_assert!(
                slot.and_then(|idx| operands.get(idx))
                    .is_some_and(|o| o.lexeme == op.lexeme),
                "Contract violation: operand node {} maps to {:?}, not an operand with its key",
                node,
                slot
            ),
            QueryNode::Operator { .. } => debug_assert!(
                slot.is_none(),
                "Contract violation: operator node {} has an operand slot",
                node
            ),
        }
    }
}

// ============================================================================
// SCORE CONTRACTS
// ============================================================================

/// A finished rank is finite and non-negative; 0 only when nothing could match.
#[inline]
pub fn check_score_valid(score: f32) {
    debug_assert!(
        score.is_finite() && score >= 0.0,
        "Contract violation: rank {} is not a finite non-negative number",
        score
    );
}
