// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Everything that can go wrong, and nothing that can't.
//!
//! "No match" and "no positions" are not errors: they score 0 or resolve to
//! an empty range. What remains falls into three buckets:
//!
//! - **Configuration errors**: a malformed weight array. Fatal to the call,
//!   reported to the caller, never retried.
//! - **Internal faults**: the operand rescan lost a leaf. Deduplication and
//!   rescan are consistent by construction, so this is a bug upstream.
//! - **Representation violations**: a document or query that breaks its own
//!   invariants (unsorted keys, dangling child offsets, corrupt payloads).

use std::io;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, RankError>;

/// Error type for document and query invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// Document keys are not strictly ascending by (length, bytes).
    #[error("document lexemes not sorted at entry {position}")]
    UnsortedLexemes { position: usize },
    /// Two document entries carry the same lexeme.
    #[error("duplicate lexeme at entry {position}")]
    DuplicateLexeme { position: usize },
    /// A position list is not ascending by offset.
    #[error("positions of entry {entry} not ascending at index {index}")]
    UnsortedPositions { entry: usize, index: usize },
    /// An offset does not fit the 14-bit position field.
    #[error("offset {offset} of entry {entry} exceeds the 14-bit position range")]
    OffsetOutOfRange { entry: usize, offset: u32 },
    /// An operator references a child outside the arena or not after itself.
    #[error("query node {node} references invalid child {child} (arena size {len})")]
    InvalidChild { node: usize, child: usize, len: usize },
    /// A binary operator is missing its right child.
    #[error("query node {node} is a binary operator without a right child")]
    MissingRightChild { node: usize },
    /// A node is reachable from more than one parent, or not at all.
    #[error("query node {node} is not referenced exactly once")]
    DanglingNode { node: usize },
}

/// Error returned by the ranking and adapter entry points.
#[derive(Debug, Error)]
pub enum RankError {
    /// The weight array has more than one dimension.
    #[error("array of weight must be one-dimensional")]
    WeightsNotOneDimensional { ndim: usize },
    /// The weight array has fewer than four elements.
    #[error("array of weight is too short")]
    WeightsTooShort { len: usize },
    /// The weight array contains a null element.
    #[error("array of weight must not contain nulls")]
    WeightsContainNull,
    /// A weight is above 1.0 (or not a number).
    #[error("weight out of range")]
    WeightOutOfRange { index: usize, value: f32 },
    /// A weight array JSON value holds something other than numbers/nulls.
    #[error("weight array element {index} is not a number")]
    WeightNotNumeric { index: usize },

    /// A query leaf was not found in the deduplicated operand list.
    #[error("operand not found for query node {node}")]
    OperandNotFound { node: usize },
    /// The presence vector does not have one slot per deduplicated operand.
    #[error("presence vector has {actual} entries, expected {expected}")]
    CheckLengthMismatch { expected: usize, actual: usize },
    /// The payload vector does not have one slot per deduplicated operand.
    #[error("got {actual} position payloads for {expected} operands")]
    PayloadCountMismatch { expected: usize, actual: usize },
    /// A compressed position payload failed to decode.
    #[error("corrupt position payload for operand {operand}: {source}")]
    CorruptPayload {
        operand: usize,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl RankError {
    /// True for the weight-array validation failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RankError::WeightsNotOneDimensional { .. }
                | RankError::WeightsTooShort { .. }
                | RankError::WeightsContainNull
                | RankError::WeightOutOfRange { .. }
                | RankError::WeightNotNumeric { .. }
        )
    }
}
