// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query operands: deduplicate, sort, and find them in a document.
//!
//! The index framework identifies operands by their position in a sorted,
//! deduplicated key list, while the query tree refers to leaves by arena
//! index. [`SortedOperands`] holds both views and the map between them.

use std::cmp::Ordering;
use std::ops::Range;

use crate::contracts::{check_document_sorted, check_operand_map, check_operands_sorted};
use crate::error::{RankError, Result};
use crate::types::{compare_lexemes, compare_prefix, Document, Query, QueryOperand};

/// Unique query operands ordered by (length, bytes).
///
/// Equality is on the raw key bytes alone, so `foo` and `foo:*` collapse and
/// the first occurrence in arena order wins.
pub fn dedupe_and_sort(query: &Query) -> Vec<&QueryOperand> {
    let mut operands: Vec<&QueryOperand> = query.operands().map(|(_, op)| op).collect();
    if operands.len() < 2 {
        return operands;
    }

    // Stable: ties keep arena order, so dedup keeps the first occurrence.
    operands.sort_by(|a, b| compare_lexemes(a.lexeme.as_bytes(), b.lexeme.as_bytes()));
    operands.dedup_by(|cur, prev| cur.lexeme == prev.lexeme);

    check_operands_sorted(&operands);
    operands
}

/// Deduplicated operands plus the arena-index → operand-index map.
#[derive(Debug, Clone)]
pub struct SortedOperands<'q> {
    operands: Vec<&'q QueryOperand>,
    map: Vec<Option<usize>>,
}

impl<'q> SortedOperands<'q> {
    /// Deduplicate, then rescan every leaf to find its operand index.
    ///
    /// A leaf that is missing from the deduplicated list is an internal fault.
    pub fn build(query: &'q Query) -> Result<Self> {
        let operands = dedupe_and_sort(query);
        let mut map = vec![None; query.len()];

        for (node, leaf) in query.operands() {
            let idx = operands
                .binary_search_by(|op| compare_lexemes(op.lexeme.as_bytes(), leaf.lexeme.as_bytes()))
                .map_err(|_| RankError::OperandNotFound { node })?;
            map[node] = Some(idx);
        }

        check_operand_map(query.nodes(), &map, &operands);
        Ok(SortedOperands { operands, map })
    }

    #[inline]
    pub fn operands(&self) -> &[&'q QueryOperand] {
        &self.operands
    }

    /// One slot per arena node; `Some(index)` for operand nodes.
    #[inline]
    pub fn map(&self) -> &[Option<usize>] {
        &self.map
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn into_parts(self) -> (Vec<&'q QueryOperand>, Vec<Option<usize>>) {
        (self.operands, self.map)
    }
}

/// Document entries matched by `operand`, as a half-open index range.
///
/// Exact operands match at most one entry. Prefix operands match the run of
/// entries starting at the operand's insertion point whose keys start with
/// the operand. No match is an empty range, not an error.
pub fn locate(document: &Document, operand: &QueryOperand) -> Range<usize> {
    let entries = document.entries();
    check_document_sorted(entries);

    let key = operand.lexeme.as_bytes();
    let start = entries.partition_point(|e| compare_lexemes(e.lexeme.as_bytes(), key) == Ordering::Less);

    if !operand.prefix {
        let hit = entries
            .get(start)
            .is_some_and(|e| e.lexeme.as_bytes() == key);
        return if hit { start..start + 1 } else { start..start };
    }

    let run = entries[start..]
        .iter()
        .take_while(|e| compare_prefix(key, e.lexeme.as_bytes()) == Ordering::Equal)
        .count();
    start..start + run
}
