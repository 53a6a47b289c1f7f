// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Callbacks the index framework drives.
//!
//! The framework never sees our types. It asks for the keys of a document
//! (with an opaque payload per key), the keys of a query, a cheap "could this
//! match" check on key presence, and finally a distance to order results by.
//!
//! ```text
//!   indexing                          scanning
//!   ────────                          ────────
//!   Document ──extract_document──►    Query ──extract_query──► keys + map
//!   keys + position payloads                      │
//!                                                 ▼
//!                                   presence ──pre_consistent──► maybe?
//!                                                 │
//!                            payloads ──positions_distance──► order key
//!                            Document ──document_distance───► order key
//! ```

use serde::Serialize;
use tracing::debug;

use crate::binary::encode_positions_to_vec;
use crate::error::{RankError, Result};
use crate::operand::{dedupe_and_sort, SortedOperands};
use crate::scoring::{
    positions_distance_with, rank, rank_to_distance, rank_with_config, Normalization, WeightArray,
    Weights,
};
use crate::types::{Document, Lexeme, OperatorKind, Query, QueryNode};

// =============================================================================
// DOCUMENT EXTRACTION
// =============================================================================

/// One indexed key and its compressed position list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedEntry {
    pub key: Lexeme,
    /// `None` for a lexeme without positions.
    pub payload: Option<Vec<u8>>,
}

/// Every key a document contributes to the index, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    pub entries: Vec<ExtractedEntry>,
}

/// Keys and position payloads of `document`.
///
/// Keys come out sorted and unique because the document already is. Position
/// lists are encoded as stored; per-term scoring relies on them being
/// ascending, which [`Document`] guarantees.
pub fn extract_document(document: &Document) -> ExtractedDocument {
    let entries = document
        .entries()
        .iter()
        .map(|entry| ExtractedEntry {
            key: entry.lexeme.clone(),
            payload: entry
                .positions
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(encode_positions_to_vec),
        })
        .collect();

    ExtractedDocument { entries }
}

// =============================================================================
// QUERY EXTRACTION
// =============================================================================

/// Whether the framework may restrict a scan to documents containing a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Some key must be present: scan only documents holding one.
    #[default]
    Default,
    /// Nothing positive is required (`!foo`): visit every document.
    All,
}

/// The keys of a query and how its leaves map onto them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedQuery {
    /// Deduplicated operand keys, ordered by (length, bytes).
    pub keys: Vec<Lexeme>,
    /// Per key: match as a prefix.
    pub prefix: Vec<bool>,
    /// Per arena node: index into `keys` for operand nodes.
    pub operand_map: Vec<Option<usize>>,
    pub search_mode: SearchMode,
}

/// Whether satisfying `query` requires at least one of its keys.
///
/// An operand requires itself; NOT requires nothing; AND/PHRASE require
/// whatever either side requires; OR requires something only if both sides do.
pub fn requires_match(query: &Query) -> bool {
    let nodes = query.nodes();
    if nodes.is_empty() {
        return false;
    }

    // Children always sit after their parent, so one reverse pass sees every
    // child before the node that reads it. No recursion, any depth.
    let mut requires = vec![false; nodes.len()];
    for (node, item) in nodes.iter().enumerate().rev() {
        requires[node] = match item {
            QueryNode::Operand(_) => true,
            QueryNode::Operator { kind, left, right } => {
                let right = right.map_or(false, |r| requires[r]);
                match kind {
                    OperatorKind::Not => false,
                    OperatorKind::Or => requires[*left] && right,
                    OperatorKind::And | OperatorKind::Phrase => requires[*left] || right,
                }
            }
        };
    }
    requires[0]
}

/// Keys, prefix flags, leaf map and search mode of `query`.
///
/// An empty query extracts nothing and keeps the default search mode.
pub fn extract_query(query: &Query) -> Result<ExtractedQuery> {
    if query.is_empty() {
        return Ok(ExtractedQuery::default());
    }

    let search_mode = if requires_match(query) {
        SearchMode::Default
    } else {
        SearchMode::All
    };

    let (operands, operand_map) = SortedOperands::build(query)?.into_parts();
    let extracted = ExtractedQuery {
        keys: operands.iter().map(|op| op.lexeme.clone()).collect(),
        prefix: operands.iter().map(|op| op.prefix).collect(),
        operand_map,
        search_mode,
    };

    debug!(
        keys = extracted.keys.len(),
        nodes = query.len(),
        mode = ?extracted.search_mode,
        "extracted query"
    );
    Ok(extracted)
}

// =============================================================================
// PRE-CONSISTENCY
// =============================================================================

/// Outcome of a presence-only check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consistency {
    /// The document may satisfy the query.
    pub matches: bool,
    /// A weight-restricted operand was consulted; presence cannot confirm it.
    pub recheck: bool,
}

/// Could a document holding exactly the keys marked in `check` match `query`?
///
/// `check[i]` is the presence of deduplicated key `i`; `operand_map` is the
/// map from [`extract_query`]. Negation is not evaluated and always counts as
/// satisfiable. PHRASE is evaluated as AND since presence carries no
/// positions. Evaluation short-circuits, and only operands actually consulted
/// can raise `recheck`.
pub fn pre_consistent(
    check: &[bool],
    query: &Query,
    operand_map: &[Option<usize>],
) -> Result<Consistency> {
    if query.is_empty() {
        return Ok(Consistency::default());
    }

    let expected = dedupe_and_sort(query).len();
    if check.len() != expected {
        return Err(RankError::CheckLengthMismatch {
            expected,
            actual: check.len(),
        });
    }

    let mut eval = PresenceEval {
        nodes: query.nodes(),
        check,
        operand_map,
        recheck: false,
    };
    let matches = eval.run()?;

    Ok(Consistency {
        matches,
        recheck: eval.recheck,
    })
}

struct PresenceEval<'a> {
    nodes: &'a [QueryNode],
    check: &'a [bool],
    operand_map: &'a [Option<usize>],
    recheck: bool,
}

/// Pending work for the presence walk.
enum Step {
    Visit(usize),
    /// Left side done: the right side runs only if the left did not settle
    /// the operator, i.e. left != `settles_on`.
    Right { settles_on: bool, right: usize },
}

impl PresenceEval<'_> {
    /// Short-circuit evaluation on an explicit stack, so deep trees cannot
    /// exhaust the thread stack.
    fn run(&mut self) -> Result<bool> {
        let mut steps = vec![Step::Visit(0)];
        let mut value = false;

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => match &self.nodes[node] {
                    QueryNode::Operand(operand) => value = self.operand(node, operand.weight_mask)?,
                    QueryNode::Operator { kind, left, right } => match (kind, right) {
                        (OperatorKind::Not, _) => value = true,
                        (_, None) => return Err(RankError::OperandNotFound { node }),
                        (OperatorKind::Or, Some(right)) => {
                            steps.push(Step::Right { settles_on: true, right: *right });
                            steps.push(Step::Visit(*left));
                        }
                        (OperatorKind::And | OperatorKind::Phrase, Some(right)) => {
                            steps.push(Step::Right { settles_on: false, right: *right });
                            steps.push(Step::Visit(*left));
                        }
                    },
                },
                Step::Right { settles_on, right } => {
                    if value != settles_on {
                        steps.push(Step::Visit(right));
                    }
                }
            }
        }

        Ok(value)
    }

    fn operand(&mut self, node: usize, weight_mask: u8) -> Result<bool> {
        if weight_mask != 0 {
            self.recheck = true;
        }
        let index = self
            .operand_map
            .get(node)
            .copied()
            .flatten()
            .filter(|&i| i < self.check.len())
            .ok_or(RankError::OperandNotFound { node })?;
        Ok(self.check[index])
    }
}

// =============================================================================
// DISTANCES
// =============================================================================

/// `1 / rank` of a full document with default weights and no normalization.
pub fn document_distance(document: &Document, query: &Query) -> Result<f64> {
    rank(document, query, &Weights::default(), Normalization::empty()).map(rank_to_distance)
}

/// `1 / rank` of a full document with caller-supplied weights and normalization.
pub fn document_distance_with(
    document: &Document,
    query: &Query,
    weights: Option<&WeightArray>,
    normalization: Normalization,
) -> Result<f64> {
    rank_with_config(document, query, weights, normalization).map(rank_to_distance)
}

/// `1 / rank` from index payloads alone, with default weights.
///
/// `payloads[i]` is the payload stored with deduplicated key `i`.
pub fn positions_distance(query: &Query, payloads: &[Option<&[u8]>]) -> Result<f64> {
    positions_distance_with(&Weights::default(), query, payloads)
}

// =============================================================================
// INDEX CONFIGURATION
// =============================================================================

/// Kind of per-entry auxiliary data the framework must store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddInfoKind {
    /// Variable-length byte string.
    Bytes,
}

/// What the index framework needs to know before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexConfig {
    pub add_info: AddInfoKind,
}

/// Positions ride along as an opaque byte string per entry.
pub fn index_config() -> IndexConfig {
    IndexConfig {
        add_info: AddInfoKind::Bytes,
    }
}
