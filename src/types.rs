// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks: lexemes, weighted positions, documents and queries.
//!
//! A document is a sorted bag of lexemes, each carrying the offsets where it
//! occurred. A query is a small boolean tree over lexemes, stored as a flat
//! arena so it can cross the index boundary without pointers.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Lexeme order**: keys compare by (byte length, then bytes). Never by
//!   locale collation. Binary search in [`crate::locate`] depends on it.
//!
//! - **Document**: keys strictly ascending under that order (so no
//!   duplicates), every position list ascending by offset, every offset
//!   `<= MAX_POSITION_OFFSET`. Per-term scoring ranks occurrences by array
//!   order, so an unsorted position list silently changes scores.
//!
//! - **Query arena**: node 0 is the root. Every child index is strictly
//!   greater than its parent's, and every non-root node has exactly one
//!   parent. That rules out cycles without any pointer graph.
//!
//! Use [`Document::new`] / [`Query::new`] to get these checked, or
//! [`Document::from_unsorted`] and the query combinators to get them by
//! construction.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::InvariantError;

// =============================================================================
// POSITION LIMITS
// =============================================================================

/// One past the largest offset the 14-bit position field can hold.
///
/// Also the surrogate "very far" distance for coincident positions that
/// involve a no-position marker.
pub const MAX_ENTRY_POS: u32 = 1 << 14;

/// Largest representable offset (16383).
pub const MAX_POSITION_OFFSET: u16 = (MAX_ENTRY_POS - 1) as u16;

// =============================================================================
// LEXEMES
// =============================================================================

/// Compare two lexeme keys: shorter first, then bytewise.
#[inline]
pub fn compare_lexemes(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Prefix-truncating comparison of an operand against a document key.
///
/// `Equal` when `key` starts with `prefix`; otherwise the ordinary lexeme
/// ordering of the two.
#[inline]
pub fn compare_prefix(prefix: &[u8], key: &[u8]) -> Ordering {
    if key.starts_with(prefix) {
        Ordering::Equal
    } else {
        compare_lexemes(prefix, key)
    }
}

/// An indexed term: an immutable byte string.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Lexeme(Vec<u8>);

impl Lexeme {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Lexeme(bytes.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Ord for Lexeme {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lexemes(&self.0, &other.0)
    }
}

impl PartialOrd for Lexeme {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<[u8]> for Lexeme {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Lexeme {
    fn from(s: &str) -> Self {
        Lexeme(s.as_bytes().to_vec())
    }
}

impl From<String> for Lexeme {
    fn from(s: String) -> Self {
        Lexeme(s.into_bytes())
    }
}

impl From<&[u8]> for Lexeme {
    fn from(b: &[u8]) -> Self {
        Lexeme(b.to_vec())
    }
}

impl From<Vec<u8>> for Lexeme {
    fn from(b: Vec<u8>) -> Self {
        Lexeme(b)
    }
}

impl From<Lexeme> for String {
    fn from(l: Lexeme) -> Self {
        String::from_utf8_lossy(&l.0).into_owned()
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

// =============================================================================
// WEIGHTED POSITIONS
// =============================================================================

/// Importance tier of one occurrence. `A` is the most important.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum WeightLevel {
    #[default]
    D = 0,
    C = 1,
    B = 2,
    A = 3,
}

impl WeightLevel {
    /// All levels, indexed by their two-bit value.
    pub const ALL: [WeightLevel; 4] = [WeightLevel::D, WeightLevel::C, WeightLevel::B, WeightLevel::A];

    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Decode from the low two bits; higher bits are ignored.
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0b11) as usize]
    }

    /// This level's bit in an operand's `weight_mask`.
    #[inline]
    pub fn mask(self) -> u8 {
        1 << self.bits()
    }
}

/// One occurrence of a lexeme: a 14-bit offset plus a weight level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub offset: u16,
    #[serde(default)]
    pub weight: WeightLevel,
}

impl Position {
    /// Stand-in for a lexeme stored without positions: the last offset, weight D.
    pub const NO_POSITION: Position = Position {
        offset: MAX_POSITION_OFFSET,
        weight: WeightLevel::D,
    };

    /// Create a position, rejecting offsets outside the 14-bit field.
    #[inline]
    pub fn new(offset: u32, weight: WeightLevel) -> Option<Self> {
        if offset <= MAX_POSITION_OFFSET as u32 {
            Some(Position {
                offset: offset as u16,
                weight,
            })
        } else {
            None
        }
    }
}

static NO_POSITIONS: [Position; 1] = [Position::NO_POSITION];

/// The position list a scoring kernel sees for one matched entry.
///
/// `synthetic` marks the single stand-in position of a no-position entry;
/// pairwise scoring treats coincidences involving it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPositions<'a> {
    pub positions: &'a [Position],
    pub synthetic: bool,
}

impl<'a> EntryPositions<'a> {
    pub fn real(positions: &'a [Position]) -> Self {
        EntryPositions {
            positions,
            synthetic: false,
        }
    }

    pub fn synthetic() -> EntryPositions<'static> {
        EntryPositions {
            positions: &NO_POSITIONS,
            synthetic: true,
        }
    }
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// One lexeme of a document and where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    pub lexeme: Lexeme,
    /// `None` is the no-position marker.
    #[serde(default)]
    pub positions: Option<Vec<Position>>,
}

impl DocEntry {
    /// An entry with positions. An empty list becomes the no-position marker.
    pub fn new(lexeme: impl Into<Lexeme>, positions: Vec<Position>) -> Self {
        DocEntry {
            lexeme: lexeme.into(),
            positions: if positions.is_empty() { None } else { Some(positions) },
        }
    }

    pub fn without_positions(lexeme: impl Into<Lexeme>) -> Self {
        DocEntry {
            lexeme: lexeme.into(),
            positions: None,
        }
    }

    #[inline]
    pub fn has_positions(&self) -> bool {
        self.positions.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Occurrence count used by length normalization; a no-position entry counts once.
    #[inline]
    pub fn position_count(&self) -> usize {
        match &self.positions {
            Some(p) if !p.is_empty() => p.len(),
            _ => 1,
        }
    }

    /// Positions as the scoring kernels consume them.
    #[inline]
    pub fn entry_positions(&self) -> EntryPositions<'_> {
        match &self.positions {
            Some(p) if !p.is_empty() => EntryPositions::real(p),
            _ => EntryPositions::synthetic(),
        }
    }
}

/// A tokenized document: entries sorted by (length, bytes), no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DocEntry>", into = "Vec<DocEntry>")]
pub struct Document {
    entries: Vec<DocEntry>,
}

impl Document {
    /// Wrap already-sorted entries, validating the representation invariants.
    pub fn new(entries: Vec<DocEntry>) -> Result<Self, InvariantError> {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                match compare_lexemes(entries[i - 1].lexeme.as_bytes(), entry.lexeme.as_bytes()) {
                    Ordering::Less => {}
                    Ordering::Equal => return Err(InvariantError::DuplicateLexeme { position: i }),
                    Ordering::Greater => return Err(InvariantError::UnsortedLexemes { position: i }),
                }
            }
            if let Some(positions) = &entry.positions {
                for (j, pos) in positions.iter().enumerate() {
                    if pos.offset > MAX_POSITION_OFFSET {
                        return Err(InvariantError::OffsetOutOfRange {
                            entry: i,
                            offset: pos.offset as u32,
                        });
                    }
                    if j > 0 && positions[j - 1].offset > pos.offset {
                        return Err(InvariantError::UnsortedPositions { entry: i, index: j });
                    }
                }
            }
        }

        let entries = entries
            .into_iter()
            .map(|e| DocEntry::new(e.lexeme, e.positions.unwrap_or_default()))
            .collect();
        Ok(Document { entries })
    }

    /// Build a document from entries in any order.
    ///
    /// Duplicate lexemes are merged: their positions are unioned, sorted, and
    /// coincident offsets keep the highest weight. Offsets past the 14-bit
    /// field are clamped to `MAX_POSITION_OFFSET` with a warning, the way an
    /// indexer folds the tail of a long text onto its last position.
    /// [`Document::new`] is the strict path and rejects them instead. JSON
    /// loading goes through here.
    pub fn from_unsorted(mut entries: Vec<DocEntry>) -> Self {
        entries.sort_by(|a, b| a.lexeme.cmp(&b.lexeme));

        let mut merged: Vec<DocEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match merged.last_mut() {
                Some(last) if last.lexeme == entry.lexeme => {
                    if let Some(more) = entry.positions {
                        last.positions.get_or_insert_with(Vec::new).extend(more);
                    }
                }
                _ => merged.push(entry),
            }
        }

        for entry in &mut merged {
            if let Some(positions) = entry.positions.take() {
                let (positions, clamped) = normalize_positions(positions);
                if clamped > 0 {
                    warn!(
                        lexeme = %entry.lexeme,
                        clamped,
                        max = MAX_POSITION_OFFSET,
                        "position offsets clamped"
                    );
                }
                entry.positions = positions;
            }
        }

        Document { entries: merged }
    }

    #[inline]
    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total occurrences, counting each no-position entry as one.
    pub fn total_positions(&self) -> usize {
        self.entries.iter().map(DocEntry::position_count).sum()
    }

    /// Exact lookup by key.
    pub fn get(&self, lexeme: &[u8]) -> Option<&DocEntry> {
        self.entries
            .binary_search_by(|e| compare_lexemes(e.lexeme.as_bytes(), lexeme))
            .ok()
            .map(|i| &self.entries[i])
    }
}

impl From<Vec<DocEntry>> for Document {
    fn from(entries: Vec<DocEntry>) -> Self {
        Document::from_unsorted(entries)
    }
}

impl From<Document> for Vec<DocEntry> {
    fn from(doc: Document) -> Self {
        doc.entries
    }
}

/// Sort by offset, clamp, and collapse duplicates keeping the strongest weight.
///
/// Also returns how many offsets were clamped.
fn normalize_positions(mut positions: Vec<Position>) -> (Option<Vec<Position>>, usize) {
    let mut clamped = 0;
    for pos in &mut positions {
        if pos.offset > MAX_POSITION_OFFSET {
            pos.offset = MAX_POSITION_OFFSET;
            clamped += 1;
        }
    }
    positions.sort_by_key(|p| p.offset);

    let mut out: Vec<Position> = Vec::with_capacity(positions.len());
    for pos in positions {
        match out.last_mut() {
            Some(last) if last.offset == pos.offset => {
                if pos.weight > last.weight {
                    last.weight = pos.weight;
                }
            }
            _ => out.push(pos),
        }
    }

    let out = if out.is_empty() { None } else { Some(out) };
    (out, clamped)
}

// =============================================================================
// QUERIES
// =============================================================================

/// Boolean operator of a query node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    And,
    Or,
    Not,
    Phrase,
}

/// A query leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOperand {
    pub lexeme: Lexeme,
    /// Match every document key starting with `lexeme`.
    #[serde(default)]
    pub prefix: bool,
    /// Allowed weight levels (bit per [`WeightLevel::mask`]); 0 = any.
    #[serde(default)]
    pub weight_mask: u8,
}

impl QueryOperand {
    pub fn new(lexeme: impl Into<Lexeme>) -> Self {
        QueryOperand {
            lexeme: lexeme.into(),
            prefix: false,
            weight_mask: 0,
        }
    }
}

/// One node of the query arena. Children are indices into the same arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryNode {
    Operator {
        kind: OperatorKind,
        left: usize,
        /// `None` only for `Not`.
        #[serde(default)]
        right: Option<usize>,
    },
    Operand(QueryOperand),
}

/// A boolean keyword query stored as a flat arena; node 0 is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<QueryNode>", into = "Vec<QueryNode>")]
pub struct Query {
    nodes: Vec<QueryNode>,
}

impl Query {
    /// Validate an arena: children after their parent, each referenced once.
    pub fn new(nodes: Vec<QueryNode>) -> Result<Self, InvariantError> {
        let len = nodes.len();
        let mut refs = vec![0u32; len];

        for (node, item) in nodes.iter().enumerate() {
            if let QueryNode::Operator { kind, left, right } = item {
                let mut children = vec![*left];
                match (kind, right) {
                    (OperatorKind::Not, _) => {}
                    (_, Some(r)) => children.push(*r),
                    (_, None) => return Err(InvariantError::MissingRightChild { node }),
                }
                for child in children {
                    if child <= node || child >= len {
                        return Err(InvariantError::InvalidChild { node, child, len });
                    }
                    refs[child] += 1;
                }
            }
        }

        if let Some(node) = (1..len).find(|&i| refs[i] != 1) {
            return Err(InvariantError::DanglingNode { node });
        }

        Ok(Query { nodes })
    }

    /// Single exact term.
    pub fn term(lexeme: impl Into<Lexeme>) -> Self {
        Query {
            nodes: vec![QueryNode::Operand(QueryOperand::new(lexeme))],
        }
    }

    /// Single prefix term.
    pub fn prefix(lexeme: impl Into<Lexeme>) -> Self {
        let mut operand = QueryOperand::new(lexeme);
        operand.prefix = true;
        Query {
            nodes: vec![QueryNode::Operand(operand)],
        }
    }

    /// Set the weight mask on every operand of this query.
    pub fn with_weights(mut self, mask: u8) -> Self {
        for node in &mut self.nodes {
            if let QueryNode::Operand(op) = node {
                op.weight_mask = mask;
            }
        }
        self
    }

    pub fn and(self, other: Query) -> Self {
        Self::combine(OperatorKind::And, self, Some(other))
    }

    pub fn or(self, other: Query) -> Self {
        Self::combine(OperatorKind::Or, self, Some(other))
    }

    pub fn phrase(self, other: Query) -> Self {
        Self::combine(OperatorKind::Phrase, self, Some(other))
    }

    pub fn negate(self) -> Self {
        Self::combine(OperatorKind::Not, self, None)
    }

    fn combine(kind: OperatorKind, left: Query, right: Option<Query>) -> Self {
        let left_len = left.nodes.len();
        let right_len = right.as_ref().map_or(0, |r| r.nodes.len());
        let mut nodes = Vec::with_capacity(1 + left_len + right_len);

        nodes.push(QueryNode::Operator {
            kind,
            left: 1,
            right: right.as_ref().map(|_| 1 + left_len),
        });
        nodes.extend(left.nodes.into_iter().map(|n| shift_node(n, 1)));
        if let Some(right) = right {
            nodes.extend(right.nodes.into_iter().map(|n| shift_node(n, 1 + left_len)));
        }

        Query { nodes }
    }

    #[inline]
    pub fn nodes(&self) -> &[QueryNode] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Operator at the root, or `None` for a bare operand or empty query.
    pub fn root_operator(&self) -> Option<OperatorKind> {
        match self.nodes.first() {
            Some(QueryNode::Operator { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    /// Operand leaves in arena order, with their node index.
    pub fn operands(&self) -> impl Iterator<Item = (usize, &QueryOperand)> {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            QueryNode::Operand(op) => Some((i, op)),
            QueryNode::Operator { .. } => None,
        })
    }
}

fn shift_node(node: QueryNode, by: usize) -> QueryNode {
    match node {
        QueryNode::Operator { kind, left, right } => QueryNode::Operator {
            kind,
            left: left + by,
            right: right.map(|r| r + by),
        },
        operand => operand,
    }
}

impl TryFrom<Vec<QueryNode>> for Query {
    type Error = InvariantError;

    fn try_from(nodes: Vec<QueryNode>) -> Result<Self, Self::Error> {
        Query::new(nodes)
    }
}

impl From<Query> for Vec<QueryNode> {
    fn from(query: Query) -> Self {
        query.nodes
    }
}
