//! Shared test utilities and fixtures.

#![allow(dead_code)]

use proxrank::{
    extract_document, extract_query, DocEntry, Document, Position, Query, WeightLevel,
};

// ============================================================================
// BUILDERS
// ============================================================================

pub fn pos(offset: u16, weight: WeightLevel) -> Position {
    Position { offset, weight }
}

/// Build a document from `(lexeme, [(offset, level)])` pairs in any order.
/// An empty position list is a no-position entry.
pub fn doc(entries: &[(&str, &[(u16, WeightLevel)])]) -> Document {
    Document::from_unsorted(
        entries
            .iter()
            .map(|(lexeme, positions)| {
                DocEntry::new(
                    *lexeme,
                    positions.iter().map(|&(o, w)| pos(o, w)).collect(),
                )
            })
            .collect(),
    )
}

/// Payloads of `document` for each deduplicated key of `query`, as the index
/// framework would hand them over. `None` if some key is absent.
pub fn payloads_for(document: &Document, query: &Query) -> Option<Vec<Option<Vec<u8>>>> {
    let extracted = extract_document(document);
    let keys = extract_query(query).ok()?.keys;
    keys.iter()
        .map(|key| {
            extracted
                .entries
                .iter()
                .find(|e| &e.key == key)
                .map(|e| e.payload.clone())
        })
        .collect()
}

pub fn as_slices(payloads: &[Option<Vec<u8>>]) -> Vec<Option<&[u8]>> {
    payloads.iter().map(|p| p.as_deref()).collect()
}

// ============================================================================
// FIXTURES
// ============================================================================

/// "cat" at 1 (A), "dog" at 5 (D): a single pair at distance 4.
pub fn cat_dog() -> Document {
    doc(&[
        ("cat", &[(1, WeightLevel::A)]),
        ("dog", &[(5, WeightLevel::D)]),
    ])
}

/// A short sentence with repeated terms and mixed levels.
pub fn sentence() -> Document {
    doc(&[
        ("quick", &[(2, WeightLevel::B)]),
        ("brown", &[(3, WeightLevel::C)]),
        ("fox", &[(4, WeightLevel::A), (17, WeightLevel::D)]),
        ("jump", &[(5, WeightLevel::D)]),
        ("lazy", &[(8, WeightLevel::D)]),
        ("dog", &[(9, WeightLevel::A), (20, WeightLevel::D)]),
        ("the", &[]),
    ])
}

/// Parse a query from its JSON arena form.
pub fn query_json(json: &str) -> Query {
    serde_json::from_str(json).expect("valid query json")
}
