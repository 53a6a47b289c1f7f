//! Tests for the index framework callbacks.

use proxrank::{
    document_distance, document_distance_with, extract_document, extract_query, index_config,
    positions_distance, pre_consistent, AddInfoKind, Normalization, Query, RankError,
    SearchMode, WeightArray, WeightLevel,
};

use crate::common::{as_slices, cat_dog, payloads_for, query_json, sentence};

// ============================================================================
// EXTRACTION
// ============================================================================

#[test]
fn test_document_keys_sorted_with_payloads() {
    let extracted = extract_document(&sentence());
    let keys: Vec<String> = extracted.entries.iter().map(|e| e.key.to_string()).collect();
    assert_eq!(keys, vec!["dog", "fox", "the", "jump", "lazy", "brown", "quick"]);

    let the = &extracted.entries[2];
    assert!(the.payload.is_none());
    assert!(extracted.entries[0].payload.is_some());
}

#[test]
fn test_query_extraction_for_bare_negation() {
    let q = Query::term("spam").negate();
    let extracted = extract_query(&q).unwrap();
    assert_eq!(extracted.search_mode, SearchMode::All);
    assert_eq!(extracted.operand_map, vec![None, Some(0)]);
}

#[test]
fn test_query_extraction_prefix_flags() {
    let q = Query::prefix("jum").and(Query::term("fox"));
    let extracted = extract_query(&q).unwrap();
    assert_eq!(extracted.prefix, vec![false, true]);
    assert_eq!(extracted.search_mode, SearchMode::Default);
}

// ============================================================================
// PRE-CONSISTENCY
// ============================================================================

#[test]
fn test_phrase_checked_like_and() {
    let q = Query::term("quick").phrase(Query::term("fox"));
    let map = extract_query(&q).unwrap().operand_map;
    // keys: fox, quick
    assert!(pre_consistent(&[true, true], &q, &map).unwrap().matches);
    assert!(!pre_consistent(&[true, false], &q, &map).unwrap().matches);
}

#[test]
fn test_short_circuit_skips_weighted_operand() {
    // "cat" is absent, so the weighted right side of the AND is never consulted.
    let q = Query::term("cat").and(Query::term("dog").with_weights(WeightLevel::A.mask()));
    let map = extract_query(&q).unwrap().operand_map;
    let c = pre_consistent(&[false, true], &q, &map).unwrap();
    assert!(!c.matches);
    assert!(!c.recheck);
}

#[test]
fn test_nested_query_from_json() {
    // (cat | dog) & !emu
    let q = query_json(
        r#"[
            {"type": "operator", "kind": "and", "left": 1, "right": 4},
            {"type": "operator", "kind": "or", "left": 2, "right": 3},
            {"type": "operand", "lexeme": "cat"},
            {"type": "operand", "lexeme": "dog"},
            {"type": "operator", "kind": "not", "left": 5},
            {"type": "operand", "lexeme": "emu"}
        ]"#,
    );
    let extracted = extract_query(&q).unwrap();
    assert_eq!(extracted.search_mode, SearchMode::Default);
    // keys: cat, dog, emu
    let map = extracted.operand_map;
    assert!(pre_consistent(&[false, true, true], &q, &map).unwrap().matches);
    assert!(!pre_consistent(&[false, false, true], &q, &map).unwrap().matches);
}

#[test]
fn test_presence_vector_length_checked() {
    let q = Query::term("cat").or(Query::term("dog"));
    let map = extract_query(&q).unwrap().operand_map;
    assert!(matches!(
        pre_consistent(&[true, true, true], &q, &map),
        Err(RankError::CheckLengthMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

// ============================================================================
// DISTANCES
// ============================================================================

#[test]
fn test_document_distance_reference_scenario() {
    let q = Query::term("cat").and(Query::term("dog"));
    assert!((document_distance(&cat_dog(), &q).unwrap() - 3.32).abs() < 0.01);
}

#[test]
fn test_distance_orders_relevance() {
    let q = Query::term("fox").and(Query::term("dog"));
    let close = document_distance(&sentence(), &q).unwrap();
    let far = document_distance(&cat_dog(), &Query::term("cat").and(Query::term("dog"))).unwrap();
    assert!(close < far);
}

#[test]
fn test_unmatched_document_is_infinitely_far() {
    let q = Query::term("emu").or(Query::term("yak"));
    assert!(document_distance(&cat_dog(), &q).unwrap().is_infinite());
}

#[test]
fn test_distance_with_normalization() {
    let q = Query::term("cat").and(Query::term("dog"));
    let plain = document_distance(&cat_dog(), &q).unwrap();
    let unique = document_distance_with(&cat_dog(), &q, None, Normalization::UNIQUE).unwrap();
    assert!((unique - plain * 2.0).abs() < 1e-4);
}

#[test]
fn test_distance_with_invalid_weights() {
    let q = Query::term("cat");
    let bad = WeightArray::from_values(&[0.1]);
    assert!(matches!(
        document_distance_with(&cat_dog(), &q, Some(&bad), Normalization::empty()),
        Err(RankError::WeightsTooShort { len: 1 })
    ));
}

#[test]
fn test_payload_distance_matches_document_distance() {
    let doc = sentence();
    let q = Query::term("quick").and(Query::term("fox")).and(Query::term("the"));
    let payloads = payloads_for(&doc, &q).unwrap();
    let from_payloads = positions_distance(&q, &as_slices(&payloads)).unwrap();
    let from_document = document_distance(&doc, &q).unwrap();
    assert!((from_payloads - from_document).abs() < 1e-4 * from_document);
}

#[test]
fn test_payload_corruption_reported() {
    let q = Query::term("cat").and(Query::term("dog"));
    let good: &[u8] = &[0x61];
    let overlong: &[u8] = &[0xFF, 0xFF, 0xFF];
    let payloads = vec![Some(good), Some(overlong)];
    assert!(matches!(
        positions_distance(&q, &payloads),
        Err(RankError::CorruptPayload { operand: 1, .. })
    ));
}

#[test]
fn test_index_config_bytes() {
    assert_eq!(index_config().add_info, AddInfoKind::Bytes);
}
