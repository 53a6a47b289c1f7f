//! Tests for operand deduplication, the leaf map and entry lookup.

use proxrank::{dedupe_and_sort, locate, Document, Query, QueryOperand, SortedOperands};

use crate::common::{doc, query_json};

fn keys(query: &Query) -> Vec<String> {
    dedupe_and_sort(query)
        .iter()
        .map(|op| op.lexeme.to_string())
        .collect()
}

fn prefix(lexeme: &str) -> QueryOperand {
    let mut op = QueryOperand::new(lexeme);
    op.prefix = true;
    op
}

#[test]
fn test_cat_dog_cat_dedupes_to_two() {
    let q = Query::term("cat").and(Query::term("dog")).and(Query::term("cat"));
    assert_eq!(keys(&q), vec!["cat", "dog"]);
}

#[test]
fn test_shorter_keys_sort_first() {
    let q = Query::term("zebra").or(Query::term("yak")).or(Query::term("ant"));
    assert_eq!(keys(&q), vec!["ant", "yak", "zebra"]);
}

#[test]
fn test_map_from_json_arena() {
    let q = query_json(
        r#"[
            {"type": "operator", "kind": "or", "left": 1, "right": 2},
            {"type": "operand", "lexeme": "dog"},
            {"type": "operator", "kind": "not", "left": 3},
            {"type": "operand", "lexeme": "cat", "weight_mask": 8}
        ]"#,
    );
    let sorted = SortedOperands::build(&q).unwrap();
    assert_eq!(sorted.len(), 2);
    assert_eq!(sorted.map(), &[None, Some(1), None, Some(0)]);
    assert_eq!(sorted.operands()[0].weight_mask, 8);
}

#[test]
fn test_locate_absent_key_is_empty() {
    let d = doc(&[("dog", &[]), ("dot", &[]), ("fig", &[])]);
    assert!(locate(&d, &QueryOperand::new("cow")).is_empty());
    assert!(locate(&d, &QueryOperand::new("do")).is_empty());
}

#[test]
fn test_locate_prefix_run() {
    let d = doc(&[("fig", &[]), ("dot", &[]), ("dog", &[])]);
    let range = locate(&d, &prefix("do"));
    let hits: Vec<String> = d.entries()[range]
        .iter()
        .map(|e| e.lexeme.to_string())
        .collect();
    assert_eq!(hits, vec!["dog", "dot"]);
}

#[test]
fn test_locate_prefix_stops_at_run_boundary() {
    // Length-first order puts "cat" between "do" and the 3-byte "do*" keys.
    let d = doc(&[("do", &[]), ("cat", &[]), ("dog", &[])]);
    assert_eq!(locate(&d, &prefix("do")), 0..1);
}

#[test]
fn test_locate_in_empty_document() {
    assert!(locate(&Document::default(), &prefix("a")).is_empty());
}
