//! Scoring property tests.
//!
//! - the proximity kernel is strictly decreasing up to its cutoff
//! - ranks are finite and non-negative, and AND ranks never exceed 1
//! - payload ranking agrees with document ranking
//! - negative weight entries behave exactly like the defaults

use proptest::prelude::*;
use proxrank::{
    rank, rank_positions, rank_with_config, word_distance, DocEntry, Document, Normalization,
    Position, Query, WeightArray, WeightLevel, Weights,
};

use crate::common::{as_slices, payloads_for};

fn word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c]{1,2}").unwrap()
}

fn entry() -> impl Strategy<Value = DocEntry> {
    (
        word(),
        prop::collection::vec((0u32..300, 0u8..4), 0..5),
    )
        .prop_map(|(w, raw)| {
            let positions = raw
                .into_iter()
                .filter_map(|(offset, bits)| Position::new(offset, WeightLevel::from_bits(bits)))
                .collect();
            DocEntry::new(w, positions)
        })
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(entry(), 1..10).prop_map(Document::from_unsorted)
}

/// A document plus three of its own lexemes.
fn document_with_terms() -> impl Strategy<Value = (Document, [String; 3])> {
    document().prop_flat_map(|d| {
        let n = d.len();
        (Just(d), 0..n, 0..n, 0..n).prop_map(|(d, i, j, k)| {
            let word = |at: usize| d.entries()[at].lexeme.to_string();
            let terms = [word(i), word(j), word(k)];
            (d, terms)
        })
    })
}

fn flags() -> impl Strategy<Value = Normalization> {
    (0u32..64).prop_map(Normalization::from_bits_truncate)
}

proptest! {
    #[test]
    fn prop_word_distance_decreasing(d in 0u32..100) {
        prop_assert!(word_distance(d) > word_distance(d + 1));
    }

    #[test]
    fn prop_word_distance_cutoff(d in 101u32..100_000) {
        prop_assert_eq!(word_distance(d), 1e-30);
    }

    #[test]
    fn prop_rank_finite_non_negative(d in document(), a in word(), b in word(), n in flags()) {
        for q in [
            Query::term(a.as_str()).and(Query::term(b.as_str())),
            Query::term(a.as_str()).or(Query::term(b.as_str())),
            Query::prefix(a.as_str()).negate(),
        ] {
            let r = rank(&d, &q, &Weights::default(), n).unwrap();
            prop_assert!(r.is_finite() && r >= 0.0, "rank {}", r);
        }
    }

    #[test]
    fn prop_and_rank_at_most_one(d in document(), a in word(), b in word()) {
        prop_assume!(a != b);
        let q = Query::term(a.as_str()).and(Query::term(b.as_str()));
        let r = rank(&d, &q, &Weights::default(), Normalization::empty()).unwrap();
        prop_assert!(r <= 1.0);
    }

    #[test]
    fn prop_payloads_agree_with_document((d, [a, b, c]) in document_with_terms()) {
        let q = Query::term(a.as_str()).and(Query::term(b.as_str())).and(Query::term(c.as_str()));
        let payloads = payloads_for(&d, &q);
        prop_assert!(payloads.is_some(), "every term comes from the document");
        let payloads = payloads.unwrap();
        let from_doc = rank(&d, &q, &Weights::default(), Normalization::empty()).unwrap();
        let from_payloads = rank_positions(&Weights::default(), &q, &as_slices(&payloads)).unwrap();
        prop_assert!((from_doc - from_payloads).abs() <= 1e-6 * from_doc.max(1.0));
    }

    #[test]
    fn prop_negative_weights_select_defaults(d in document(), a in word(), b in word()) {
        let q = Query::term(a.as_str()).and(Query::term(b.as_str()));
        let sentinel = WeightArray::from_values(&[-1.0, -0.5, -2.0, -1.0]);
        let with_sentinel = rank_with_config(&d, &q, Some(&sentinel), Normalization::empty()).unwrap();
        let with_defaults = rank(&d, &q, &Weights::default(), Normalization::empty()).unwrap();
        prop_assert_eq!(with_sentinel, with_defaults);
    }
}
