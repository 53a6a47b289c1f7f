//! Tests for the ranking kernels through the public entry points.

use proxrank::scoring::{rank_and, rank_or, DEFAULT_WEIGHTS, PI_SQUARED_OVER_SIX, SCORE_FLOOR};
use proxrank::{
    normalize, rank, rank_with_config, word_distance, DocumentStats, Normalization, Query,
    RankError, SortedOperands, WeightArray, WeightLevel, Weights,
};

use crate::common::{cat_dog, doc, sentence};

fn plain(document: &proxrank::Document, query: &Query) -> f32 {
    rank(document, query, &Weights::default(), Normalization::empty()).unwrap()
}

// ============================================================================
// KERNEL
// ============================================================================

#[test]
fn test_word_distance_shape() {
    assert!((word_distance(4) - 0.9071).abs() < 1e-3);
    assert!(word_distance(1) > word_distance(2));
    assert_eq!(word_distance(101), 1e-30);
    assert_eq!(word_distance(u32::MAX), 1e-30);
}

// ============================================================================
// AND / PHRASE
// ============================================================================

#[test]
fn test_kernels_reachable_from_scoring_module() {
    let d = cat_dog();
    let q = Query::term("cat").and(Query::term("dog"));
    let sorted = SortedOperands::build(&q).unwrap();
    let w = Weights::default();

    assert_eq!(rank_and(&w, &d, sorted.operands()), plain(&d, &q));
    let or = Query::term("cat").or(Query::term("dog"));
    assert_eq!(rank_or(&w, &d, sorted.operands()), plain(&d, &or));
}

#[test]
fn test_cat_and_dog() {
    let r = plain(&cat_dog(), &Query::term("cat").and(Query::term("dog")));
    let expected = (1.0f32 * 0.1 * word_distance(4)).sqrt();
    assert!((r - expected).abs() < 1e-6);
    assert!((1.0 / r - 3.32).abs() < 0.01);
}

#[test]
fn test_closer_terms_rank_higher() {
    let near = doc(&[
        ("quick", &[(1, WeightLevel::A)]),
        ("fox", &[(2, WeightLevel::A)]),
    ]);
    let far = doc(&[
        ("quick", &[(1, WeightLevel::A)]),
        ("fox", &[(30, WeightLevel::A)]),
    ]);
    let q = Query::term("quick").and(Query::term("fox"));
    assert!(plain(&near, &q) > plain(&far, &q));
}

#[test]
fn test_more_pairs_push_toward_one() {
    let q = Query::term("fox").and(Query::term("dog"));
    let r = plain(&sentence(), &q);
    let single = doc(&[
        ("fox", &[(4, WeightLevel::A)]),
        ("dog", &[(9, WeightLevel::A)]),
    ]);
    assert!(r > plain(&single, &q));
    assert!(r < 1.0);
}

#[test]
fn test_three_terms_pair_every_combination() {
    let q = Query::term("quick")
        .and(Query::term("brown"))
        .and(Query::term("fox"));
    let r = plain(&sentence(), &q);
    assert!(r > plain(&sentence(), &Query::term("quick").and(Query::term("brown"))));
}

#[test]
fn test_and_missing_term_scores_what_is_there() {
    // Only one operand matches: no pair, floored.
    let r = plain(&cat_dog(), &Query::term("cat").and(Query::term("emu")));
    assert_eq!(r, SCORE_FLOOR);
}

// ============================================================================
// OR / per-term
// ============================================================================

#[test]
fn test_or_nothing_matches_is_zero() {
    let r = plain(&cat_dog(), &Query::term("emu").or(Query::term("yak")));
    assert_eq!(r, 0.0);
}

#[test]
fn test_or_repeated_occurrences_have_diminishing_returns() {
    let once = doc(&[("fox", &[(1, WeightLevel::A)])]);
    let twice = doc(&[("fox", &[(1, WeightLevel::A), (9, WeightLevel::A)])]);
    let q = Query::term("fox");
    let r1 = plain(&once, &q);
    let r2 = plain(&twice, &q);
    assert!((r1 - 1.0 / PI_SQUARED_OVER_SIX).abs() < 1e-6);
    assert!((r2 - 1.25 / PI_SQUARED_OVER_SIX).abs() < 1e-6);
}

#[test]
fn test_no_position_term_counts_as_weight_d() {
    let r = plain(&sentence(), &Query::term("the"));
    assert!((r - DEFAULT_WEIGHTS[0] / PI_SQUARED_OVER_SIX).abs() < 1e-6);
}

#[test]
fn test_prefix_or_sums_every_entry() {
    let d = doc(&[
        ("jump", &[(1, WeightLevel::A)]),
        ("jumps", &[(5, WeightLevel::A)]),
        ("jumped", &[(9, WeightLevel::A)]),
    ]);
    // Every "jump*" key follows the insertion point without a gap.
    let r = plain(&d, &Query::prefix("jump"));
    assert!((r - 3.0 / PI_SQUARED_OVER_SIX).abs() < 1e-5);
}

// ============================================================================
// NORMALIZATION AND CONFIGURATION
// ============================================================================

#[test]
fn test_unique_divides_by_distinct_terms() {
    let stats = DocumentStats {
        total_positions: 10,
        unique_lexemes: 4,
    };
    assert_eq!(normalize(1.0, stats, Normalization::UNIQUE), 0.25);
}

#[test]
fn test_normalizations_shrink_rank() {
    let q = Query::term("fox").and(Query::term("dog"));
    let raw = plain(&sentence(), &q);
    for flags in [
        Normalization::LOG_LENGTH,
        Normalization::LENGTH,
        Normalization::UNIQUE,
        Normalization::LOG_UNIQUE,
        Normalization::RDIV_RPLUS1,
    ] {
        let r = rank(&sentence(), &q, &Weights::default(), flags).unwrap();
        assert!(r < raw, "{:?} did not shrink {} (got {})", flags, raw, r);
    }
}

#[test]
fn test_custom_weights() {
    let q = Query::term("cat").and(Query::term("dog"));
    let flat = WeightArray::from_values(&[1.0, -1.0, -1.0, 1.0]);
    let r = rank_with_config(&cat_dog(), &q, Some(&flat), Normalization::empty()).unwrap();
    assert!((r - word_distance(4).sqrt()).abs() < 1e-6);
}

#[test]
fn test_weight_errors_are_configuration_errors() {
    let q = Query::term("cat");
    for bad in [
        WeightArray::from_values(&[0.1, 0.2, 0.3]),
        WeightArray::from_values(&[0.1, 0.2, 0.3, 1.01]),
        WeightArray {
            ndim: 1,
            values: vec![Some(0.1), None, Some(0.4), Some(1.0)],
        },
        WeightArray {
            ndim: 2,
            values: vec![Some(0.1); 4],
        },
    ] {
        let err = rank_with_config(&cat_dog(), &q, Some(&bad), Normalization::empty()).unwrap_err();
        assert!(err.is_configuration(), "{:?}", err);
    }
}

#[test]
fn test_dimension_checked_before_length() {
    let bad = WeightArray {
        ndim: 2,
        values: vec![Some(0.1)],
    };
    assert!(matches!(
        Weights::resolve(Some(&bad)),
        Err(RankError::WeightsNotOneDimensional { ndim: 2 })
    ));
}
