// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for ranking straight from index payloads.
//!
//! Whatever bytes the index hands back, ranking must either fail with an
//! error or return a finite, non-negative score, and the distance must be
//! its reciprocal.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use proxrank::{positions_distance, rank_positions, Query, Weights};

/// Up to four operands joined by one operator, each with a raw payload.
#[derive(Debug, Arbitrary)]
struct RankInput {
    operator: u8,
    words: Vec<(u8, bool, u8)>,
    payloads: Vec<Option<Vec<u8>>>,
}

fuzz_target!(|input: RankInput| {
    let mut query: Option<Query> = None;
    for &(letter, prefix, mask) in input.words.iter().take(4) {
        let word = format!("{}", (b'a' + letter % 6) as char);
        let leaf = if prefix {
            Query::prefix(word)
        } else {
            Query::term(word)
        };
        let leaf = leaf.with_weights(mask);
        query = Some(match query {
            None => leaf,
            Some(q) => match input.operator % 3 {
                0 => q.and(leaf),
                1 => q.or(leaf),
                _ => q.phrase(leaf),
            },
        });
    }
    let Some(query) = query else {
        return;
    };

    let payloads: Vec<Option<&[u8]>> = input
        .payloads
        .iter()
        .take(8)
        .map(|p| p.as_deref())
        .collect();

    let Ok(score) = rank_positions(&Weights::default(), &query, &payloads) else {
        return;
    };
    assert!(score.is_finite(), "score {} is not finite", score);
    assert!(score >= 0.0, "score {} is negative", score);

    let distance = positions_distance(&query, &payloads).expect("ranked once, must rank again");
    assert_eq!(distance, 1.0 / f64::from(score));
});
