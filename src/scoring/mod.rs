// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring: how a (document, query) pair becomes one number.
//!
//! Two kernels. When the query root is AND or PHRASE, every pair of query
//! terms is scored by how close their occurrences sit, and the pair scores
//! are folded together with noisy-OR. Otherwise each term is scored on its
//! own occurrences with diminishing returns, and the term scores averaged.
//!
//! The same kernels run over two inputs: a full [`Document`](crate::Document)
//! ([`rank`]) or the compressed per-operand position payloads the index keeps
//! next to each key ([`rank_positions`]), which is cheap enough to use before
//! the document is fetched.

mod core;
mod normalize;
mod positional;
mod ranking;
mod weights;

pub use core::*;
pub use normalize::{normalize, DocumentStats, Normalization};
pub use positional::{positions_distance_with, rank_positions};
pub use ranking::{rank, rank_and, rank_or, rank_with_config};
pub use weights::{WeightArray, Weights};
