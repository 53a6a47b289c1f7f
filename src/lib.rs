// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Proximity-aware ranking of tokenized documents against boolean keyword queries.
//!
//! Documents are bags of lexemes with weighted positions; queries are boolean
//! trees over lexemes. A document scores high when the query's terms appear
//! close together and at important positions. The crate also carries the
//! compact codec that lets position lists travel through an external index as
//! opaque per-key payloads, so candidates can be ranked mid-scan.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │  types.rs   │────▶│  operand.rs  │────▶│    scoring/      │
//! │ (Document,  │     │ (dedupe,     │     │ (word_distance,  │
//! │  Query)     │     │  locate)     │     │  rank, normalize)│
//! └─────────────┘     └──────────────┘     └──────────────────┘
//!        │                                          ▲
//!        ▼                                          │
//! ┌─────────────┐                          ┌──────────────────┐
//! │  binary/    │─────────────────────────▶│   adapter.rs     │
//! │ (position   │   payloads               │ (extract, check, │
//! │  codec)     │                          │  distance)       │
//! └─────────────┘                          └──────────────────┘
//! ```
//!
//! Everything is a pure function of its inputs. Nothing is cached between
//! calls, so any number of calls can run concurrently.
//!
//! # Usage
//!
//! ```
//! use proxrank::{document_distance, DocEntry, Document, Position, Query, WeightLevel};
//!
//! let doc = Document::from_unsorted(vec![
//!     DocEntry::new("cat", vec![Position { offset: 1, weight: WeightLevel::A }]),
//!     DocEntry::new("dog", vec![Position { offset: 5, weight: WeightLevel::D }]),
//! ]);
//! let query = Query::term("cat").and(Query::term("dog"));
//!
//! let distance = document_distance(&doc, &query).unwrap();
//! assert!((distance - 3.32).abs() < 0.01);
//! ```

pub mod binary;
pub mod contracts;
pub mod scoring;

mod adapter;
mod config;
mod error;
mod operand;
mod types;

pub use adapter::{
    document_distance, document_distance_with, extract_document, extract_query, index_config,
    positions_distance, pre_consistent, requires_match, AddInfoKind, Consistency,
    ExtractedDocument, ExtractedEntry, ExtractedQuery, IndexConfig, SearchMode,
};
pub use config::{ConfigError, RankConfig};
pub use error::{InvariantError, RankError, Result};
pub use operand::{dedupe_and_sort, locate, SortedOperands};
pub use scoring::{
    normalize, rank, rank_positions, rank_to_distance, rank_with_config, word_distance,
    DocumentStats, Normalization, WeightArray, Weights,
};
pub use types::{
    compare_lexemes, compare_prefix, DocEntry, Document, EntryPositions, Lexeme, OperatorKind,
    Position, Query, QueryNode, QueryOperand, WeightLevel, MAX_ENTRY_POS, MAX_POSITION_OFFSET,
};
