// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the proxrank command-line interface.
//!
//! Three subcommands: `rank` to score a document against a query, `extract`
//! to show what the index framework would receive, and `codec` to encode or
//! decode position payloads by hand. Documents and queries are JSON files in
//! the crate's serde format.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "proxrank",
    about = "Proximity ranking of documents against keyword queries",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a document against a query and print rank and distance
    Rank {
        /// Document JSON: array of {"lexeme", "positions"} entries
        #[arg(short, long)]
        document: PathBuf,

        /// Query JSON: flat node arena, root first
        #[arg(short, long)]
        query: PathBuf,

        /// Ranking config JSON ({"weights": [...], "normalization": N})
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Weights for levels D,C,B,A; negative keeps the default.
        /// Overrides the config file.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        weights: Option<Vec<f32>>,

        /// Normalization flags (bitwise OR). Overrides the config file.
        #[arg(short, long)]
        normalization: Option<u32>,
    },

    /// Show the keys and payloads extracted from a document or query
    Extract {
        /// Document JSON to extract
        #[arg(short, long, conflicts_with = "query", required_unless_present = "query")]
        document: Option<PathBuf>,

        /// Query JSON to extract
        #[arg(short, long)]
        query: Option<PathBuf>,
    },

    /// Encode or decode a position payload
    Codec {
        #[command(subcommand)]
        action: CodecAction,
    },
}

#[derive(Subcommand)]
pub enum CodecAction {
    /// Encode positions given as OFFSET:LEVEL (e.g. 1:A 5:D), ascending
    Encode {
        #[arg(required = true)]
        positions: Vec<String>,
    },

    /// Decode a hex payload into positions
    Decode {
        /// Payload bytes as hex (e.g. 6104)
        hex: String,
    },
}
