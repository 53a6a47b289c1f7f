// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use proxrank::binary::{decode_positions, encode_positions_to_vec};
use proxrank::{
    extract_document, extract_query, rank_to_distance, rank_with_config, Document, Position,
    Query, RankConfig, WeightArray,
};

mod cli;
use cli::display::{self, field, row, section_bot, section_top, styled, BOLD};
use cli::{Cli, CodecAction, Commands};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Rank {
            document,
            query,
            config,
            weights,
            normalization,
        } => run_rank(&document, &query, config.as_deref(), weights, normalization),
        Commands::Extract { document, query } => match (document, query) {
            (Some(document), _) => run_extract_document(&document),
            (None, Some(query)) => run_extract_query(&query),
            (None, None) => Err("pass --document or --query".to_string()),
        },
        Commands::Codec { action } => match action {
            CodecAction::Encode { positions } => run_encode(&positions),
            CodecAction::Decode { hex } => run_decode(&hex),
        },
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean for results. `RUST_LOG` wins.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("proxrank=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))
}

fn run_rank(
    document_path: &Path,
    query_path: &Path,
    config_path: Option<&Path>,
    weights: Option<Vec<f32>>,
    normalization: Option<u32>,
) -> Result<(), String> {
    let document: Document = read_json(document_path)?;
    let query: Query = read_json(query_path)?;

    let mut config = match config_path {
        Some(path) => RankConfig::from_path(path).map_err(|e| e.to_string())?,
        None => RankConfig::default(),
    };
    if let Some(n) = normalization {
        config.normalization = n;
    }

    let weight_array = match weights {
        Some(values) => Some(WeightArray::from_values(&values)),
        None => config.weight_array().map_err(|e| e.to_string())?,
    };
    let flags = config.normalization();

    info!(
        entries = document.len(),
        nodes = query.len(),
        normalization = flags.bits(),
        "ranking"
    );
    let rank = rank_with_config(&document, &query, weight_array.as_ref(), flags)
        .map_err(|e| e.to_string())?;

    section_top("RANK");
    field("rank", &display::rank_value(rank));
    field("distance", &format!("{:.6}", rank_to_distance(rank)));
    field("normalization", &format!("{:#04x}", flags.bits()));
    section_bot();
    Ok(())
}

fn run_extract_document(path: &Path) -> Result<(), String> {
    let document: Document = read_json(path)?;
    let extracted = extract_document(&document);

    section_top("DOCUMENT KEYS");
    for entry in &extracted.entries {
        let payload = match &entry.payload {
            Some(bytes) => hex::encode(bytes),
            None => styled(&[display::DIM], "(no positions)"),
        };
        field(&entry.key.to_string(), &payload);
    }
    section_bot();
    Ok(())
}

fn run_extract_query(path: &Path) -> Result<(), String> {
    let query: Query = read_json(path)?;
    let extracted = extract_query(&query).map_err(|e| e.to_string())?;

    section_top("QUERY KEYS");
    for (i, (key, prefix)) in extracted.keys.iter().zip(&extracted.prefix).enumerate() {
        let marker = if *prefix { ":*" } else { "" };
        field(&format!("#{}", i), &format!("{}{}", key, marker));
    }
    let map: Vec<String> = extracted
        .operand_map
        .iter()
        .map(|slot| slot.map_or_else(|| "-".to_string(), |i| i.to_string()))
        .collect();
    field("operand map", &format!("[{}]", map.join(", ")));
    field("search mode", &format!("{:?}", extracted.search_mode));
    section_bot();
    Ok(())
}

fn run_encode(args: &[String]) -> Result<(), String> {
    let positions = args
        .iter()
        .map(|s| display::parse_position(s))
        .collect::<Result<Vec<Position>, String>>()?;
    if positions.windows(2).any(|w| w[0].offset > w[1].offset) {
        return Err("positions must be given in ascending offset order".to_string());
    }

    let bytes = encode_positions_to_vec(&positions);
    println!("{}", hex::encode(&bytes));
    Ok(())
}

/// Hex text from the command line, surrounding whitespace ignored.
fn parse_payload(text: &str) -> Result<Vec<u8>, String> {
    hex::decode(text.trim()).map_err(|e| format!("Invalid hex payload: {}", e))
}

fn run_decode(hex: &str) -> Result<(), String> {
    let bytes = parse_payload(hex)?;
    let positions = decode_positions(&bytes).map_err(|e| format!("Corrupt payload: {}", e))?;

    section_top("POSITIONS");
    row(&styled(&[BOLD], &format!("{} positions, {} bytes", positions.len(), bytes.len())));
    let formatted: Vec<String> = positions.iter().map(display::format_position).collect();
    for chunk in formatted.chunks(8) {
        row(&chunk.join("  "));
    }
    section_bot();
    Ok(())
}
