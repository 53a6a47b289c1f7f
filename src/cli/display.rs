// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output for the proxrank CLI.
//!
//! Boxed sections with a little ANSI styling when stdout is a terminal, plain
//! text otherwise. Respects `NO_COLOR`.

use std::io::IsTerminal;

use proxrank::{Position, WeightLevel};

/// Width between │ and │ (excluding border chars).
pub const BOX_WIDTH: usize = 64;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Colors only on a TTY, and never with `NO_COLOR` set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length, skipping ANSI escapes.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", styled(&[BOLD, CYAN], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("┌{}{}┐", label_part, "─".repeat(remaining));
}

/// │ content          │
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content) + 1);
    println!("│ {}{}│", content, " ".repeat(pad));
}

/// │ key        value │
pub fn field(key: &str, value: &str) {
    row(&format!("{} {}", styled(&[DIM], &format!("{:<14}", key)), value));
}

/// └──────────────────┘
pub fn section_bot() {
    println!("└{}┘", "─".repeat(BOX_WIDTH));
}

// ═══════════════════════════════════════════════════════════════════════════
// FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

pub fn level_name(level: WeightLevel) -> char {
    match level {
        WeightLevel::A => 'A',
        WeightLevel::B => 'B',
        WeightLevel::C => 'C',
        WeightLevel::D => 'D',
    }
}

/// `OFFSET:LEVEL`, the same form `codec encode` accepts.
pub fn format_position(pos: &Position) -> String {
    format!("{}:{}", pos.offset, level_name(pos.weight))
}

pub fn parse_position(s: &str) -> Result<Position, String> {
    let (offset, level) = s
        .split_once(':')
        .ok_or_else(|| format!("expected OFFSET:LEVEL, got '{}'", s))?;
    let offset: u32 = offset
        .parse()
        .map_err(|e| format!("bad offset in '{}': {}", s, e))?;
    let weight = match level.to_ascii_uppercase().as_str() {
        "A" => WeightLevel::A,
        "B" => WeightLevel::B,
        "C" => WeightLevel::C,
        "D" => WeightLevel::D,
        other => return Err(format!("unknown weight level '{}'", other)),
    };
    Position::new(offset, weight).ok_or_else(|| format!("offset {} exceeds 16383", offset))
}

/// Rank colored by strength: ≥0.5 green, ≥0.1 yellow.
pub fn rank_value(rank: f32) -> String {
    let text = format!("{:.6}", rank);
    if rank >= 0.5 {
        styled(&[GREEN, BOLD], &text)
    } else if rank >= 0.1 {
        styled(&[YELLOW], &text)
    } else {
        text
    }
}
