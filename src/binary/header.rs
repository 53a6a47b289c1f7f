// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bit layout constants for the position payload.

/// High bit: more delta bits follow in the next byte.
pub const CONTINUATION_BIT: u8 = 0x80;

/// Payload bits carried by a continuation byte.
pub const GROUP_BITS: u32 = 7;

/// Mask for the payload bits of a continuation byte.
pub const GROUP_MASK: u8 = 0x7F;

/// Deltas below this fit in the terminating byte (five bits).
pub const TERMINAL_DELTA_LIMIT: u16 = 0x20;

/// Mask for the delta bits of the terminating byte.
pub const TERMINAL_DELTA_MASK: u8 = 0x1F;

/// Weight level lives in bits 5-6 of the terminating byte.
pub const WEIGHT_SHIFT: u32 = 5;

/// A 14-bit delta needs at most two continuation bytes plus the terminator.
pub const MAX_POSITION_BYTES: usize = 3;
