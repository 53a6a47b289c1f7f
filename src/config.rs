// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranking configuration file.
//!
//! ```json
//! { "weights": [0.1, 0.2, -1, 1.0], "normalization": 8 }
//! ```
//!
//! Both fields are optional. `weights` is kept as raw JSON until resolved so
//! that a malformed array reports the same errors as one passed per call.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RankError;
use crate::scoring::{Normalization, WeightArray, Weights};

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankConfig {
    /// Per-level weights (D, C, B, A); negative entries keep the default.
    pub weights: Option<serde_json::Value>,
    /// Bitwise OR of [`Normalization`] flags.
    pub normalization: u32,
}

impl RankConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// The weight array as given, if any.
    pub fn weight_array(&self) -> Result<Option<WeightArray>, RankError> {
        self.weights.as_ref().map(WeightArray::from_json).transpose()
    }

    /// Validated weights; defaults when none are configured.
    pub fn weights(&self) -> Result<Weights, RankError> {
        Weights::resolve(self.weight_array()?.as_ref())
    }

    /// Normalization flags; unknown bits are dropped.
    pub fn normalization(&self) -> Normalization {
        Normalization::from_bits_truncate(self.normalization)
    }
}
