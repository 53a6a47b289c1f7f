// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Weight-level configuration.
//!
//! Callers may pass a four-element array overriding the default weight of
//! each level (D, C, B, A). Negative elements keep the default. The resolved
//! table is a plain `Copy` value built per call, so concurrent calls with
//! different arrays never see each other's weights.

use serde::Deserialize;
use serde_json::Value;

use super::core::DEFAULT_WEIGHTS;
use crate::error::{RankError, Result};
use crate::types::WeightLevel;

/// Resolved weight per level, indexed by [`WeightLevel::bits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights([f32; 4]);

impl Default for Weights {
    fn default() -> Self {
        Weights(DEFAULT_WEIGHTS)
    }
}

impl Weights {
    #[inline]
    pub fn get(&self, level: WeightLevel) -> f32 {
        self.0[level.bits() as usize]
    }

    #[inline]
    pub fn as_array(&self) -> [f32; 4] {
        self.0
    }

    /// Validate a caller-supplied array and resolve it against the defaults.
    ///
    /// Checks run in this order: one dimension, at least four elements, no
    /// nulls anywhere, then each of the first four resolved values `<= 1.0`.
    /// `None` means "no array": the defaults.
    pub fn resolve(array: Option<&WeightArray>) -> Result<Weights> {
        let Some(array) = array else {
            return Ok(Weights::default());
        };

        if array.ndim != 1 {
            return Err(RankError::WeightsNotOneDimensional { ndim: array.ndim });
        }
        if array.values.len() < DEFAULT_WEIGHTS.len() {
            return Err(RankError::WeightsTooShort {
                len: array.values.len(),
            });
        }
        if array.values.iter().any(Option::is_none) {
            return Err(RankError::WeightsContainNull);
        }

        let mut resolved = DEFAULT_WEIGHTS;
        for (index, slot) in resolved.iter_mut().enumerate() {
            let value = array.values[index].unwrap_or(-1.0);
            if value.is_nan() {
                return Err(RankError::WeightOutOfRange { index, value });
            }
            if value >= 0.0 {
                *slot = value;
            }
            if *slot > 1.0 {
                return Err(RankError::WeightOutOfRange { index, value });
            }
        }

        Ok(Weights(resolved))
    }
}

/// A weight array as the caller sent it: dimensionality plus flattened elements.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct WeightArray {
    pub ndim: usize,
    pub values: Vec<Option<f32>>,
}

impl WeightArray {
    /// One-dimensional array of present values.
    pub fn from_values(values: &[f32]) -> Self {
        WeightArray {
            ndim: 1,
            values: values.iter().copied().map(Some).collect(),
        }
    }

    /// Parse a JSON value. Nesting depth is the dimensionality; an empty
    /// array has no dimensions.
    pub fn from_json(value: &Value) -> Result<Self> {
        let ndim = dimensions(value);
        let mut values = Vec::new();
        flatten(value, &mut values)?;
        Ok(WeightArray { ndim, values })
    }
}

impl TryFrom<Value> for WeightArray {
    type Error = RankError;

    fn try_from(value: Value) -> Result<Self> {
        WeightArray::from_json(&value)
    }
}

fn dimensions(value: &Value) -> usize {
    match value {
        Value::Array(items) => match items.first() {
            Some(first) => 1 + dimensions(first),
            None => 0,
        },
        _ => 0,
    }
}

fn flatten(value: &Value, out: &mut Vec<Option<f32>>) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out)?;
            }
        }
        Value::Null => out.push(None),
        Value::Number(n) => match n.as_f64() {
            Some(f) => out.push(Some(f as f32)),
            None => return Err(RankError::WeightNotNumeric { index: out.len() }),
        },
        _ => return Err(RankError::WeightNotNumeric { index: out.len() }),
    }
    Ok(())
}
