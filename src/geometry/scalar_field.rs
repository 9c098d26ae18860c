// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Named per-point scalar fields

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};

/// Per-point scalar values attached to a cloud.
///
/// Invalid values are stored as NaN and ignored by [`ScalarField::compute_min_and_max`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    name: String,
    #[serde(with = "nan_as_null")]
    values: Vec<f32>,
    #[serde(skip)]
    range: Option<(f32, f32)>,
}

/// JSON has no NaN: invalid values travel as `null`
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| (!v.is_nan()).then_some(*v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        let values = Vec::<Option<f32>>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
    }
}

impl ScalarField {
    /// Allocate a field of `len` NaN values, failing instead of aborting on OOM
    pub fn try_new(name: impl Into<String>, len: usize) -> Result<Self> {
        let name = name.into();
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|e| CloudError::out_of_memory(&format!("scalar field '{}'", name), e))?;
        values.resize(len, f32::NAN);
        Ok(Self {
            name,
            values,
            range: None,
        })
    }

    pub fn from_values(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            values,
            range: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        self.range = None;
        &mut self.values
    }

    pub fn value(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn set_value(&mut self, index: usize, value: f32) -> Result<()> {
        let size = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(CloudError::IndexOutOfRange { index, size })?;
        *slot = value;
        self.range = None;
        Ok(())
    }

    /// Recompute the cached value range, skipping NaN entries
    pub fn compute_min_and_max(&mut self) -> Option<(f32, f32)> {
        self.range = self
            .values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        self.range
    }

    /// Range from the last [`ScalarField::compute_min_and_max`] call
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.range
    }

    pub(crate) fn push(&mut self, value: f32) {
        self.values.push(value);
        self.range = None;
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.values
            .try_reserve(additional)
            .map_err(|e| CloudError::out_of_memory(&format!("scalar field '{}'", self.name), e))
    }
}
