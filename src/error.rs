// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for point cloud processing

use std::collections::TryReserveError;

/// Result type alias
pub type Result<T> = std::result::Result<T, CloudError>;

/// Point cloud processing errors
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The cloud has no points
    #[error("Cloud '{0}' is empty")]
    EmptyCloud(String),

    /// None of the cloud's points has finite coordinates
    #[error("Cloud '{0}' has no point with finite coordinates")]
    NoFinitePoints(String),

    /// Octree level outside of the supported range
    #[error("Invalid octree level {level} (maximum is {max})")]
    InvalidOctreeLevel {
        /// Requested level
        level: u8,
        /// Deepest supported level
        max: u8,
    },

    /// A fallible reservation failed
    #[error("Not enough memory: {0}")]
    OutOfMemory(String),

    /// A scalar field with this name already exists
    #[error("Scalar field already exists: {0}")]
    DuplicateScalarField(String),

    /// An operation needs a current scalar field and none is set
    #[error("No current scalar field")]
    NoCurrentScalarField,

    /// Array length does not match the cloud size
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Expected element count
        expected: usize,
        /// Provided element count
        actual: usize,
    },

    /// Point or field index out of range
    #[error("Index {index} out of range (size {size})")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Container size
        size: usize,
    },

    /// More components than a label value can tell apart
    #[error("Too many components to label: {count} (maximum is {max})")]
    TooManyLabels {
        /// Components found so far
        count: u64,
        /// Largest exact label
        max: u32,
    },

    /// Flat array with an unexpected shape
    #[error("Invalid array: {0}")]
    InvalidArray(String),
}

impl CloudError {
    /// Wrap a failed reservation with the name of what was being allocated
    pub fn out_of_memory(what: &str, err: TryReserveError) -> Self {
        Self::OutOfMemory(format!("{} ({})", what, err))
    }
}
