// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Index subsets of a point cloud

use nalgebra::Point3;

use super::Rgba;

/// Read-only access to any entity exposing points.
///
/// Implemented by [`super::PointCloud`] and by mesh vertex sets.
pub trait GenericPointCloud {
    fn name(&self) -> &str;
    fn size(&self) -> usize;
    fn point(&self, index: usize) -> Option<&Point3<f32>>;
    fn point_color(&self, index: usize) -> Option<Rgba>;
    fn has_colors(&self) -> bool;
}

/// Ordered list of point indices into one source cloud
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCloud {
    indices: Vec<usize>,
}

impl ReferenceCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn add_point_index(&mut self, index: usize) {
        self.indices.push(index);
    }

    pub fn size(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Groups produced by one labeling pass, in discovery order
pub type ReferenceCloudContainer = Vec<ReferenceCloud>;
