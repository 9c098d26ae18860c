// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle mesh built over a vertex cloud

use super::{BoundingBox, GenericPointCloud, PointCloud, Rgba};
use crate::error::{CloudError, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh.
///
/// Vertices live in their own [`PointCloud`], so a mesh can be read as a
/// generic point set without being one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    name: String,
    vertices: PointCloud,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: PointCloud) -> Self {
        Self {
            name: name.into(),
            vertices,
            triangles: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &PointCloud {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Add a triangle; returns false if an index is out of range
    pub fn add_triangle(&mut self, triangle: Triangle) -> bool {
        if triangle.indices.iter().any(|&i| i >= self.vertices.size()) {
            return false;
        }
        self.triangles.push(triangle);
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.size()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.vertices.bounding_box()
    }

    /// Check the vertex cloud and that every triangle index is a vertex
    pub fn validate(&self) -> Result<()> {
        self.vertices.validate()?;
        let size = self.vertices.size();
        match self
            .triangles
            .iter()
            .flat_map(|t| t.indices)
            .find(|&i| i >= size)
        {
            Some(index) => Err(CloudError::IndexOutOfRange { index, size }),
            None => Ok(()),
        }
    }
}

impl GenericPointCloud for Mesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.vertices.size()
    }

    fn point(&self, index: usize) -> Option<&Point3<f32>> {
        self.vertices.point(index)
    }

    fn point_color(&self, index: usize) -> Option<Rgba> {
        self.vertices.point_color(index)
    }

    fn has_colors(&self) -> bool {
        self.vertices.has_colors()
    }
}
