// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Entities handed to batch operations

use super::{Mesh, PointCloud};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Kind of a scene entity; batch operations pick what they can process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    PointCloud(PointCloud),
    Mesh(Mesh),
    /// Anything else (polylines, labels, groups...)
    Other { name: String },
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Entity::PointCloud(cloud) => cloud.name(),
            Entity::Mesh(mesh) => mesh.name(),
            Entity::Other { name } => name,
        }
    }

    pub fn as_point_cloud(&self) -> Option<&PointCloud> {
        match self {
            Entity::PointCloud(cloud) => Some(cloud),
            Entity::Mesh(_) | Entity::Other { .. } => None,
        }
    }

    pub fn as_point_cloud_mut(&mut self) -> Option<&mut PointCloud> {
        match self {
            Entity::PointCloud(cloud) => Some(cloud),
            Entity::Mesh(_) | Entity::Other { .. } => None,
        }
    }

    /// Check attribute sizes and indices after loading
    pub fn validate(&self) -> Result<()> {
        match self {
            Entity::PointCloud(cloud) => cloud.validate(),
            Entity::Mesh(mesh) => mesh.validate(),
            Entity::Other { .. } => Ok(()),
        }
    }
}

impl From<PointCloud> for Entity {
    fn from(cloud: PointCloud) -> Self {
        Entity::PointCloud(cloud)
    }
}

impl From<Mesh> for Entity {
    fn from(mesh: Mesh) -> Self {
        Entity::Mesh(mesh)
    }
}
