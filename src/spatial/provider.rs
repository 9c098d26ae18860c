// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial index access for batch operations

use super::Octree;
use crate::error::Result;
use crate::geometry::PointCloud;
use std::sync::Arc;

/// Supplies the spatial index of a cloud
pub trait SpatialIndexProvider {
    /// Cached index of the cloud, built and cached first if missing
    fn get_or_build(&self, cloud: &mut PointCloud) -> Result<Arc<Octree>>;
}

/// Default provider: the octree cached on the cloud itself
#[derive(Debug, Default, Clone, Copy)]
pub struct OctreeProvider;

impl SpatialIndexProvider for OctreeProvider {
    fn get_or_build(&self, cloud: &mut PointCloud) -> Result<Arc<Octree>> {
        if let Some(octree) = cloud.octree() {
            if octree.cloud_size() == cloud.size() {
                return Ok(octree);
            }
            log::debug!("Cached octree of '{}' is stale, rebuilding", cloud.name());
        }
        log::debug!("Computing octree for cloud '{}'", cloud.name());
        cloud.compute_octree()
    }
}
