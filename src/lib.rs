// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! cloudseg
//!
//! Connected-component extraction for point clouds. Points are bucketed into
//! the cells of an octree level, occupied cells touching each other form a
//! component, and every large enough component becomes a new cloud.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod segmentation;
pub mod spatial;

pub use config::ExtractionParams;
pub use error::{CloudError, Result};
pub use geometry::{Entity, GlobalShift, Mesh, PointCloud, ReferenceCloud, ScalarField};
pub use segmentation::{ComponentExtractor, ExtractionResult};
pub use spatial::{Octree, MAX_OCTREE_LEVEL};

/// Extract the connected components of every point cloud in `entities`
/// with the default octree, labeler and cloud factory.
///
/// Never fails as a whole: per-cloud failures are logged and recorded in
/// [`ExtractionResult::outcomes`].
pub fn extract_connected_components(
    entities: &mut [Entity],
    params: &ExtractionParams,
) -> ExtractionResult {
    ComponentExtractor::new().extract(entities, params)
}
