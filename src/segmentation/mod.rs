// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Connected-component segmentation
//!
//! Labeling over octree cells, ranking by size, materialization into new
//! clouds, and the batch extractor driving the three.

mod extraction;
mod labeler;
mod materializer;
mod ranking;

pub use extraction::{
    CloudOutcome, CloudStage, ComponentExtractor, ExtractionResult, TooManyComponents,
};
pub use labeler::{ComponentLabelingEngine, OctreeLabeler, CC_LABEL_FIELD_NAME};
pub use materializer::{
    component_name, create_components_clouds, CloudFactory, ComponentSource,
    DefaultCloudFactory, MaterializeOptions,
};
pub use ranking::{ComponentIndexAndSize, Ranking};
