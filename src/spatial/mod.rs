// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial indexing - octree and its providers

mod octree;
mod provider;

pub use octree::{decode, encode, Cell, IndexedCode, Octree, MAX_COMPONENT_LABEL, MAX_OCTREE_LEVEL};
pub use provider::{OctreeProvider, SpatialIndexProvider};
