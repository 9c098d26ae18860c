// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON cloud files

use crate::geometry::{Entity, PointCloud};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufReader;
use std::path::Path;

/// A file holds either one entity or a list of them
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum CloudDocument {
    Many(Vec<Entity>),
    One(Entity),
}

/// Load every entity stored in a JSON cloud file
pub fn load_entities(path: &Path) -> Result<Vec<Entity>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open cloud file: {}", path.display()))?;

    let document: CloudDocument = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse cloud file: {}", path.display()))?;

    let entities = match document {
        CloudDocument::Many(entities) => entities,
        CloudDocument::One(entity) => vec![entity],
    };
    for entity in &entities {
        entity
            .validate()
            .with_context(|| format!("Invalid entity '{}' in {}", entity.name(), path.display()))?;
    }
    Ok(entities)
}

/// Load the first point cloud of a JSON cloud file
pub fn load_cloud(path: &Path) -> Result<PointCloud> {
    load_entities(path)?
        .into_iter()
        .find_map(|entity| match entity {
            Entity::PointCloud(cloud) => Some(cloud),
            _ => None,
        })
        .with_context(|| format!("No point cloud in {}", path.display()))
}

/// Write one cloud as a single-entity JSON file
pub fn save_cloud(path: &Path, cloud: &PointCloud) -> Result<()> {
    let json = serde_json::to_string(&EntityRef::PointCloud(cloud))
        .with_context(|| format!("Failed to serialize cloud '{}'", cloud.name()))?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write a list of entities
pub fn save_entities(path: &Path, entities: &[Entity]) -> Result<()> {
    let json = serde_json::to_string(entities).context("Failed to serialize entities")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Borrowing twin of [`Entity`] so clouds are written without a copy
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EntityRef<'a> {
    PointCloud(&'a PointCloud),
}
