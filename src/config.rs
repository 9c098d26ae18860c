// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Extraction parameters and their configuration file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::segmentation::MaterializeOptions;

/// Default configuration file looked up by [`ExtractionParams::load`]
pub const CONFIG_FILE_NAME: &str = "cloudseg.toml";

/// Parameters of a connected-component extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionParams {
    /// Octree level the connectivity is evaluated at
    pub octree_level: u8,
    /// Smallest component turned into a cloud
    pub min_component_size: usize,
    /// Abort when a cloud yields more qualifying components than this
    pub max_number_components: usize,
    /// Give each component one random color
    pub random_colors: bool,
    /// Face-only adjacency between octree cells
    pub six_connexity: bool,
    /// Emit components largest first
    pub sort_by_size: bool,
    /// Seed for random colors; entropy when unset
    pub color_seed: Option<u64>,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            octree_level: 8,
            min_component_size: 100,
            max_number_components: 100,
            random_colors: false,
            six_connexity: false,
            sort_by_size: true,
            color_seed: None,
        }
    }
}

impl ExtractionParams {
    /// Load parameters from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let params: ExtractionParams = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(params)
    }

    /// `cloudseg.toml` from the working directory if present, then environment overrides
    pub fn load() -> Result<Self> {
        let mut params = if PathBuf::from(CONFIG_FILE_NAME).exists() {
            Self::from_file(CONFIG_FILE_NAME)?
        } else {
            Self::default()
        };
        params.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(params)
    }

    /// Apply `CLOUDSEG_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("CLOUDSEG_OCTREE_LEVEL") {
            self.octree_level = level
                .parse()
                .with_context(|| format!("Invalid CLOUDSEG_OCTREE_LEVEL: {}", level))?;
        }

        if let Some(min) = lookup("CLOUDSEG_MIN_COMPONENT_SIZE") {
            self.min_component_size = min
                .parse()
                .with_context(|| format!("Invalid CLOUDSEG_MIN_COMPONENT_SIZE: {}", min))?;
        }

        if let Some(max) = lookup("CLOUDSEG_MAX_COMPONENTS") {
            self.max_number_components = max
                .parse()
                .with_context(|| format!("Invalid CLOUDSEG_MAX_COMPONENTS: {}", max))?;
        }

        if let Some(random) = lookup("CLOUDSEG_RANDOM_COLORS") {
            self.random_colors = random
                .parse()
                .with_context(|| format!("Invalid CLOUDSEG_RANDOM_COLORS: {}", random))?;
        }

        if let Some(seed) = lookup("CLOUDSEG_COLOR_SEED") {
            self.color_seed = Some(
                seed.parse()
                    .with_context(|| format!("Invalid CLOUDSEG_COLOR_SEED: {}", seed))?,
            );
        }

        Ok(())
    }

    /// Save parameters to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            min_points_per_component: self.min_component_size,
            random_colors: self.random_colors,
            sort_by_size: self.sort_by_size,
        }
    }
}
