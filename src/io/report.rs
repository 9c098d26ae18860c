// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON report of an extraction run

use crate::config::ExtractionParams;
use crate::segmentation::{CloudOutcome, ExtractionResult, TooManyComponents};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One written component cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub source: String,
    pub name: String,
    pub points: usize,
    pub file: Option<PathBuf>,
}

/// Complete extraction report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub timestamp: String,
    pub params: ExtractionParams,
    pub input_files: Vec<PathBuf>,
    pub processed_clouds: usize,
    pub outcomes: Vec<CloudOutcome>,
    pub aborted: Option<TooManyComponents>,
    pub components: Vec<ComponentEntry>,
}

impl ExtractionReport {
    pub fn new(params: &ExtractionParams, input_files: Vec<PathBuf>, result: &ExtractionResult) -> Self {
        let components = result
            .components_by_source()
            .into_iter()
            .flat_map(|(source, clouds)| {
                clouds.iter().map(move |cloud| ComponentEntry {
                    source: source.to_string(),
                    name: cloud.name().to_string(),
                    points: cloud.size(),
                    file: None,
                })
            })
            .collect();

        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            params: params.clone(),
            input_files,
            processed_clouds: result.processed_clouds,
            outcomes: result.outcomes.clone(),
            aborted: result.aborted.clone(),
            components,
        }
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Save report as pretty JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?;
        serde_json::from_str(&json).context("Failed to parse report")
    }
}
