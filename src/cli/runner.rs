// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Extraction runs over cloud files

use crate::config::ExtractionParams;
use crate::geometry::{Entity, PointCloud};
use crate::io::{self, ExtractionReport};
use crate::segmentation::{ComponentExtractor, ExtractionResult};
use ahash::AHashSet;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Report file written next to the components
pub const REPORT_FILE_NAME: &str = "report.json";

/// Outcome of a [`Runner::run`]
pub struct RunSummary {
    pub result: ExtractionResult,
    pub report: ExtractionReport,
    pub duration: Duration,
}

/// Loads cloud files, extracts components and writes them out
pub struct Runner {
    params: ExtractionParams,
    extractor: ComponentExtractor,
    show_progress: bool,
}

impl Runner {
    pub fn new(params: ExtractionParams) -> Self {
        Self {
            params,
            extractor: ComponentExtractor::new(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn params(&self) -> &ExtractionParams {
        &self.params
    }

    /// Extract components from every cloud found under `inputs` into `out_dir`
    pub fn run(&self, inputs: &[PathBuf], out_dir: &Path) -> Result<RunSummary> {
        let start = Instant::now();
        let files = io::discover_cloud_files(inputs)?;
        log::info!("Found {} cloud file(s)", files.len());

        let mut entities = self.load_all(&files)?;
        let result = self.extractor.extract(&mut entities, &self.params);

        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

        let mut report = ExtractionReport::new(&self.params, files, &result);
        let mut taken: AHashSet<String> = AHashSet::new();
        taken.insert(REPORT_FILE_NAME.to_string());
        let mut entries = report.components.iter_mut();
        for (source, clouds) in result.components_by_source() {
            let names = component_file_names(&mut taken, source, clouds);
            for ((cloud, name), entry) in clouds.iter().zip(names).zip(entries.by_ref()) {
                let path = out_dir.join(name);
                io::save_cloud(&path, cloud)?;
                log::debug!("Wrote {}", path.display());
                entry.file = Some(path);
            }
        }
        report.save_json(&out_dir.join(REPORT_FILE_NAME))?;

        Ok(RunSummary {
            result,
            report,
            duration: start.elapsed(),
        })
    }

    fn load_all(&self, files: &[PathBuf]) -> Result<Vec<Entity>> {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut entities = Vec::new();
        for file in files {
            if let Some(pb) = &pb {
                pb.set_message(file.display().to_string());
            }
            match io::load_entities(file) {
                Ok(loaded) => entities.extend(loaded),
                Err(e) => log::warn!("Skipping {}: {:#}", file.display(), e),
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(entities)
    }
}

/// `<source>_<component>.json`, with path-hostile characters replaced
pub fn component_file_name(source: &str, component: &str) -> String {
    format!("{}_{}.json", sanitize_file_stem(source), sanitize_file_stem(component))
}

fn sanitize_file_stem(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '#') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File names for the components of one source cloud, none of them in `taken`.
///
/// Sources sharing a name get `_2`, `_3`, ... appended. The returned names
/// are added to `taken`.
fn component_file_names(taken: &mut AHashSet<String>, source: &str, clouds: &[PointCloud]) -> Vec<String> {
    let stem = (1usize..)
        .map(|n| match n {
            1 => source.to_string(),
            n => format!("{}_{}", source, n),
        })
        .find(|stem| {
            clouds
                .iter()
                .all(|cloud| !taken.contains(&component_file_name(stem, cloud.name())))
        })
        .unwrap_or_else(|| source.to_string());

    clouds
        .iter()
        .map(|cloud| {
            let mut name = component_file_name(&stem, cloud.name());
            let mut n = 2usize;
            while taken.contains(&name) {
                name = component_file_name(&stem, &format!("{}_{}", cloud.name(), n));
                n += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}
