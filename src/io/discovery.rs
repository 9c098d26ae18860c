// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cloud file discovery

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_cloud_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "json")
}

/// Expand files and directories into a sorted list of `.json` cloud files
pub fn discover_cloud_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if is_cloud_file(path) {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if is_cloud_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if !path.exists() {
            bail!("Input not found: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
