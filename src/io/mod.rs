// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - cloud files, discovery and run reports

mod cloud_file;
mod discovery;
mod report;

pub use cloud_file::{load_cloud, load_entities, save_cloud, save_entities};
pub use discovery::discover_cloud_files;
pub use report::{ComponentEntry, ExtractionReport};
