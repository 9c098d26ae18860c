// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for cloudseg

pub mod reporter;
pub mod runner;

pub use reporter::Reporter;
pub use runner::{component_file_name, RunSummary, Runner, REPORT_FILE_NAME};
