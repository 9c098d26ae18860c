// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::geometry::{Entity, PointCloud};
use crate::segmentation::{CloudOutcome, ExtractionResult};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a batch extraction
    pub fn report_extraction(result: &ExtractionResult, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{}", "Connected components".bold());
        println!("{}", "━".repeat(80).bright_black());

        for outcome in &result.outcomes {
            match outcome {
                CloudOutcome::Done { cloud, components } => println!(
                    "  {} {} {}",
                    "✅".green(),
                    cloud.cyan(),
                    format!("{} component(s)", components).bright_black()
                ),
                CloudOutcome::Skipped { cloud, stage, reason } => println!(
                    "  {} {} {}",
                    "⚠️ ".yellow(),
                    cloud.cyan(),
                    format!("skipped at {:?}: {}", stage, reason).yellow()
                ),
                CloudOutcome::Aborted { cloud, found, max } => println!(
                    "  {} {} {}",
                    "❌".red(),
                    cloud.cyan(),
                    format!("{} components for a maximum of {}", found, max).red()
                ),
            }
        }

        println!("\n{}", "Summary:".bold());
        println!(
            "  {} {}",
            "Processed clouds:".bright_black(),
            result.processed_clouds.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Components:".bright_black(),
            result.components.len().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );

        if result.aborted.is_some() {
            Self::report_warning("Extraction incomplete, modify some parameters and retry");
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Summarize the entities of one file
    pub fn report_entities(file: &str, entities: &[Entity]) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        for entity in entities {
            match entity {
                Entity::PointCloud(cloud) => Self::report_cloud(cloud),
                Entity::Mesh(mesh) => println!(
                    "  {} {} ({} vertices, {} triangles)",
                    "Mesh:".bright_black(),
                    mesh.name().cyan(),
                    mesh.vertex_count(),
                    mesh.triangle_count()
                ),
                Entity::Other { name } => {
                    println!("  {} {}", "Other:".bright_black(), name.cyan())
                }
            }
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    fn report_cloud(cloud: &PointCloud) {
        println!(
            "  {} {} ({} points)",
            "Cloud:".bright_black(),
            cloud.name().cyan(),
            cloud.size()
        );

        let bbox = cloud.bounding_box();
        if bbox.is_valid() {
            println!(
                "    {} [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
                "BBox:".bright_black(),
                bbox.min.x,
                bbox.min.y,
                bbox.min.z,
                bbox.max.x,
                bbox.max.y,
                bbox.max.z
            );
        }
        if cloud.global_shift().is_shifted() {
            let shift = cloud.global_shift();
            println!(
                "    {} ({}, {}, {}) x {}",
                "Global shift:".bright_black(),
                shift.shift.x,
                shift.shift.y,
                shift.shift.z,
                shift.scale
            );
        }
        println!(
            "    {} {}",
            "Colors:".bright_black(),
            if cloud.has_colors() { "yes" } else { "no" }
        );
        for (name, _) in cloud.scalar_field_dic() {
            println!("    {} {}", "Scalar field:".bright_black(), name);
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
