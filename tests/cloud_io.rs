// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cloud file and extraction run tests

use anyhow::Result;
use approx::assert_relative_eq;
use cloudseg::cli::{Runner, REPORT_FILE_NAME};
use cloudseg::geometry::{Entity, GlobalShift, PointCloud, Rgba, ScalarField};
use cloudseg::io::{self, ExtractionReport};
use cloudseg::ExtractionParams;
use nalgebra::{Point3, Vector3};
use std::fs;
use tempfile::TempDir;

fn two_clusters(name: &str) -> PointCloud {
    let mut points: Vec<Point3<f32>> = (0..12).map(|i| Point3::new(i as f32 * 0.01, 0.0, 0.0)).collect();
    points.extend((0..6).map(|i| Point3::new(0.0, 30.0 + i as f32 * 0.01, 0.0)));
    PointCloud::from_points(name, points)
}

#[test]
fn test_cloud_attributes_survive_json() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("cloud.json");

    let mut cloud = two_clusters("attrs");
    cloud.set_uniform_color(Rgba::rgb(10, 20, 30))?;
    let mut values = vec![1.25; cloud.size()];
    values[3] = f32::NAN;
    cloud.insert_scalar_field(ScalarField::from_values("intensity", values))?;
    cloud.set_current_scalar_field(Some(0))?;
    cloud.set_global_shift(GlobalShift::new(Vector3::new(1e6, -2e5, 3.5), 0.5));
    io::save_cloud(&path, &cloud)?;

    let loaded = io::load_cloud(&path)?;
    assert_eq!(loaded.size(), cloud.size());
    assert_eq!(loaded.point_color(5), Some(Rgba::rgb(10, 20, 30)));
    assert_eq!(loaded.global_shift(), cloud.global_shift());
    let sf = loaded.scalar_field_by_name("intensity").unwrap();
    assert_relative_eq!(sf.value(0).unwrap(), 1.25);
    assert!(sf.value(3).unwrap().is_nan());
    assert_eq!(loaded.current_scalar_field_index(), Some(0));
    assert!(loaded.octree().is_none());
    Ok(())
}

#[test]
fn test_discovery_of_files_and_directories() -> Result<()> {
    let dir = TempDir::new()?;
    let nested = dir.path().join("a").join("b");
    fs::create_dir_all(&nested)?;
    io::save_cloud(&nested.join("deep.json"), &PointCloud::new("deep"))?;
    let top = dir.path().join("top.json");
    io::save_cloud(&top, &PointCloud::new("top"))?;

    let files = io::discover_cloud_files(&[dir.path().to_path_buf(), top.clone()])?;
    assert_eq!(files.len(), 2);
    assert!(files.contains(&top));
    Ok(())
}

#[test]
fn test_run_over_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("scans");
    fs::create_dir(&input)?;
    io::save_cloud(&input.join("one.json"), &two_clusters("one"))?;
    io::save_entities(
        &input.join("scene.json"),
        &[
            Entity::Other { name: "label".into() },
            Entity::from(two_clusters("two")),
        ],
    )?;

    let params = ExtractionParams {
        octree_level: 6,
        min_component_size: 5,
        ..Default::default()
    };
    let out = dir.path().join("out");
    let summary = Runner::new(params).run(&[input], &out)?;

    assert_eq!(summary.result.processed_clouds, 2);
    assert_eq!(summary.report.component_count(), 4);
    for name in ["one_CC#0.json", "one_CC#1.json", "two_CC#0.json", "two_CC#1.json"] {
        assert!(out.join(name).exists(), "{} missing", name);
    }

    let report = ExtractionReport::load_json(&out.join(REPORT_FILE_NAME))?;
    assert_eq!(report.processed_clouds, 2);
    assert!(report.aborted.is_none());
    assert!(report.components.iter().all(|c| c.file.is_some()));

    let small = io::load_cloud(&out.join("one_CC#1.json"))?;
    assert_eq!(small.size(), 6);
    Ok(())
}

#[test]
fn test_run_skips_cloud_with_mismatched_colors() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("scans");
    fs::create_dir(&input)?;
    fs::write(
        input.join("bad.json"),
        r#"{"kind":"point_cloud","name":"bad","points":[[0,0,0],[1,0,0],[2,0,0]],
            "colors":[{"r":1,"g":2,"b":3,"a":255}]}"#,
    )?;
    io::save_cloud(&input.join("good.json"), &two_clusters("good"))?;

    let params = ExtractionParams {
        octree_level: 6,
        min_component_size: 5,
        ..Default::default()
    };
    let out = dir.path().join("out");
    let summary = Runner::new(params).run(&[input], &out)?;

    assert_eq!(summary.result.processed_clouds, 1);
    assert_eq!(summary.report.component_count(), 2);
    assert!(summary.report.components.iter().all(|c| c.source == "good"));
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("cloudseg.toml");
    let params = ExtractionParams {
        octree_level: 11,
        six_connexity: true,
        ..Default::default()
    };
    params.save(&path)?;
    assert_eq!(ExtractionParams::from_file(&path)?, params);
    Ok(())
}
