// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point cloud surface tests

use approx::assert_relative_eq;
use cloudseg::geometry::{GlobalShift, PointCloud, ReferenceCloud, Rgba, ScalarField};
use cloudseg::CloudError;
use nalgebra::{Point3, Vector3};

fn grid(n: usize) -> PointCloud {
    let coords: Vec<f32> = (0..n)
        .flat_map(|i| [i as f32, (i * 2) as f32, (i % 3) as f32])
        .collect();
    let mut cloud = PointCloud::new("grid");
    cloud.coords_from_array(&coords).unwrap();
    cloud
}

#[test]
fn test_coordinates_round_trip_through_flat_arrays() {
    let cloud = grid(5);
    assert_eq!(cloud.size(), 5);
    let coords = cloud.coords_to_array();
    assert_eq!(coords.len(), 15);
    assert_relative_eq!(coords[3], 1.0);
    assert_relative_eq!(coords[4], 2.0);

    let mut bad = PointCloud::new("bad");
    assert!(matches!(
        bad.coords_from_array(&[1.0, 2.0]),
        Err(CloudError::InvalidArray(_))
    ));
}

#[test]
fn test_colors_need_one_row_per_point() {
    let mut cloud = grid(2);
    assert!(!cloud.has_colors());
    assert!(matches!(
        cloud.colors_from_array(&[1, 2, 3, 4]),
        Err(CloudError::SizeMismatch { expected: 2, actual: 1 })
    ));

    cloud.colors_from_array(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(cloud.point_color(1), Some(Rgba::new(5, 6, 7, 8)));
    assert_eq!(cloud.colors_to_array().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);

    cloud.unallocate_colors();
    assert!(cloud.colors_to_array().is_none());
}

#[test]
fn test_gravity_center_and_transforms() {
    let mut cloud = PointCloud::from_points(
        "quad",
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ],
    );
    let center = cloud.gravity_center().unwrap();
    assert_relative_eq!(center.x, 1.0);
    assert_relative_eq!(center.y, 2.0);

    cloud.translate(&Vector3::new(1.0, 1.0, 1.0));
    cloud.scale(2.0, 2.0, 2.0, None);
    let bbox = cloud.bounding_box();
    assert_relative_eq!(bbox.min.x, 2.0);
    assert_relative_eq!(bbox.max.y, 10.0);
    assert_relative_eq!(bbox.max.z, 2.0);
}

#[test]
fn test_scalar_field_bookkeeping() {
    let mut cloud = grid(4);
    cloud.export_coord_to_sf(true, false, true).unwrap();
    let dic = cloud.scalar_field_dic();
    assert_eq!(dic.len(), 2);
    assert!(dic.contains_key("Coord. X"));
    assert!(dic.contains_key("Coord. Z"));

    let x = cloud.scalar_field_by_name("Coord. X").unwrap();
    assert_eq!(x.min_max(), Some((0.0, 3.0)));

    let idx = cloud.scalar_field_index_by_name("Coord. Z").unwrap();
    cloud.set_current_scalar_field(Some(idx)).unwrap();
    cloud.delete_scalar_field(0).unwrap();
    assert_eq!(cloud.current_scalar_field().unwrap().name(), "Coord. Z");

    assert!(matches!(
        cloud.rename_scalar_field(0, "Coord. Z"),
        Ok(())
    ));
    cloud.add_scalar_field("other").unwrap();
    assert!(matches!(
        cloud.rename_scalar_field(1, "Coord. Z"),
        Err(CloudError::DuplicateScalarField(_))
    ));

    cloud.delete_all_scalar_fields();
    assert!(!cloud.has_scalar_fields());
    assert!(cloud.current_scalar_field().is_none());
}

#[test]
fn test_add_scalar_field_replaces_same_name() {
    let mut cloud = grid(3);
    cloud
        .insert_scalar_field(ScalarField::from_values("h", vec![1.0, 2.0, 3.0]))
        .unwrap();
    cloud.add_scalar_field("h").unwrap();
    assert_eq!(cloud.number_of_scalar_fields(), 1);
    assert!(cloud.scalar_field(0).unwrap().values().iter().all(|v| v.is_nan()));
}

#[test]
fn test_colors_to_scalar_fields_pick_free_names() {
    let mut cloud = grid(2);
    cloud.set_uniform_color(Rgba::rgb(30, 60, 90)).unwrap();
    cloud.add_scalar_field("R").unwrap();

    let added = cloud.sf_from_color(true, false, false, false, true).unwrap();
    assert_eq!(added.len(), 2);
    assert_eq!(cloud.scalar_field_name(added[0]), Some("R #1"));
    let composite = cloud.scalar_field(added[1]).unwrap();
    assert_relative_eq!(composite.value(0).unwrap(), 60.0);
}

#[test]
fn test_partial_clone_and_filter_by_value() {
    let mut cloud = grid(6);
    cloud.set_global_shift(GlobalShift::new(Vector3::new(10.0, 0.0, 0.0), 2.0));
    cloud.export_coord_to_sf(true, false, false).unwrap();
    cloud.set_current_scalar_field(Some(0)).unwrap();

    let part = cloud
        .partial_clone(&ReferenceCloud::from_indices(vec![4, 1]))
        .unwrap();
    assert_eq!(part.size(), 2);
    assert_relative_eq!(part.point(0).unwrap().x, 4.0);
    assert_eq!(part.scalar_field(0).unwrap().value(1), Some(1.0));

    let inside = cloud.filter_points_by_scalar_value(1.5, 3.5, false).unwrap();
    assert_eq!(inside.size(), 2);
    assert_eq!(inside.global_shift(), cloud.global_shift());

    let outside = cloud.filter_points_by_scalar_value(1.5, 3.5, true).unwrap();
    assert_eq!(outside.size(), 4);

    assert!(matches!(
        cloud.partial_clone(&ReferenceCloud::from_indices(vec![9])),
        Err(CloudError::IndexOutOfRange { index: 9, size: 6 })
    ));
}

#[test]
fn test_octree_cache_and_helpers() {
    let mut cloud = grid(64);
    assert!(cloud.octree().is_none());
    let octree = cloud.compute_octree().unwrap();
    assert_eq!(octree.point_count(), 64);

    let side = octree.bounding_box().size().x;
    assert_relative_eq!(octree.cell_size(0), side);
    assert_relative_eq!(octree.cell_size(3), side / 8.0);
    assert_eq!(octree.find_best_level_for_cell_size(side / 16.0), 4);
    assert_eq!(octree.cell_count(0).unwrap(), 1);
    assert!(octree.cell_count(22).is_err());

    cloud.delete_octree();
    assert!(cloud.octree().is_none());
}
