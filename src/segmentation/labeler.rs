// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Connected-component labeling over the octree

use crate::error::{CloudError, Result};
use crate::geometry::{PointCloud, ReferenceCloud, ReferenceCloudContainer};
use crate::spatial::Octree;
use ahash::AHashMap;

/// Name of the scratch scalar field holding component labels
pub const CC_LABEL_FIELD_NAME: &str = "CC labels";

/// Labels connected components and turns labels into point groups
pub trait ComponentLabelingEngine {
    /// Write 1-based component labels into the cloud's current scalar field
    /// and return the number of components found
    fn label_connected_components(
        &self,
        cloud: &mut PointCloud,
        octree: &Octree,
        level: u8,
        six_connexity: bool,
    ) -> Result<usize>;

    /// Group points by the labels stored in the current scalar field.
    ///
    /// Groups come out in increasing label order; points inside a group in
    /// increasing index order. Unlabelled points (NaN or < 1) are skipped.
    fn extract_connected_components(&self, cloud: &PointCloud) -> Result<ReferenceCloudContainer>;
}

/// Labeling engine backed by [`Octree::label_connected_components`]
#[derive(Debug, Default, Clone, Copy)]
pub struct OctreeLabeler;

impl ComponentLabelingEngine for OctreeLabeler {
    fn label_connected_components(
        &self,
        cloud: &mut PointCloud,
        octree: &Octree,
        level: u8,
        six_connexity: bool,
    ) -> Result<usize> {
        let sf = cloud
            .current_scalar_field_mut()
            .ok_or(CloudError::NoCurrentScalarField)?;
        let count = octree.label_connected_components(level, six_connexity, sf.values_mut())?;
        sf.compute_min_and_max();
        Ok(count)
    }

    fn extract_connected_components(&self, cloud: &PointCloud) -> Result<ReferenceCloudContainer> {
        let sf = cloud
            .current_scalar_field()
            .ok_or(CloudError::NoCurrentScalarField)?;

        let mut by_label: AHashMap<u32, ReferenceCloud> = AHashMap::new();
        for (index, &value) in sf.values().iter().enumerate() {
            if value.is_nan() || value < 1.0 {
                continue;
            }
            by_label
                .entry(value as u32)
                .or_default()
                .add_point_index(index);
        }

        let mut labelled: Vec<(u32, ReferenceCloud)> = by_label.into_iter().collect();
        labelled.sort_unstable_by_key(|(label, _)| *label);

        let mut components = ReferenceCloudContainer::new();
        components
            .try_reserve_exact(labelled.len())
            .map_err(|e| CloudError::out_of_memory("component container", e))?;
        components.extend(labelled.into_iter().map(|(_, group)| group));
        Ok(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScalarField;
    use nalgebra::Point3;

    #[test]
    fn test_label_requires_current_field() {
        let mut cloud = PointCloud::from_points("c", vec![Point3::new(0.0, 0.0, 0.0)]);
        let octree = Octree::build(&cloud).unwrap();
        assert!(matches!(
            OctreeLabeler.label_connected_components(&mut cloud, &octree, 8, false),
            Err(CloudError::NoCurrentScalarField)
        ));
    }

    #[test]
    fn test_extract_groups_by_label_order() {
        let mut cloud = PointCloud::from_points(
            "c",
            (0..6).map(|i| Point3::new(i as f32, 0.0, 0.0)).collect(),
        );
        let idx = cloud
            .insert_scalar_field(ScalarField::from_values(
                CC_LABEL_FIELD_NAME,
                vec![2.0, 1.0, f32::NAN, 2.0, 0.0, 1.0],
            ))
            .unwrap();
        cloud.set_current_scalar_field(Some(idx)).unwrap();

        let groups = OctreeLabeler.extract_connected_components(&cloud).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].indices(), &[1, 5]);
        assert_eq!(groups[1].indices(), &[0, 3]);
    }

    #[test]
    fn test_label_then_extract() {
        let mut points: Vec<Point3<f32>> = (0..10).map(|i| Point3::new(i as f32 * 0.01, 0.0, 0.0)).collect();
        points.extend((0..5).map(|i| Point3::new(100.0 + i as f32 * 0.01, 0.0, 0.0)));
        let mut cloud = PointCloud::from_points("two", points);

        let octree = Octree::build(&cloud).unwrap();
        let idx = cloud.add_scalar_field(CC_LABEL_FIELD_NAME).unwrap();
        cloud.set_current_scalar_field(Some(idx)).unwrap();

        let count = OctreeLabeler
            .label_connected_components(&mut cloud, &octree, 6, false)
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(cloud.current_scalar_field().unwrap().min_max(), Some((1.0, 2.0)));

        let groups = OctreeLabeler.extract_connected_components(&cloud).unwrap();
        assert_eq!(groups.iter().map(|g| g.size()).collect::<Vec<_>>(), vec![10, 5]);
    }
}
