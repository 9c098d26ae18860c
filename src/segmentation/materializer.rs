// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Turning component groups into standalone clouds

use super::ranking::Ranking;
use crate::error::{CloudError, Result};
use crate::geometry::{
    random_color, GenericPointCloud, PointCloud, ReferenceCloud, ReferenceCloudContainer, Rgba,
};
use rand::Rng;

/// Builds new clouds from index subsets
pub trait CloudFactory {
    /// Copy the selected points of a committed cloud, attributes included
    fn partial_clone(&self, source: &PointCloud, selection: &ReferenceCloud) -> Result<PointCloud>;

    /// Copy the selected points of any point set (positions and colors only)
    fn from_generic(
        &self,
        source: &dyn GenericPointCloud,
        selection: &ReferenceCloud,
    ) -> Result<PointCloud>;
}

/// Factory using [`PointCloud::partial_clone`] and plain copies
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCloudFactory;

impl CloudFactory for DefaultCloudFactory {
    fn partial_clone(&self, source: &PointCloud, selection: &ReferenceCloud) -> Result<PointCloud> {
        source.partial_clone(selection)
    }

    fn from_generic(
        &self,
        source: &dyn GenericPointCloud,
        selection: &ReferenceCloud,
    ) -> Result<PointCloud> {
        let mut cloud = PointCloud::new(source.name());
        cloud.try_reserve(selection.size())?;

        let mut colors: Option<Vec<Rgba>> = if source.has_colors() {
            let mut colors = Vec::new();
            colors
                .try_reserve_exact(selection.size())
                .map_err(|e| CloudError::out_of_memory("component colors", e))?;
            Some(colors)
        } else {
            None
        };

        for &index in selection.indices() {
            let point = source.point(index).ok_or(CloudError::IndexOutOfRange {
                index,
                size: source.size(),
            })?;
            cloud.push_point(*point);
            if let Some(colors) = &mut colors {
                colors.push(source.point_color(index).unwrap_or(Rgba::WHITE));
            }
        }

        if let Some(colors) = colors {
            cloud.set_colors(colors)?;
        }
        Ok(cloud)
    }
}

/// Where component groups point into
#[derive(Clone, Copy)]
pub enum ComponentSource<'a> {
    /// A real point cloud: partial clones, shift/scale inherited
    Committed(&'a PointCloud),
    /// Any other point set (mesh vertices...)
    Generic(&'a dyn GenericPointCloud),
}

impl ComponentSource<'_> {
    pub fn name(&self) -> &str {
        match self {
            ComponentSource::Committed(cloud) => cloud.name(),
            ComponentSource::Generic(points) => points.name(),
        }
    }
}

/// Options for [`create_components_clouds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeOptions {
    pub min_points_per_component: usize,
    pub random_colors: bool,
    pub sort_by_size: bool,
}

/// Name given to the `n`-th component created from one source
pub fn component_name(n: usize) -> String {
    format!("CC#{}", n)
}

/// Create one cloud per component holding at least `min_points_per_component` points.
///
/// Components are visited largest first (unless disabled or the ranking
/// degrades). Names are `CC#0`, `CC#1`, ... counting created clouds only. A
/// component whose cloud cannot be built is logged and skipped. The groups
/// are consumed.
pub fn create_components_clouds<F, R>(
    source: ComponentSource<'_>,
    components: ReferenceCloudContainer,
    options: &MaterializeOptions,
    factory: &F,
    rng: &mut R,
) -> Vec<PointCloud>
where
    F: CloudFactory + ?Sized,
    R: Rng + ?Sized,
{
    let mut result = Vec::new();
    if components.is_empty() {
        return result;
    }

    let ranking = Ranking::of(&components, options.sort_by_size);

    let mut created = 0usize;
    for index in ranking.order() {
        let group = &components[index];
        if group.size() < options.min_points_per_component {
            continue;
        }

        let built = match source {
            ComponentSource::Committed(cloud) => factory.partial_clone(cloud, group),
            ComponentSource::Generic(points) => factory.from_generic(points, group),
        };

        let mut component = match built {
            Ok(component) => component,
            Err(e) => {
                log::warn!("Failed to create component {} ({})", created, e);
                continue;
            }
        };

        if options.random_colors {
            let color = random_color(rng, true);
            if let Err(e) = component.set_uniform_color(color) {
                log::warn!("Could not colorize component {} ({})", created, e);
            }
        }

        if let ComponentSource::Committed(cloud) = source {
            component.copy_global_shift_and_scale(cloud);
        }
        component.set_name(component_name(created));

        result.push(component);
        created += 1;
    }

    if created == 0 {
        log::info!("No component was created from '{}', check the minimum size", source.name());
    } else {
        log::info!("{} component(s) were created from cloud '{}'", created, source.name());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GlobalShift, Mesh};
    use nalgebra::{Point3, Vector3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source_cloud(n: usize) -> PointCloud {
        let mut cloud = PointCloud::from_points(
            "source",
            (0..n).map(|i| Point3::new(i as f32, 0.0, 0.0)).collect(),
        );
        cloud.set_global_shift(GlobalShift::new(Vector3::new(-1e6, 2.5e5, 0.125), 0.001));
        cloud
    }

    fn groups(ranges: &[std::ops::Range<usize>]) -> ReferenceCloudContainer {
        ranges
            .iter()
            .map(|r| ReferenceCloud::from_indices(r.clone().collect()))
            .collect()
    }

    fn options(min: usize) -> MaterializeOptions {
        MaterializeOptions {
            min_points_per_component: min,
            random_colors: false,
            sort_by_size: true,
        }
    }

    /// Fails on the n-th partial clone request
    struct FailingFactory {
        fail_on: usize,
        calls: std::cell::Cell<usize>,
    }

    impl CloudFactory for FailingFactory {
        fn partial_clone(&self, source: &PointCloud, selection: &ReferenceCloud) -> Result<PointCloud> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call == self.fail_on {
                return Err(CloudError::OutOfMemory("test".into()));
            }
            source.partial_clone(selection)
        }

        fn from_generic(
            &self,
            source: &dyn GenericPointCloud,
            selection: &ReferenceCloud,
        ) -> Result<PointCloud> {
            DefaultCloudFactory.from_generic(source, selection)
        }
    }

    #[test]
    fn test_names_are_contiguous_and_sizes_descend() {
        let cloud = source_cloud(30);
        let components = groups(&[0..2, 2..12, 12..14, 14..30]);
        let clouds = create_components_clouds(
            ComponentSource::Committed(&cloud),
            components,
            &options(5),
            &DefaultCloudFactory,
            &mut StdRng::seed_from_u64(1),
        );

        let names: Vec<&str> = clouds.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["CC#0", "CC#1"]);
        assert_eq!(clouds[0].size(), 16);
        assert_eq!(clouds[1].size(), 10);
    }

    #[test]
    fn test_shift_and_scale_are_copied_exactly() {
        let cloud = source_cloud(4);
        let clouds = create_components_clouds(
            ComponentSource::Committed(&cloud),
            groups(&[0..4]),
            &options(1),
            &DefaultCloudFactory,
            &mut StdRng::seed_from_u64(1),
        );
        let shift = clouds[0].global_shift();
        assert_eq!(shift.scale.to_bits(), 0.001f64.to_bits());
        assert_eq!(shift.shift.x.to_bits(), (-1e6f64).to_bits());
        assert_eq!(shift.shift.z.to_bits(), 0.125f64.to_bits());
    }

    #[test]
    fn test_failed_component_does_not_consume_a_name() {
        let cloud = source_cloud(30);
        let factory = FailingFactory {
            fail_on: 0,
            calls: std::cell::Cell::new(0),
        };
        let clouds = create_components_clouds(
            ComponentSource::Committed(&cloud),
            groups(&[0..10, 10..30]),
            &options(1),
            &factory,
            &mut StdRng::seed_from_u64(1),
        );

        assert_eq!(clouds.len(), 1);
        assert_eq!(clouds[0].name(), "CC#0");
        assert_eq!(clouds[0].size(), 10);
    }

    #[test]
    fn test_random_colors_are_uniform_per_component() {
        let cloud = source_cloud(10);
        let opts = MaterializeOptions {
            random_colors: true,
            ..options(1)
        };
        let clouds = create_components_clouds(
            ComponentSource::Committed(&cloud),
            groups(&[0..6, 6..10]),
            &opts,
            &DefaultCloudFactory,
            &mut StdRng::seed_from_u64(3),
        );

        for c in &clouds {
            let colors = c.colors().unwrap();
            assert!(colors.iter().all(|&col| col == colors[0]));
        }
    }

    #[test]
    fn test_generic_source_keeps_default_shift() {
        let mut vertices = source_cloud(6);
        vertices.set_uniform_color(Rgba::rgb(1, 2, 3)).unwrap();
        let mesh = Mesh::new("mesh", vertices);

        let clouds = create_components_clouds(
            ComponentSource::Generic(&mesh),
            groups(&[0..3, 3..6]),
            &options(1),
            &DefaultCloudFactory,
            &mut StdRng::seed_from_u64(1),
        );

        assert_eq!(clouds.len(), 2);
        assert_eq!(*clouds[0].global_shift(), GlobalShift::default());
        assert_eq!(clouds[1].point_color(0), Some(Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn test_no_components() {
        let cloud = source_cloud(3);
        let clouds = create_components_clouds(
            ComponentSource::Committed(&cloud),
            Vec::new(),
            &options(1),
            &DefaultCloudFactory,
            &mut StdRng::seed_from_u64(1),
        );
        assert!(clouds.is_empty());
    }
}
