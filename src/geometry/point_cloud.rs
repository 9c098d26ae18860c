// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point cloud representation and utilities

use super::{BoundingBox, GenericPointCloud, ReferenceCloud, Rgba, ScalarField};
use crate::error::{CloudError, Result};
use crate::spatial::Octree;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Coordinate shift and scale applied when a cloud was loaded.
///
/// Original coordinates are `local / scale - shift`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalShift {
    pub shift: Vector3<f64>,
    pub scale: f64,
}

impl Default for GlobalShift {
    fn default() -> Self {
        Self {
            shift: Vector3::zeros(),
            scale: 1.0,
        }
    }
}

impl GlobalShift {
    pub fn new(shift: Vector3<f64>, scale: f64) -> Self {
        Self { shift, scale }
    }

    pub fn is_shifted(&self) -> bool {
        self.shift != Vector3::zeros() || self.scale != 1.0
    }

    /// Convert a local point back to global coordinates
    pub fn to_global(&self, local: &Point3<f32>) -> Point3<f64> {
        Point3::new(
            local.x as f64 / self.scale - self.shift.x,
            local.y as f64 / self.scale - self.shift.y,
            local.z as f64 / self.scale - self.shift.z,
        )
    }
}

/// Point cloud with optional colors and scalar fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloud {
    name: String,
    points: Vec<Point3<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    colors: Option<Vec<Rgba>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scalar_fields: Vec<ScalarField>,
    #[serde(default)]
    current_scalar_field: Option<usize>,
    #[serde(default)]
    global_shift: GlobalShift,
    #[serde(skip)]
    octree: Option<Arc<Octree>>,
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new("Cloud")
    }
}

impl PointCloud {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            colors: None,
            scalar_fields: Vec::new(),
            current_scalar_field: None,
            global_shift: GlobalShift::default(),
            octree: None,
        }
    }

    pub fn from_points(name: impl Into<String>, points: Vec<Point3<f32>>) -> Self {
        let mut cloud = Self::new(name);
        cloud.points = points;
        cloud
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of points
    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&Point3<f32>> {
        self.points.get(index)
    }

    /// Reserve room for `additional` points in every per-point array
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.points
            .try_reserve(additional)
            .map_err(|e| CloudError::out_of_memory("point coordinates", e))?;
        if let Some(colors) = &mut self.colors {
            colors
                .try_reserve(additional)
                .map_err(|e| CloudError::out_of_memory("point colors", e))?;
        }
        for sf in &mut self.scalar_fields {
            sf.try_reserve(additional)?;
        }
        Ok(())
    }

    /// Append a point; colors and scalar fields get default values
    pub fn push_point(&mut self, point: Point3<f32>) {
        self.points.push(point);
        if let Some(colors) = &mut self.colors {
            colors.push(Rgba::WHITE);
        }
        for sf in &mut self.scalar_fields {
            sf.push(f32::NAN);
        }
        self.octree = None;
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Mean of the finite points
    pub fn gravity_center(&self) -> Option<Point3<f32>> {
        let (sum, count) = self
            .points
            .iter()
            .filter(|p| super::bbox::is_finite(p))
            .fold((Vector3::<f64>::zeros(), 0usize), |(sum, n), p| {
                (sum + Vector3::new(p.x as f64, p.y as f64, p.z as f64), n + 1)
            });
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;
        Some(Point3::new(mean.x as f32, mean.y as f32, mean.z as f32))
    }

    pub fn translate(&mut self, t: &Vector3<f32>) {
        for p in &mut self.points {
            *p += *t;
        }
        self.octree = None;
    }

    /// Scale coordinates per axis around `center` (origin by default)
    pub fn scale(&mut self, fx: f32, fy: f32, fz: f32, center: Option<Point3<f32>>) {
        let c = center.unwrap_or_else(Point3::origin);
        for p in &mut self.points {
            p.x = c.x + (p.x - c.x) * fx;
            p.y = c.y + (p.y - c.y) * fy;
            p.z = c.z + (p.z - c.z) * fz;
        }
        self.octree = None;
    }

    /// Coordinates as a flat `[x0, y0, z0, x1, ...]` copy
    pub fn coords_to_array(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Replace all coordinates from a flat xyz array, resizing the cloud
    pub fn coords_from_array(&mut self, coords: &[f32]) -> Result<()> {
        if coords.len() % 3 != 0 {
            return Err(CloudError::InvalidArray(format!(
                "{} values is not a multiple of 3 coordinates",
                coords.len()
            )));
        }
        let rows = coords.len() / 3;
        let mut points = Vec::new();
        points
            .try_reserve_exact(rows)
            .map_err(|e| CloudError::out_of_memory("point coordinates", e))?;
        points.extend(coords.chunks_exact(3).map(|c| Point3::new(c[0], c[1], c[2])));
        self.points = points;

        if let Some(colors) = &mut self.colors {
            colors.resize(rows, Rgba::WHITE);
        }
        for sf in &mut self.scalar_fields {
            let mut values = sf.values().to_vec();
            values.resize(rows, f32::NAN);
            *sf = ScalarField::from_values(sf.name().to_string(), values);
        }
        self.octree = None;
        Ok(())
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn colors(&self) -> Option<&[Rgba]> {
        self.colors.as_deref()
    }

    pub fn point_color(&self, index: usize) -> Option<Rgba> {
        self.colors.as_ref().and_then(|c| c.get(index).copied())
    }

    /// Colors as a flat `[r0, g0, b0, a0, r1, ...]` copy
    pub fn colors_to_array(&self) -> Option<Vec<u8>> {
        self.colors
            .as_ref()
            .map(|colors| colors.iter().flat_map(|c| c.to_array()).collect())
    }

    /// Set all colors from a flat RGBA array with one row per point
    pub fn colors_from_array(&mut self, rgba: &[u8]) -> Result<()> {
        if rgba.len() % 4 != 0 {
            return Err(CloudError::InvalidArray(format!(
                "{} values is not a multiple of 4 components",
                rgba.len()
            )));
        }
        let rows = rgba.len() / 4;
        if rows != self.size() {
            return Err(CloudError::SizeMismatch {
                expected: self.size(),
                actual: rows,
            });
        }
        let mut colors = Vec::new();
        colors
            .try_reserve_exact(rows)
            .map_err(|e| CloudError::out_of_memory("point colors", e))?;
        colors.extend(rgba.chunks_exact(4).map(|c| Rgba::new(c[0], c[1], c[2], c[3])));
        self.colors = Some(colors);
        Ok(())
    }

    /// Give every point the same color, allocating the color table if needed
    pub fn set_uniform_color(&mut self, color: Rgba) -> Result<()> {
        let mut colors = Vec::new();
        colors
            .try_reserve_exact(self.size())
            .map_err(|e| CloudError::out_of_memory("point colors", e))?;
        colors.resize(self.size(), color);
        self.colors = Some(colors);
        Ok(())
    }

    pub(crate) fn set_colors(&mut self, colors: Vec<Rgba>) -> Result<()> {
        if colors.len() != self.size() {
            return Err(CloudError::SizeMismatch {
                expected: self.size(),
                actual: colors.len(),
            });
        }
        self.colors = Some(colors);
        Ok(())
    }

    pub fn unallocate_colors(&mut self) {
        self.colors = None;
    }

    pub fn global_shift(&self) -> &GlobalShift {
        &self.global_shift
    }

    pub fn set_global_shift(&mut self, shift: GlobalShift) {
        self.global_shift = shift;
    }

    /// Copy the 'shift on load' information of another cloud
    pub fn copy_global_shift_and_scale(&mut self, source: &PointCloud) {
        self.global_shift = source.global_shift;
    }

    pub fn number_of_scalar_fields(&self) -> usize {
        self.scalar_fields.len()
    }

    pub fn has_scalar_fields(&self) -> bool {
        !self.scalar_fields.is_empty()
    }

    pub fn scalar_field(&self, index: usize) -> Option<&ScalarField> {
        self.scalar_fields.get(index)
    }

    pub fn scalar_field_mut(&mut self, index: usize) -> Option<&mut ScalarField> {
        self.scalar_fields.get_mut(index)
    }

    pub fn scalar_field_name(&self, index: usize) -> Option<&str> {
        self.scalar_fields.get(index).map(|sf| sf.name())
    }

    pub fn scalar_field_index_by_name(&self, name: &str) -> Option<usize> {
        self.scalar_fields.iter().position(|sf| sf.name() == name)
    }

    pub fn scalar_field_by_name(&self, name: &str) -> Option<&ScalarField> {
        self.scalar_fields.iter().find(|sf| sf.name() == name)
    }

    pub fn scalar_field_by_name_mut(&mut self, name: &str) -> Option<&mut ScalarField> {
        self.scalar_fields.iter_mut().find(|sf| sf.name() == name)
    }

    /// Scalar field names mapped to their index
    pub fn scalar_field_dic(&self) -> BTreeMap<String, usize> {
        self.scalar_fields
            .iter()
            .enumerate()
            .map(|(i, sf)| (sf.name().to_string(), i))
            .collect()
    }

    /// Allocate a NaN-filled field and return its index.
    ///
    /// A field with the same name is deleted first, so names stay unique.
    pub fn add_scalar_field(&mut self, name: &str) -> Result<usize> {
        let sf = ScalarField::try_new(name, self.size())?;
        self.insert_scalar_field(sf)
    }

    /// Attach an existing field, replacing any field with the same name
    pub fn insert_scalar_field(&mut self, sf: ScalarField) -> Result<usize> {
        if sf.len() != self.size() {
            return Err(CloudError::SizeMismatch {
                expected: self.size(),
                actual: sf.len(),
            });
        }
        if let Some(existing) = self.scalar_field_index_by_name(sf.name()) {
            self.delete_scalar_field(existing)?;
        }
        self.scalar_fields
            .try_reserve(1)
            .map_err(|e| CloudError::out_of_memory("scalar field table", e))?;
        self.scalar_fields.push(sf);
        Ok(self.scalar_fields.len() - 1)
    }

    /// Remove a field; the current field index follows the shift
    pub fn delete_scalar_field(&mut self, index: usize) -> Result<ScalarField> {
        if index >= self.scalar_fields.len() {
            return Err(CloudError::IndexOutOfRange {
                index,
                size: self.scalar_fields.len(),
            });
        }
        let removed = self.scalar_fields.remove(index);
        self.current_scalar_field = match self.current_scalar_field {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        Ok(removed)
    }

    pub fn delete_all_scalar_fields(&mut self) {
        self.scalar_fields.clear();
        self.current_scalar_field = None;
    }

    pub fn rename_scalar_field(&mut self, index: usize, new_name: &str) -> Result<()> {
        let size = self.scalar_fields.len();
        if let Some(other) = self.scalar_field_index_by_name(new_name) {
            if other != index {
                return Err(CloudError::DuplicateScalarField(new_name.to_string()));
            }
        }
        self.scalar_fields
            .get_mut(index)
            .ok_or(CloudError::IndexOutOfRange { index, size })?
            .set_name(new_name);
        Ok(())
    }

    /// `base_name`, or `"base_name #n"` for the first free `n` up to 99
    pub fn first_available_sf_name(&self, base_name: &str) -> Option<String> {
        if self.scalar_field_index_by_name(base_name).is_none() {
            return Some(base_name.to_string());
        }
        (1..=99)
            .map(|n| format!("{} #{}", base_name, n))
            .find(|name| self.scalar_field_index_by_name(name).is_none())
    }

    pub fn set_current_scalar_field(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            if i >= self.scalar_fields.len() {
                return Err(CloudError::IndexOutOfRange {
                    index: i,
                    size: self.scalar_fields.len(),
                });
            }
        }
        self.current_scalar_field = index;
        Ok(())
    }

    pub fn current_scalar_field_index(&self) -> Option<usize> {
        self.current_scalar_field
    }

    pub fn current_scalar_field(&self) -> Option<&ScalarField> {
        self.current_scalar_field
            .and_then(|i| self.scalar_fields.get(i))
    }

    pub fn current_scalar_field_mut(&mut self) -> Option<&mut ScalarField> {
        self.current_scalar_field
            .and_then(|i| self.scalar_fields.get_mut(i))
    }

    /// Export the selected coordinate axes as `"Coord. X"`, `"Coord. Y"`, `"Coord. Z"` fields
    pub fn export_coord_to_sf(&mut self, x: bool, y: bool, z: bool) -> Result<()> {
        for (axis, (enabled, label)) in [(x, "X"), (y, "Y"), (z, "Z")].into_iter().enumerate() {
            if !enabled {
                continue;
            }
            let mut values = Vec::new();
            values
                .try_reserve_exact(self.size())
                .map_err(|e| CloudError::out_of_memory("coordinate field", e))?;
            values.extend(self.points.iter().map(|p| p[axis]));
            let mut sf = ScalarField::from_values(format!("Coord. {}", label), values);
            sf.compute_min_and_max();
            self.insert_scalar_field(sf)?;
        }
        Ok(())
    }

    /// Export color channels as new scalar fields with free names
    pub fn sf_from_color(
        &mut self,
        r: bool,
        g: bool,
        b: bool,
        alpha: bool,
        composite: bool,
    ) -> Result<Vec<usize>> {
        let colors = self.colors.clone().ok_or_else(|| {
            CloudError::InvalidArray(format!("cloud '{}' has no colors", self.name))
        })?;

        type Channel = fn(&Rgba) -> f32;
        let channels: [(bool, &str, Channel); 5] = [
            (r, "R", |c| c.r as f32),
            (g, "G", |c| c.g as f32),
            (b, "B", |c| c.b as f32),
            (alpha, "Alpha", |c| c.a as f32),
            (composite, "Composite", |c| {
                (c.r as f32 + c.g as f32 + c.b as f32) / 3.0
            }),
        ];

        let mut added = Vec::new();
        for (enabled, base, extract) in channels {
            if !enabled {
                continue;
            }
            let Some(name) = self.first_available_sf_name(base) else {
                log::warn!("No free scalar field name for '{}'", base);
                continue;
            };
            let mut sf = ScalarField::from_values(name, colors.iter().map(extract).collect());
            sf.compute_min_and_max();
            added.push(self.insert_scalar_field(sf)?);
        }
        Ok(added)
    }

    /// New cloud made of the selected points, with colors and scalar fields copied
    pub fn partial_clone(&self, selection: &ReferenceCloud) -> Result<PointCloud> {
        let n = selection.size();
        if let Some(&bad) = selection.indices().iter().find(|&&i| i >= self.size()) {
            return Err(CloudError::IndexOutOfRange {
                index: bad,
                size: self.size(),
            });
        }

        let mut clone = PointCloud::new(format!("{}.part", self.name));
        clone
            .points
            .try_reserve_exact(n)
            .map_err(|e| CloudError::out_of_memory("partial clone coordinates", e))?;
        clone
            .points
            .extend(selection.indices().iter().map(|&i| self.points[i]));

        if let Some(colors) = &self.colors {
            let mut copied = Vec::new();
            copied
                .try_reserve_exact(n)
                .map_err(|e| CloudError::out_of_memory("partial clone colors", e))?;
            copied.extend(selection.indices().iter().map(|&i| colors[i]));
            clone.colors = Some(copied);
        }

        for sf in &self.scalar_fields {
            let mut values = Vec::new();
            values
                .try_reserve_exact(n)
                .map_err(|e| CloudError::out_of_memory("partial clone scalar field", e))?;
            values.extend(selection.indices().iter().map(|&i| sf.values()[i]));
            let mut copied = ScalarField::from_values(sf.name().to_string(), values);
            copied.compute_min_and_max();
            clone.scalar_fields.push(copied);
        }
        clone.current_scalar_field = self.current_scalar_field;

        Ok(clone)
    }

    /// Points whose current scalar value lies in `[min, max]` (or outside it)
    pub fn filter_points_by_scalar_value(
        &self,
        min: f32,
        max: f32,
        outside: bool,
    ) -> Result<PointCloud> {
        let sf = self
            .current_scalar_field()
            .ok_or(CloudError::NoCurrentScalarField)?;
        let selection: Vec<usize> = sf
            .values()
            .iter()
            .enumerate()
            .filter(|&(_, &v)| !v.is_nan() && (v >= min && v <= max) != outside)
            .map(|(i, _)| i)
            .collect();
        let mut filtered = self.partial_clone(&ReferenceCloud::from_indices(selection))?;
        filtered.copy_global_shift_and_scale(self);
        Ok(filtered)
    }

    /// Cached octree, if one was computed
    pub fn octree(&self) -> Option<Arc<Octree>> {
        self.octree.clone()
    }

    /// Build the octree and cache it, replacing any previous one
    pub fn compute_octree(&mut self) -> Result<Arc<Octree>> {
        let octree = Arc::new(Octree::build(self)?);
        self.octree = Some(Arc::clone(&octree));
        Ok(octree)
    }

    pub fn delete_octree(&mut self) {
        self.octree = None;
    }

    /// Check that per-point attributes match the point count.
    ///
    /// Deserialization does not enforce this, so clouds read from files
    /// must pass here before anything indexes their attributes.
    pub fn validate(&self) -> Result<()> {
        let size = self.size();
        if let Some(colors) = &self.colors {
            if colors.len() != size {
                return Err(CloudError::SizeMismatch {
                    expected: size,
                    actual: colors.len(),
                });
            }
        }
        if let Some(sf) = self.scalar_fields.iter().find(|sf| sf.len() != size) {
            return Err(CloudError::SizeMismatch {
                expected: size,
                actual: sf.len(),
            });
        }
        if let Some(index) = self.current_scalar_field {
            if index >= self.scalar_fields.len() {
                return Err(CloudError::IndexOutOfRange {
                    index,
                    size: self.scalar_fields.len(),
                });
            }
        }
        Ok(())
    }
}

impl GenericPointCloud for PointCloud {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Option<&Point3<f32>> {
        self.points.get(index)
    }

    fn point_color(&self, index: usize) -> Option<Rgba> {
        PointCloud::point_color(self, index)
    }

    fn has_colors(&self) -> bool {
        self.colors.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_cloud(n: usize) -> PointCloud {
        PointCloud::from_points(
            "line",
            (0..n).map(|i| Point3::new(i as f32, 0.0, 0.0)).collect(),
        )
    }

    #[test]
    fn test_validate_attribute_lengths() {
        let mut cloud = line_cloud(3);
        cloud.set_uniform_color(Rgba::rgb(1, 2, 3)).unwrap();
        cloud.add_scalar_field("Label").unwrap();
        cloud.set_current_scalar_field(Some(0)).unwrap();
        assert!(cloud.validate().is_ok());

        let mut short_colors = cloud.clone();
        short_colors.colors = Some(vec![Rgba::rgb(1, 2, 3)]);
        assert!(matches!(
            short_colors.validate(),
            Err(CloudError::SizeMismatch { expected: 3, actual: 1 })
        ));

        let mut short_field = cloud.clone();
        short_field.scalar_fields.push(ScalarField::from_values("short", vec![0.0; 2]));
        assert!(matches!(
            short_field.validate(),
            Err(CloudError::SizeMismatch { expected: 3, actual: 2 })
        ));

        let mut bad_current = cloud.clone();
        bad_current.current_scalar_field = Some(4);
        assert!(matches!(
            bad_current.validate(),
            Err(CloudError::IndexOutOfRange { index: 4, size: 1 })
        ));
    }

    #[test]
    fn test_add_scalar_field_replaces_duplicate() {
        let mut cloud = line_cloud(3);
        let first = cloud.add_scalar_field("Label").unwrap();
        cloud.scalar_field_mut(first).unwrap().set_value(0, 1.0).unwrap();

        let second = cloud.add_scalar_field("Label").unwrap();
        assert_eq!(cloud.number_of_scalar_fields(), 1);
        assert!(cloud.scalar_field(second).unwrap().values()[0].is_nan());
    }

    #[test]
    fn test_delete_scalar_field_shifts_current() {
        let mut cloud = line_cloud(2);
        cloud.add_scalar_field("a").unwrap();
        let b = cloud.add_scalar_field("b").unwrap();
        cloud.set_current_scalar_field(Some(b)).unwrap();

        cloud.delete_scalar_field(0).unwrap();
        assert_eq!(cloud.current_scalar_field().unwrap().name(), "b");

        cloud.delete_scalar_field(0).unwrap();
        assert!(cloud.current_scalar_field().is_none());
    }

    #[test]
    fn test_first_available_sf_name() {
        let mut cloud = line_cloud(1);
        assert_eq!(cloud.first_available_sf_name("R").as_deref(), Some("R"));
        cloud.add_scalar_field("R").unwrap();
        assert_eq!(cloud.first_available_sf_name("R").as_deref(), Some("R #1"));
    }

    #[test]
    fn test_partial_clone_copies_attributes() {
        let mut cloud = line_cloud(5);
        cloud.set_uniform_color(Rgba::rgb(10, 20, 30)).unwrap();
        let idx = cloud.add_scalar_field("w").unwrap();
        for i in 0..5 {
            cloud.scalar_field_mut(idx).unwrap().set_value(i, i as f32).unwrap();
        }

        let clone = cloud
            .partial_clone(&ReferenceCloud::from_indices(vec![4, 1]))
            .unwrap();
        assert_eq!(clone.size(), 2);
        assert_eq!(clone.points()[0].x, 4.0);
        assert_eq!(clone.point_color(1), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(clone.scalar_field_by_name("w").unwrap().values(), &[4.0, 1.0]);
    }

    #[test]
    fn test_partial_clone_rejects_bad_index() {
        let cloud = line_cloud(2);
        let err = cloud
            .partial_clone(&ReferenceCloud::from_indices(vec![0, 9]))
            .unwrap_err();
        assert!(matches!(err, CloudError::IndexOutOfRange { index: 9, size: 2 }));
    }

    #[test]
    fn test_coords_round_trip_resizes_fields() {
        let mut cloud = line_cloud(2);
        cloud.add_scalar_field("s").unwrap();
        cloud
            .coords_from_array(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
            .unwrap();
        assert_eq!(cloud.size(), 3);
        assert_eq!(cloud.scalar_field(0).unwrap().len(), 3);
        assert_eq!(cloud.coords_to_array()[5], 5.0);
        assert!(cloud.coords_from_array(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_colors_from_array_checks_row_count() {
        let mut cloud = line_cloud(2);
        assert!(matches!(
            cloud.colors_from_array(&[1, 2, 3, 4]),
            Err(CloudError::SizeMismatch { expected: 2, actual: 1 })
        ));
        cloud.colors_from_array(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(cloud.colors_to_array().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_filter_points_by_scalar_value() {
        let mut cloud = line_cloud(6);
        cloud.export_coord_to_sf(true, false, false).unwrap();
        let idx = cloud.scalar_field_index_by_name("Coord. X").unwrap();
        cloud.set_current_scalar_field(Some(idx)).unwrap();

        let inside = cloud.filter_points_by_scalar_value(1.0, 3.0, false).unwrap();
        assert_eq!(inside.size(), 3);
        let outside = cloud.filter_points_by_scalar_value(1.0, 3.0, true).unwrap();
        assert_eq!(outside.size(), 3);
    }

    #[test]
    fn test_sf_from_color() {
        let mut cloud = line_cloud(2);
        assert!(cloud.sf_from_color(true, false, false, false, false).is_err());

        cloud.set_uniform_color(Rgba::rgb(30, 60, 90)).unwrap();
        let added = cloud.sf_from_color(true, false, false, false, true).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(cloud.scalar_field_by_name("Composite").unwrap().values()[0], 60.0);
    }

    #[test]
    fn test_gravity_center_and_translate() {
        let mut cloud = line_cloud(3);
        assert_eq!(cloud.gravity_center(), Some(Point3::new(1.0, 0.0, 0.0)));
        cloud.translate(&Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(cloud.gravity_center(), Some(Point3::new(1.0, 2.0, 0.0)));
        assert!(PointCloud::new("empty").gravity_center().is_none());
    }
}
