// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - point clouds, scalar fields and meshes

mod bbox;
mod color;
mod entity;
mod mesh;
mod point_cloud;
mod reference_cloud;
mod scalar_field;

pub use bbox::BoundingBox;
pub use color::{random_color, Rgba};
pub use entity::Entity;
pub use mesh::{Mesh, Triangle};
pub use point_cloud::{GlobalShift, PointCloud};
pub use reference_cloud::{GenericPointCloud, ReferenceCloud, ReferenceCloudContainer};
pub use scalar_field::ScalarField;
