// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morton-coded octree over a point cloud
//!
//! Every finite point gets a 63-bit Morton code at [`MAX_OCTREE_LEVEL`]; the code
//! at a coarser level `L` is the same code shifted right by `3 * (MAX - L)`.
//! Points are kept sorted by code, so each occupied cell at any level is a
//! contiguous run of the sorted array.

use crate::error::{CloudError, Result};
use crate::geometry::{BoundingBox, PointCloud};
use nalgebra::Point3;
use rayon::prelude::*;

/// Deepest subdivision level (21 bits per axis fit in a 64-bit code)
pub const MAX_OCTREE_LEVEL: u8 = 21;

const CELLS_PER_AXIS: u32 = 1 << MAX_OCTREE_LEVEL;

/// Largest label an `f32` holds exactly
pub const MAX_COMPONENT_LABEL: u32 = 1 << f32::MANTISSA_DIGITS;

/// Point index with its Morton code at the deepest level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexedCode {
    pub code: u64,
    pub index: usize,
}

/// Occupied cell at some level: its code and its run in the sorted codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub code: u64,
    pub start: usize,
    pub end: usize,
}

impl Cell {
    pub fn population(&self) -> usize {
        self.end - self.start
    }
}

/// Octree over one cloud
#[derive(Debug, Clone)]
pub struct Octree {
    bbox: BoundingBox,
    side: f32,
    codes: Vec<IndexedCode>,
    cloud_size: usize,
}

impl Octree {
    /// Build the octree of a cloud; non-finite points are left out
    pub fn build(cloud: &PointCloud) -> Result<Self> {
        if cloud.is_empty() {
            return Err(CloudError::EmptyCloud(cloud.name().to_string()));
        }

        let bbox = cloud.bounding_box();
        if !bbox.is_valid() {
            return Err(CloudError::NoFinitePoints(cloud.name().to_string()));
        }

        let cube = bbox.cubical();
        // all points at the same position still need a non-degenerate cube
        let side = match cube.size().x {
            s if s > 0.0 => s,
            _ => 1.0,
        };

        let mut codes = Vec::new();
        codes
            .try_reserve_exact(cloud.size())
            .map_err(|e| CloudError::out_of_memory("octree codes", e))?;

        for (index, point) in cloud.points().iter().enumerate() {
            if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
                continue;
            }
            let pos = [
                Self::axis_cell(point.x, cube.min.x, side),
                Self::axis_cell(point.y, cube.min.y, side),
                Self::axis_cell(point.z, cube.min.z, side),
            ];
            codes.push(IndexedCode {
                code: encode(pos),
                index,
            });
        }

        // (code, index) pairs are unique, so the unstable sort is deterministic
        codes.par_sort_unstable();

        Ok(Self {
            bbox: cube,
            side,
            codes,
            cloud_size: cloud.size(),
        })
    }

    fn axis_cell(value: f32, min: f32, side: f32) -> u32 {
        let rel = ((value - min) / side) as f64 * CELLS_PER_AXIS as f64;
        (rel.floor().max(0.0) as u64).min(CELLS_PER_AXIS as u64 - 1) as u32
    }

    /// Cubical bounding box of the indexed points
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Number of points of the cloud the octree was built for
    pub fn cloud_size(&self) -> usize {
        self.cloud_size
    }

    /// Number of indexed (finite) points
    pub fn point_count(&self) -> usize {
        self.codes.len()
    }

    pub fn codes(&self) -> &[IndexedCode] {
        &self.codes
    }

    /// Edge length of a cell at `level`
    pub fn cell_size(&self, level: u8) -> f32 {
        self.side / (1u64 << level.min(MAX_OCTREE_LEVEL)) as f32
    }

    /// Level whose cell size is closest to `size`
    pub fn find_best_level_for_cell_size(&self, size: f32) -> u8 {
        (1..=MAX_OCTREE_LEVEL)
            .min_by(|&a, &b| {
                let da = (self.cell_size(a) - size).abs();
                let db = (self.cell_size(b) - size).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(1)
    }

    /// Center of a cell given its code at `level`
    pub fn cell_center(&self, code: u64, level: u8) -> Point3<f32> {
        let pos = decode(code);
        let size = self.cell_size(level);
        Point3::new(
            self.bbox.min.x + (pos[0] as f32 + 0.5) * size,
            self.bbox.min.y + (pos[1] as f32 + 0.5) * size,
            self.bbox.min.z + (pos[2] as f32 + 0.5) * size,
        )
    }

    /// Occupied cells at `level`, sorted by code
    pub fn cells(&self, level: u8) -> Result<Vec<Cell>> {
        check_level(level)?;
        let mut cells: Vec<Cell> = Vec::new();
        for (i, entry) in self.codes.iter().enumerate() {
            let code = level_code(entry.code, level);
            match cells.last_mut() {
                Some(cell) if cell.code == code => cell.end = i + 1,
                _ => {
                    cells
                        .try_reserve(1)
                        .map_err(|e| CloudError::out_of_memory("octree cell table", e))?;
                    cells.push(Cell {
                        code,
                        start: i,
                        end: i + 1,
                    });
                }
            }
        }
        Ok(cells)
    }

    /// Number of occupied cells at `level`
    pub fn cell_count(&self, level: u8) -> Result<usize> {
        check_level(level)?;
        let mut count = 0;
        let mut previous = None;
        for entry in &self.codes {
            let code = level_code(entry.code, level);
            if previous != Some(code) {
                count += 1;
                previous = Some(code);
            }
        }
        Ok(count)
    }

    /// Point indices of a cell
    pub fn cell_points<'a>(&'a self, cell: &Cell) -> impl Iterator<Item = usize> + 'a {
        self.codes[cell.start..cell.end].iter().map(|c| c.index)
    }

    /// Label the connected components formed by occupied cells at `level`.
    ///
    /// Two cells are connected when they share a face (`six_connexity`) or
    /// any face, edge or corner. `labels` receives one value per cloud
    /// point: 1-based component labels in discovery order (cells visited by
    /// increasing code), NaN for points that are not indexed. Returns the
    /// number of components.
    pub fn label_connected_components(
        &self,
        level: u8,
        six_connexity: bool,
        labels: &mut [f32],
    ) -> Result<usize> {
        check_level(level)?;
        if labels.len() != self.cloud_size {
            return Err(CloudError::SizeMismatch {
                expected: self.cloud_size,
                actual: labels.len(),
            });
        }

        let cells = self.cells(level)?;
        let mut cell_labels: Vec<u32> = Vec::new();
        cell_labels
            .try_reserve_exact(cells.len())
            .map_err(|e| CloudError::out_of_memory("cell labels", e))?;
        cell_labels.resize(cells.len(), 0);

        let offsets = neighbour_offsets(six_connexity);
        let cells_per_axis = 1i64 << level;
        let mut component_count: u32 = 0;
        let mut stack: Vec<usize> = Vec::new();

        for seed in 0..cells.len() {
            if cell_labels[seed] != 0 {
                continue;
            }
            component_count = next_label(component_count)?;
            cell_labels[seed] = component_count;
            stack.push(seed);

            while let Some(current) = stack.pop() {
                let pos = decode(cells[current].code);
                for offset in &offsets {
                    let n = [
                        pos[0] as i64 + offset[0],
                        pos[1] as i64 + offset[1],
                        pos[2] as i64 + offset[2],
                    ];
                    if n.iter().any(|&c| c < 0 || c >= cells_per_axis) {
                        continue;
                    }
                    let code = encode([n[0] as u32, n[1] as u32, n[2] as u32]);
                    if let Ok(neighbour) = cells.binary_search_by_key(&code, |cell| cell.code) {
                        if cell_labels[neighbour] == 0 {
                            cell_labels[neighbour] = component_count;
                            stack.push(neighbour);
                        }
                    }
                }
            }
        }

        labels.fill(f32::NAN);
        for (cell, &label) in cells.iter().zip(&cell_labels) {
            for index in self.cell_points(cell) {
                labels[index] = label as f32;
            }
        }

        Ok(component_count as usize)
    }
}

/// Label after `count`, bounded by [`MAX_COMPONENT_LABEL`]
fn next_label(count: u32) -> Result<u32> {
    if count >= MAX_COMPONENT_LABEL {
        return Err(CloudError::TooManyLabels {
            count: u64::from(count) + 1,
            max: MAX_COMPONENT_LABEL,
        });
    }
    Ok(count + 1)
}

fn check_level(level: u8) -> Result<()> {
    if level > MAX_OCTREE_LEVEL {
        return Err(CloudError::InvalidOctreeLevel {
            level,
            max: MAX_OCTREE_LEVEL,
        });
    }
    Ok(())
}

fn level_code(code: u64, level: u8) -> u64 {
    code >> (3 * (MAX_OCTREE_LEVEL - level) as u32)
}

fn neighbour_offsets(six_connexity: bool) -> Vec<[i64; 3]> {
    if six_connexity {
        return vec![
            [-1, 0, 0],
            [1, 0, 0],
            [0, -1, 0],
            [0, 1, 0],
            [0, 0, -1],
            [0, 0, 1],
        ];
    }
    let mut offsets = Vec::with_capacity(26);
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                if (dx, dy, dz) != (0, 0, 0) {
                    offsets.push([dx, dy, dz]);
                }
            }
        }
    }
    offsets
}

fn spread_bits(v: u32) -> u64 {
    let mut x = (v as u64) & 0x1f_ffff;
    x = (x | (x << 32)) & 0x001f_0000_0000_ffff;
    x = (x | (x << 16)) & 0x001f_0000_ff00_00ff;
    x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x << 2)) & 0x1249_2492_4924_9249;
    x
}

fn compact_bits(code: u64) -> u32 {
    let mut x = code & 0x1249_2492_4924_9249;
    x = (x ^ (x >> 2)) & 0x10c3_0c30_c30c_30c3;
    x = (x ^ (x >> 4)) & 0x100f_00f0_0f00_f00f;
    x = (x ^ (x >> 8)) & 0x001f_0000_ff00_00ff;
    x = (x ^ (x >> 16)) & 0x001f_0000_0000_ffff;
    x = (x ^ (x >> 32)) & 0x1f_ffff;
    x as u32
}

/// Interleave cell coordinates into a Morton code
pub fn encode(pos: [u32; 3]) -> u64 {
    spread_bits(pos[0]) | (spread_bits(pos[1]) << 1) | (spread_bits(pos[2]) << 2)
}

/// Cell coordinates of a Morton code
pub fn decode(code: u64) -> [u32; 3] {
    [compact_bits(code), compact_bits(code >> 1), compact_bits(code >> 2)]
}
