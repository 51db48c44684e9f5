//! Voxel occupancy grids and the world positions derived from them.
//!
//! A scene is stored as horizontal slices, one CSV file per height `z`, each a
//! 100x100 table of semantic labels. Label 17 marks free space; every other
//! label is an occupied voxel. On top of the occupied cells the grid always
//! adds a ground layer, a one-voxel border on every slice and four walls, so
//! the projected camera images have something to land on.

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use cgmath::{Deg, Matrix3, Vector3};
use rand::Rng;

use crate::{
    data_structures::{instance::VoxelInstance, vertex::VOXEL_SIZE},
    error::{SampleError, SampleResult},
};

pub const GRID_WIDTH: usize = 100;
pub const GRID_HEIGHT: usize = 100;
pub const WALL_DEPTH: usize = 30;
pub const FREE_LABEL: i32 = 17;
/// Heights for which a `slice_{z}.csv` file exists. The lowest one is the ground.
pub const SLICES: Range<usize> = 2..8;
/// Moves the grid so the ego vehicle sits in its centre, with the ground slightly below it.
pub const VOXEL_OFFSET: Vector3<f32> = Vector3::new(-50.5, -50.5, -2.0);

/// One parsed slice and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSlice {
    pub z: usize,
    pub origin: PathBuf,
    pub labels: Vec<Vec<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelGrid {
    pub positions: Vec<Vector3<f32>>,
}

impl VoxelGrid {
    /// Builds the grid from already parsed label slices.
    pub fn from_labels(slices: &[LabelSlice], offset: Vector3<f32>) -> SampleResult<Self> {
        let ground = slices.iter().map(|s| s.z).min().unwrap_or(SLICES.start);
        let mut cells: Vec<Vector3<f32>> = Vec::new();

        for LabelSlice { z, origin, labels } in slices {
            check_dimensions(labels, origin)?;
            for y in 0..GRID_HEIGHT {
                for x in 0..GRID_WIDTH {
                    let cell = Vector3::new(x as f32, y as f32, *z as f32);
                    if *z == ground {
                        cells.push(cell);
                    }
                    if y == 0 || y == GRID_HEIGHT - 1 || x == 0 || x == GRID_WIDTH - 1 {
                        cells.push(cell);
                    }
                    if labels[y][x] != FREE_LABEL {
                        cells.push(cell);
                    }
                }
            }
        }

        cells.extend(walls());
        // Only neighbouring duplicates are removed; a cell may still repeat
        // between the slices and the walls.
        cells.dedup();

        let positions = cells.into_iter().map(|cell| to_world(cell, offset)).collect();
        Ok(Self { positions })
    }

    /// `count` positions drawn uniformly from the cube `[-range, range]^3`.
    pub fn random<R: Rng>(count: usize, range: f32, rng: &mut R) -> Self {
        let positions = (0..count)
            .map(|_| {
                Vector3::new(
                    rng.gen_range(-range..=range),
                    rng.gen_range(-range..=range),
                    rng.gen_range(-range..=range),
                )
            })
            .collect();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn instances(&self) -> Vec<VoxelInstance> {
        self.positions.iter().copied().map(VoxelInstance::from).collect()
    }
}

/// Grid cell to world space: offset, scale to voxel size, rotate -90° about Z,
/// then mirror Y to match the camera rig's coordinate frame.
pub fn to_world(cell: Vector3<f32>, offset: Vector3<f32>) -> Vector3<f32> {
    let scaled = (cell + offset) * VOXEL_SIZE;
    let rotated = Matrix3::from_angle_z(Deg(-90.0)) * scaled;
    Vector3::new(rotated.x, -rotated.y, rotated.z)
}

fn walls() -> Vec<Vector3<f32>> {
    let (w, h) = ((GRID_WIDTH - 1) as f32, (GRID_HEIGHT - 1) as f32);
    let mut walls = Vec::with_capacity(WALL_DEPTH * 2 * (GRID_WIDTH + GRID_HEIGHT));
    for z in 0..WALL_DEPTH {
        let z = z as f32;
        for y in 0..GRID_HEIGHT {
            walls.push(Vector3::new(0.0, y as f32, z));
            walls.push(Vector3::new(w, y as f32, z));
        }
        for x in 0..GRID_WIDTH {
            walls.push(Vector3::new(x as f32, 0.0, z));
            walls.push(Vector3::new(x as f32, h, z));
        }
    }
    walls
}

fn check_dimensions(labels: &[Vec<i32>], path: &Path) -> SampleResult<()> {
    let columns = labels.iter().map(Vec::len).min().unwrap_or(0);
    if labels.len() < GRID_HEIGHT || columns < GRID_WIDTH {
        return Err(SampleError::SliceTooSmall {
            path: path.to_path_buf(),
            rows: labels.len(),
            columns,
            expected: GRID_WIDTH.max(GRID_HEIGHT),
        });
    }
    Ok(())
}

/// One row per line, comma separated integers. Blank lines are skipped.
pub fn parse_csv(text: &str, origin: &Path) -> SampleResult<Vec<Vec<i32>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_idx, line)| {
            line.split(',')
                .enumerate()
                .map(|(col_idx, cell)| {
                    cell.trim().parse::<i32>().map_err(|_| SampleError::Csv {
                        path: origin.to_path_buf(),
                        line: line_idx + 1,
                        column: col_idx + 1,
                        cell: cell.to_string(),
                    })
                })
                .collect()
        })
        .collect()
}
