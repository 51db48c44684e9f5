use std::path::Path;

use cgmath::Vector3;
use render_samples::{
    data_structures::{
        vertex::VOXEL_SIZE,
        voxel::{GRID_HEIGHT, GRID_WIDTH, SLICES, VOXEL_OFFSET, VoxelGrid, parse_csv, to_world},
    },
    error::SampleError,
};

mod common;
use common::test_utils::{approx_eq, empty_slices};

#[test]
fn ground_layer_is_complete() {
    let grid = VoxelGrid::from_labels(&empty_slices(), VOXEL_OFFSET).unwrap();
    let ground = SLICES.start as f32;
    for y in (0..GRID_HEIGHT).step_by(7) {
        for x in (0..GRID_WIDTH).step_by(7) {
            let expected = to_world(Vector3::new(x as f32, y as f32, ground), VOXEL_OFFSET);
            assert!(
                grid.positions.contains(&expected),
                "missing ground voxel at ({x}, {y})"
            );
        }
    }
}

#[test]
fn free_space_above_ground_stays_empty() {
    let grid = VoxelGrid::from_labels(&empty_slices(), VOXEL_OFFSET).unwrap();
    let inside = to_world(Vector3::new(50.0, 50.0, 5.0), VOXEL_OFFSET);
    assert!(!grid.positions.contains(&inside));
}

#[test]
fn occupied_labels_become_voxels() {
    let mut slices = empty_slices();
    let slice = &mut slices[3];
    slice.labels[40][60] = 3;
    let cell = Vector3::new(60.0, 40.0, slice.z as f32);

    let grid = VoxelGrid::from_labels(&slices, VOXEL_OFFSET).unwrap();
    assert!(grid.positions.contains(&to_world(cell, VOXEL_OFFSET)));
}

#[test]
fn neighbouring_positions_are_distinct() {
    let mut slices = empty_slices();
    slices[0].labels[0][0] = 1;
    let grid = VoxelGrid::from_labels(&slices, VOXEL_OFFSET).unwrap();
    assert!(grid.positions.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn cells_are_offset_scaled_rotated_and_mirrored() {
    let world = to_world(Vector3::new(10.0, 20.0, 3.0), VOXEL_OFFSET);
    // Rz(-90°) maps (x, y) to (y, -x); the mirror then negates y again.
    let expected = Vector3::new(
        (20.0 + VOXEL_OFFSET.y) * VOXEL_SIZE,
        (10.0 + VOXEL_OFFSET.x) * VOXEL_SIZE,
        (3.0 + VOXEL_OFFSET.z) * VOXEL_SIZE,
    );
    assert!(approx_eq(world.x, expected.x));
    assert!(approx_eq(world.y, expected.y));
    assert!(approx_eq(world.z, expected.z));
}

#[test]
fn short_row_is_an_error() {
    let mut slices = empty_slices();
    slices[2].labels[5].pop();
    let result = VoxelGrid::from_labels(&slices, VOXEL_OFFSET);
    assert!(matches!(
        result,
        Err(SampleError::SliceTooSmall { columns, .. }) if columns == GRID_WIDTH - 1
    ));
}

#[test]
fn short_slice_error_names_its_file() {
    let mut slices = empty_slices();
    slices[2].labels.truncate(10);
    let error = VoxelGrid::from_labels(&slices, VOXEL_OFFSET).unwrap_err();
    assert!(matches!(
        &error,
        SampleError::SliceTooSmall { path, rows: 10, .. }
            if path == Path::new("voxels/slice_4.csv")
    ));
    assert!(error.to_string().contains("voxels/slice_4.csv"), "{error}");
}

#[test]
fn csv_reports_the_bad_cell() {
    let text = "17,17,17\n17,x,17\n";
    let result = parse_csv(text, Path::new("slice_2.csv"));
    assert!(matches!(
        result,
        Err(SampleError::Csv { line: 2, column: 2, .. })
    ));
}

#[test]
fn csv_skips_blank_lines() {
    let rows = parse_csv("1, 2,3\n\n4,5,6\n", Path::new("slice_2.csv")).unwrap();
    assert_eq!(rows, vec![vec![1, 2, 3], vec![4, 5, 6]]);
}

#[test]
fn random_grid_stays_in_range() {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let grid = VoxelGrid::random(500, 50.0, &mut rng);
    assert_eq!(grid.len(), 500);
    for p in &grid.positions {
        assert!(p.x.abs() <= 50.0 && p.y.abs() <= 50.0 && p.z.abs() <= 50.0);
    }
}
