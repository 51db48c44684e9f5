#![allow(dead_code)]

use render_samples::{
    data_structures::voxel::{FREE_LABEL, GRID_HEIGHT, GRID_WIDTH, LabelSlice, SLICES},
    particles::ParticleConfig,
};

/// A plate small enough to step on the CPU in a debug build.
pub fn small_plate() -> ParticleConfig {
    ParticleConfig {
        width: 64,
        height: 64,
        particle_count_x: 16,
        particle_count_y: 16,
        ..Default::default()
    }
}

/// Every slice in [`SLICES`], all free space.
pub fn empty_slices() -> Vec<LabelSlice> {
    SLICES
        .map(|z| LabelSlice {
            z,
            origin: format!("voxels/slice_{z}.csv").into(),
            labels: vec![vec![FREE_LABEL; GRID_WIDTH]; GRID_HEIGHT],
        })
        .collect()
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[cfg(feature = "integration-tests")]
pub fn headless() -> (wgpu::Adapter, wgpu::Device, wgpu::Queue) {
    let _ = env_logger::builder().is_test(true).try_init();
    pollster::block_on(render_samples::context::headless()).unwrap()
}

/// An offscreen renderer on the headless adapter.
#[cfg(feature = "integration-tests")]
pub fn offscreen(width: u32, height: u32) -> render_samples::flow::Offscreen {
    let _ = env_logger::builder().is_test(true).try_init();
    pollster::block_on(render_samples::flow::Offscreen::new(width, height)).unwrap()
}

/// The RGBA8 value a clear colour is stored as.
pub fn expected_pixel(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

/// Asserts the pixel at `(x, y)` is within one step of `expected` per channel.
pub fn assert_pixel(image: &image::RgbaImage, x: u32, y: u32, expected: image::Rgba<u8>) {
    let actual = image.get_pixel(x, y);
    let close = actual
        .0
        .iter()
        .zip(expected.0)
        .all(|(&a, e)| a.abs_diff(e) <= 1);
    assert!(close, "pixel ({x}, {y}) is {actual:?}, expected {expected:?}");
}
