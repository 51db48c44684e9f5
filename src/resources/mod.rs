//! Loading of sample assets from the `assets/` directory.
//!
//! All paths are relative to `./assets/`, which `build.rs` also mirrors into
//! the build output.

use std::path::PathBuf;

use anyhow::Context;

use crate::data_structures::{
    texture::Texture,
    voxel::{LabelSlice, SLICES, VoxelGrid, parse_csv},
};

pub fn asset_path(file_name: &str) -> PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name)
}

/// Loads `file_name`, or a checkerboard when it is missing or unreadable.
pub async fn load_texture_or_checkerboard(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Texture {
    match load_texture(file_name, device, queue).await {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("{e:#}; using a checkerboard instead");
            Texture::create_checkerboard(device, queue, 256, file_name)
        }
    }
}

/// Reads every `voxels/slice_{z}.csv` and builds the voxel grid from them.
pub async fn load_voxel_grid(offset: cgmath::Vector3<f32>) -> anyhow::Result<VoxelGrid> {
    let mut slices = Vec::with_capacity(SLICES.len());
    for z in SLICES {
        let name = format!("voxels/slice_{z}.csv");
        let text = load_string(&name).await?;
        let origin = asset_path(&name);
        let labels = parse_csv(&text, &origin)?;
        slices.push(LabelSlice { z, origin, labels });
    }
    log::info!("loaded {} voxel slices", slices.len());
    Ok(VoxelGrid::from_labels(&slices, offset)?)
}

pub fn voxel_assets_present() -> bool {
    asset_path("voxels").is_dir()
}
