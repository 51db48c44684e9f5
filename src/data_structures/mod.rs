//! Engine data structures: vertices, instances, textures and voxel grids.
//!
//! - `vertex` holds the vertex formats and the fixed triangle/cube geometry
//! - `instance` holds per-voxel instance data for instanced draws
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `voxel` turns label slices into voxel world positions

pub mod instance;
pub mod texture;
pub mod vertex;
pub mod voxel;
