//! Render pipelines and their WGSL shaders.
//!
//! - `basic`: the shared pipeline builder and the flat colour pipeline
//! - `projective`: voxels textured by a projected surround camera image
//! - `blit`: a texture stretched over the whole viewport

pub mod basic;
pub mod blit;
pub mod projective;
