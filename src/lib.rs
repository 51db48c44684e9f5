//! render-samples
//!
//! Small self-contained GPU rendering samples on top of wgpu and winit. Each
//! sample owns its pipelines and buffers and is driven by the loop in [`flow`].
//!
//! Samples
//! - `triangle`: one orange triangle and a look-around camera
//! - `cube`: a single voxel-sized cube
//! - `instanced`: the voxel grid drawn as instanced cubes
//! - `voxels`: the voxel grid textured by six projected surround cameras
//! - `particles`: Chladni plate particles stepped by compute kernels
//!
//! High-level modules
//! - `camera`: fly and look cameras, projection and the camera uniform
//! - `context`: device, queue and target configuration shared with the sample,
//!   for a window or offscreen
//! - `data_structures`: vertices, instances, textures and the voxel grid
//! - `flow`: the sample trait and the winit application loop
//! - `particles`: particle configuration, CPU physics and the GPU kernels
//! - `pipelines`: colour, projective and blit render pipelines
//! - `readback`: buffer and texture copies back to the CPU
//! - `render`: draw lists a sample hands to the loop
//! - `resources`: asset loading relative to `./assets/`
//! - `surround`: the surround camera rig calibration
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod input;
pub mod particles;
pub mod pipelines;
pub mod readback;
pub mod render;
pub mod resources;
pub mod samples;
pub mod shader;
pub mod surround;

pub use error::{SampleError, SampleResult};
pub use flow::{RenderSample, run, run_with};
pub use samples::SampleKind;
