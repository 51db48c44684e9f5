//! Per-voxel instance data for GPU instancing.
//!
//! Every voxel shares the same cube mesh; only its position differs. The
//! position is packed into an [`InstanceRaw`] and fed to the vertex shader as a
//! step-mode `Instance` attribute, so one draw call renders the whole grid.

use cgmath::Vector3;

use crate::data_structures::vertex::Vertex;

#[derive(Clone, Debug, PartialEq)]
pub struct VoxelInstance {
    pub position: Vector3<f32>,
}

impl VoxelInstance {
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            offset: self.position.into(),
        }
    }
}

impl From<Vector3<f32>> for VoxelInstance {
    fn from(position: Vector3<f32>) -> Self {
        Self { position }
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    offset: [f32; 3],
}

/**
 * Location 0 is taken by the mesh position, so the instance offset sits at
 * location 1. The step mode makes the shader advance it once per instance
 * instead of once per vertex.
 */
impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}
