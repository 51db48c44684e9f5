//! Voxels textured by projecting a surround camera image onto them.
//!
//! Each camera gets one [`Projector`]: its world to camera matrix and
//! normalized intrinsics in a uniform, plus its image. The voxel grid is drawn
//! once per projector, and fragments the camera cannot see are discarded.

use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        texture::Texture,
        vertex::{PositionVertex, Vertex},
    },
    error::SampleResult,
    pipelines::basic::mk_render_pipeline,
    shader::create_shader_module,
    surround::CameraPose,
    surround::Intrinsics,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectorUniform {
    extrinsic: [[f32; 4]; 4],
    focal_lengths: [f32; 2],
    principal_point: [f32; 2],
}

impl ProjectorUniform {
    pub fn new(pose: &CameraPose, intrinsics: &Intrinsics) -> Self {
        Self {
            extrinsic: pose.extrinsic.into(),
            focal_lengths: intrinsics.focal_lengths().into(),
            principal_point: intrinsics.principal_point().into(),
        }
    }
}

pub struct Projector {
    pub uniform: ProjectorUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Projector {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform: ProjectorUniform,
        image: &Texture,
        label: &str,
    ) -> anyhow::Result<Self> {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let sampler = image
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("camera texture `{label}` has no sampler"))?;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&image.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Ok(Self {
            uniform,
            buffer,
            bind_group,
        })
    }
}

pub fn mk_projector_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("projector_bind_group_layout"),
    })
}

pub fn mk_projective_pipeline(
    ctx: &Context,
    projector_layout: &wgpu::BindGroupLayout,
) -> SampleResult<wgpu::RenderPipeline> {
    let layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Projective Pipeline Layout"),
            bind_group_layouts: &[&ctx.camera.bind_group_layout, projector_layout],
            immediate_size: 0,
        });
    let shader = create_shader_module(
        &ctx.device,
        "voxel_projection.wgsl",
        include_str!("voxel_projection.wgsl"),
    )?;
    mk_render_pipeline(
        &ctx.device,
        &layout,
        ctx.config.format,
        Some(wgpu::BlendState::REPLACE),
        Some(Texture::DEPTH_FORMAT),
        &[PositionVertex::desc(), InstanceRaw::desc()],
        &shader,
        "vs_main",
        "Projective Pipeline",
    )
}
