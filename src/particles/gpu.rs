//! The particle update as two compute kernels.
//!
//! `update_particles` moves every particle in the storage buffer and counts
//! arrivals per cell with `atomicAdd`. `render_texture` then swaps each count
//! for zero and writes it into the density texture as grey. Both run in one
//! compute pass, so the second sees everything the first wrote.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    error::SampleResult,
    shader::{create_shader_module, format_shader_code, validated},
};

use super::{Particle, ParticleConfig, RENDER_TEXTURE_SHADER, UPDATE_SHADER};

pub struct ParticleCompute {
    config: ParticleConfig,
    params_buffer: wgpu::Buffer,
    particle_buffer: wgpu::Buffer,
    count_buffer: wgpu::Buffer,
    update_pipeline: wgpu::ComputePipeline,
    update_bind_group: wgpu::BindGroup,
    texture_pipeline: wgpu::ComputePipeline,
    texture_bind_group: wgpu::BindGroup,
    frame: u32,
}

impl ParticleCompute {
    /// Uploads `particles` and builds both kernels, writing into `density`.
    pub fn new(
        device: &wgpu::Device,
        config: ParticleConfig,
        particles: &[Particle],
        density: &Texture,
    ) -> SampleResult<Self> {
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation params"),
            contents: bytemuck::cast_slice(&[config.params(0.0, 0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let particle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particles"),
            contents: bytemuck::cast_slice(particles),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        });
        let count_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle counts"),
            contents: bytemuck::cast_slice(&vec![0u32; config.cell_count()]),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
        });

        let values = config.values();
        let update_source = format_shader_code(UPDATE_SHADER, values.iter().cloned());
        let texture_source = format_shader_code(RENDER_TEXTURE_SHADER, values);
        let update_module = create_shader_module(device, "update_particles", &update_source)?;
        let texture_module = create_shader_module(device, "render_texture", &texture_source)?;

        let update_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("update_particles_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                storage_entry(1),
                storage_entry(2),
            ],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("render_texture_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                storage_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: Texture::STORAGE_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let update_pipeline = compute_pipeline(device, "update_particles", &update_layout, &update_module)?;
        let texture_pipeline = compute_pipeline(device, "render_texture", &texture_layout, &texture_module)?;

        let update_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("update_particles_bind_group"),
            layout: &update_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: particle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: count_buffer.as_entire_binding(),
                },
            ],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("render_texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: count_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&density.view),
                },
            ],
        });

        log::info!(
            "particle kernels ready: {} particles on a {}x{} plate",
            particles.len(),
            config.width,
            config.height
        );

        Ok(Self {
            config,
            params_buffer,
            particle_buffer,
            count_buffer,
            update_pipeline,
            update_bind_group,
            texture_pipeline,
            texture_bind_group,
            frame: 0,
        })
    }

    pub fn write_params(&mut self, queue: &wgpu::Queue, dt: f32) {
        let params = self.config.params(dt, self.frame);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::cast_slice(&[params]));
        self.frame = self.frame.wrapping_add(1);
    }

    /// Particle update only, leaving the counts in place.
    pub fn encode_update(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Update particles"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.update_pipeline);
        pass.set_bind_group(0, &self.update_bind_group, &[]);
        pass.dispatch_workgroups(self.update_groups(), 1, 1);
    }

    /// Update followed by the density texture.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Particles"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.update_pipeline);
        pass.set_bind_group(0, &self.update_bind_group, &[]);
        pass.dispatch_workgroups(self.update_groups(), 1, 1);

        let (gx, gy) = self.texture_groups();
        pass.set_pipeline(&self.texture_pipeline);
        pass.set_bind_group(0, &self.texture_bind_group, &[]);
        pass.dispatch_workgroups(gx, gy, 1);
    }

    pub fn update_groups(&self) -> u32 {
        (self.config.particle_count() as u32).div_ceil(self.config.particle_workgroup_size)
    }

    pub fn texture_groups(&self) -> (u32, u32) {
        let size = self.config.texture_workgroup_size;
        (self.config.width.div_ceil(size), self.config.height.div_ceil(size))
    }

    pub fn count_buffer(&self) -> &wgpu::Buffer {
        &self.count_buffer
    }

    pub fn particle_buffer(&self) -> &wgpu::Buffer {
        &self.particle_buffer
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn compute_pipeline(
    device: &wgpu::Device,
    entry_point: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    module: &wgpu::ShaderModule,
) -> SampleResult<wgpu::ComputePipeline> {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(entry_point),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });
    validated(device, entry_point, || {
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(entry_point),
            layout: Some(&layout),
            module,
            entry_point: Some(entry_point),
            compilation_options: Default::default(),
            cache: None,
        })
    })
}
