use crate::{
    context::Context,
    data_structures::texture::Texture,
    error::SampleResult,
    pipelines::basic::mk_render_pipeline,
    shader::create_shader_module,
};

/// Draws a texture over the whole viewport with a single generated triangle.
pub struct Blit {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
}

impl Blit {
    pub fn new(ctx: &Context, source: &Texture) -> anyhow::Result<Self> {
        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                multisampled: false,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                    label: Some("blit_bind_group_layout"),
                });

        let sampler = source
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("blit source texture has no sampler"))?;
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("blit_bind_group"),
        });

        let pipeline = mk_blit_pipeline(ctx, &bind_group_layout)?;
        Ok(Self {
            pipeline,
            bind_group,
        })
    }
}

fn mk_blit_pipeline(
    ctx: &Context,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> SampleResult<wgpu::RenderPipeline> {
    let layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            immediate_size: 0,
        });
    let shader = create_shader_module(&ctx.device, "blit.wgsl", include_str!("blit.wgsl"))?;
    mk_render_pipeline(
        &ctx.device,
        &layout,
        ctx.config.format,
        Some(wgpu::BlendState::REPLACE),
        Some(Texture::DEPTH_FORMAT),
        &[],
        &shader,
        "vs_main",
        "Blit Pipeline",
    )
}
