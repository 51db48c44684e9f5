use crate::{
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        texture::Texture,
        vertex::{PositionVertex, Vertex},
    },
    error::SampleResult,
    shader::{create_shader_module, validated},
};

/// Flat orange geometry seen through the camera uniform.
///
/// With `instanced` set the pipeline also reads an [`InstanceRaw`] offset per
/// instance and adds it to every vertex.
pub fn mk_color_pipeline(ctx: &Context, instanced: bool) -> SampleResult<wgpu::RenderPipeline> {
    let layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Color Pipeline Layout"),
            bind_group_layouts: &[&ctx.camera.bind_group_layout],
            immediate_size: 0,
        });
    let shader = create_shader_module(&ctx.device, "color.wgsl", include_str!("color.wgsl"))?;

    let (vertex_entry, vertex_layouts) = if instanced {
        ("vs_instanced", vec![PositionVertex::desc(), InstanceRaw::desc()])
    } else {
        ("vs_main", vec![PositionVertex::desc()])
    };

    mk_render_pipeline(
        &ctx.device,
        &layout,
        ctx.config.format,
        Some(wgpu::BlendState::REPLACE),
        Some(Texture::DEPTH_FORMAT),
        &vertex_layouts,
        &shader,
        vertex_entry,
        if instanced { "Instanced Pipeline" } else { "Color Pipeline" },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
    vertex_entry: &str,
    label: &str,
) -> SampleResult<wgpu::RenderPipeline> {
    validated(device, label, || {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vertex_entry),
                buffers: vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
        })
    })
}
