use instant::Duration;

use crate::{
    camera::LookCamera,
    context::Context,
    data_structures::vertex::{VOXEL_SIZE, scaled_cube},
    flow::RenderSample,
    pipelines::basic::mk_color_pipeline,
    render::{Draw, Render},
    samples::{upload_look_camera, vertex_buffer},
};

pub const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// A single voxel-sized cube, viewed from outside.
pub struct CubeSample {
    camera: LookCamera,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

impl CubeSample {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let geometry = scaled_cube(VOXEL_SIZE);
        Ok(Self {
            camera: LookCamera::default(),
            pipeline: mk_color_pipeline(ctx, false)?,
            vertices: vertex_buffer(&ctx.device, "Cube Vertex Buffer", &geometry),
            vertex_count: geometry.len() as u32,
        })
    }
}

impl RenderSample for CubeSample {
    fn on_init(&mut self, ctx: &mut Context) {
        ctx.clear_colour = CLEAR_COLOUR;
    }

    fn on_touch(&mut self, dx: f32, dy: f32) {
        self.camera.apply_drag(dx, dy);
    }

    fn on_update(&mut self, ctx: &mut Context, _dt: Duration) {
        upload_look_camera(ctx, &self.camera);
    }

    fn on_render<'a>(&'a self, ctx: &'a Context) -> Render<'a> {
        Render::Draw(Draw {
            pipeline: &self.pipeline,
            bind_groups: vec![&ctx.camera.bind_group],
            vertex_buffers: vec![&self.vertices],
            vertices: 0..self.vertex_count,
            instances: 0..1,
        })
    }
}
