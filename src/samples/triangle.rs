use instant::Duration;

use crate::{
    camera::LookCamera,
    context::Context,
    data_structures::vertex::triangle,
    flow::RenderSample,
    pipelines::basic::mk_color_pipeline,
    render::{Draw, Render},
    samples::{upload_look_camera, vertex_buffer},
};

/// One orange triangle in front of a look-around camera.
pub struct TriangleSample {
    camera: LookCamera,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

impl TriangleSample {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        let geometry = triangle();
        Ok(Self {
            camera: LookCamera::default(),
            pipeline: mk_color_pipeline(ctx, false)?,
            vertices: vertex_buffer(&ctx.device, "Triangle Vertex Buffer", &geometry),
            vertex_count: geometry.len() as u32,
        })
    }
}

impl RenderSample for TriangleSample {
    fn on_init(&mut self, ctx: &mut Context) {
        ctx.clear_colour = wgpu::Color {
            r: 0.5,
            g: 0.5,
            b: 0.1,
            a: 1.0,
        };
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
