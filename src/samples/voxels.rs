//! The voxel grid coloured by the six surround cameras.
//!
//! Every camera image is projected onto the voxels in its own draw. The
//! projection shader discards what a camera cannot see, so the draws only
//! overlap where two cameras share a field of view.

use cgmath::Deg;
use instant::Duration;
use winit::event::WindowEvent;

use crate::{
    camera::{Camera, CameraController, PITCH, YAW},
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        vertex::{VOXEL_SIZE, scaled_cube},
        voxel::VOXEL_OFFSET,
    },
    flow::RenderSample,
    pipelines::projective::{Projector, ProjectorUniform, mk_projective_pipeline, mk_projector_layout},
    render::{Draw, Render},
    resources::{load_texture_or_checkerboard, load_voxel_grid},
    samples::{cube::CLEAR_COLOUR, vertex_buffer},
    surround::RIG,
};

pub struct VoxelSample {
    camera: Camera,
    controller: CameraController,
    pipeline: wgpu::RenderPipeline,
    projectors: Vec<Projector>,
    vertices: wgpu::Buffer,
    vertex_count: u32,
    instances: wgpu::Buffer,
    instance_count: u32,
}

impl VoxelSample {
    pub async fn new(ctx: &Context) -> anyhow::Result<Self> {
        let grid = load_voxel_grid(VOXEL_OFFSET).await?;
        let raw: Vec<InstanceRaw> = grid.instances().iter().map(|i| i.to_raw()).collect();

        let projector_layout = mk_projector_layout(&ctx.device);
        let mut projectors = Vec::with_capacity(RIG.len());
        for cam in &RIG {
            let image =
                load_texture_or_checkerboard(&cam.image_path(), &ctx.device, &ctx.queue).await;
            let uniform = ProjectorUniform::new(&cam.pose(), &cam.intrinsics);
            projectors.push(Projector::new(
                &ctx.device,
                &projector_layout,
                uniform,
                &image,
                cam.name,
            )?);
        }

        let start = RIG[0].pose().centre;
        log::info!(
            "{} voxels, {} projectors, camera at ({:.2}, {:.2}, {:.2})",
            raw.len(),
            projectors.len(),
            start.x,
            start.y,
            start.z
        );

        let geometry = scaled_cube(VOXEL_SIZE);
        Ok(Self {
            camera: Camera::new(
                (start.x, start.y, start.z),
                (0.0, 0.0, 1.0),
                Deg(YAW),
                Deg(PITCH),
            ),
            controller: CameraController::new(),
            pipeline: mk_projective_pipeline(ctx, &projector_layout)?,
            projectors,
            vertices: vertex_buffer(&ctx.device, "Cube Vertex Buffer", &geometry),
            vertex_count: geometry.len() as u32,
            instances: vertex_buffer(&ctx.device, "Voxel Instance Buffer", &raw),
            instance_count: raw.len() as u32,
        })
    }
}

impl RenderSample for VoxelSample {
    fn on_init(&mut self, ctx: &mut Context) {
        ctx.clear_colour = CLEAR_COLOUR;
    }

    fn on_touch(&mut self, dx: f32, dy: f32) {
        self.camera.process_mouse_movement(dx, dy);
    }

    fn on_window_events(&mut self, event: &WindowEvent) -> bool {
        self.controller.handle_window_events(event)
    }

    fn on_update(&mut self, ctx: &mut Context, dt: Duration) {
        self.controller.update(&mut self.camera, dt);
        ctx.projection.fovy = Deg(self.camera.zoom).into();
        let projection = ctx.projection.calc_matrix();
        ctx.camera
            .write(&ctx.queue, self.camera.view_matrix(), projection);
    }

    fn on_render<'a>(&'a self, ctx: &'a Context) -> Render<'a> {
        Render::Draws(
            self.projectors
                .iter()
                .map(|projector| Draw {
                    pipeline: &self.pipeline,
                    bind_groups: vec![&ctx.camera.bind_group, &projector.bind_group],
                    vertex_buffers: vec![&self.vertices, &self.instances],
                    vertices: 0..self.vertex_count,
                    instances: 0..self.instance_count,
                })
                .collect(),
        )
    }
}
