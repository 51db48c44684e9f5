use instant::Duration;
use rand::SeedableRng;

use crate::{
    camera::LookCamera,
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        vertex::{VOXEL_SIZE, scaled_cube},
        voxel::{VOXEL_OFFSET, VoxelGrid},
    },
    flow::RenderSample,
    pipelines::basic::mk_color_pipeline,
    render::{Draw, Render},
    resources::{load_voxel_grid, voxel_assets_present},
    samples::{cube::CLEAR_COLOUR, upload_look_camera, vertex_buffer},
};

/// Positions used when the voxel slices are not available.
pub const RANDOM_VOXELS: usize = 10_000;
pub const RANDOM_RANGE: f32 = 50.0;

/// The voxel grid as plain orange cubes, one instanced draw call.
pub struct InstancedSample {
    camera: LookCamera,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    vertex_count: u32,
    instances: wgpu::Buffer,
    instance_count: u32,
}

impl InstancedSample {
    pub async fn new(ctx: &Context) -> anyhow::Result<Self> {
        let grid = if voxel_assets_present() {
            load_voxel_grid(VOXEL_OFFSET).await?
        } else {
            log::warn!(
                "no voxel slices found, drawing {RANDOM_VOXELS} random voxels instead"
            );
            VoxelGrid::random(RANDOM_VOXELS, RANDOM_RANGE, &mut rand::rngs::StdRng::from_entropy())
        };
        log::info!("instancing {} voxels", grid.len());

        let raw: Vec<InstanceRaw> = grid.instances().iter().map(|i| i.to_raw()).collect();
        let geometry = scaled_cube(VOXEL_SIZE);
        Ok(Self {
            camera: LookCamera::default(),
            pipeline: mk_color_pipeline(ctx, true)?,
            vertices: vertex_buffer(&ctx.device, "Cube Vertex Buffer", &geometry),
            vertex_count: geometry.len() as u32,
            instances: vertex_buffer(&ctx.device, "Voxel Instance Buffer", &raw),
            instance_count: raw.len() as u32,
        })
    }
}

impl RenderSample for InstancedSample {
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
            vertex_buffers: vec![&self.vertices, &self.instances],
            vertices: 0..self.vertex_count,
            instances: 0..self.instance_count,
        })
    }
}
