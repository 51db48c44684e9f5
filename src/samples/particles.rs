//! Chladni plate particles, simulated in compute kernels or on the CPU.

use instant::Duration;
use rand::SeedableRng;

use crate::{
    context::Context,
    data_structures::texture::Texture,
    flow::RenderSample,
    particles::{ParticleBackend, ParticleConfig, gpu::ParticleCompute, physics::Simulator},
    pipelines::blit::Blit,
    render::{Draw, Render},
};

enum Stepper {
    Gpu(ParticleCompute),
    Cpu(Simulator),
}

pub struct ParticleSample {
    stepper: Stepper,
    density: Texture,
    blit: Blit,
}

impl ParticleSample {
    pub fn new(ctx: &Context) -> anyhow::Result<Self> {
        Self::with_config(ctx, ParticleConfig::default())
    }

    pub fn with_config(ctx: &Context, config: ParticleConfig) -> anyhow::Result<Self> {
        let density =
            Texture::create_storage_texture(&ctx.device, config.width, config.height, "Density");
        let mut rng = rand::rngs::StdRng::from_entropy();

        let backend = ParticleBackend::for_adapter(&ctx.downlevel);
        let stepper = match backend {
            ParticleBackend::Gpu => {
                let particles = config.initial_particles(&mut rng);
                Stepper::Gpu(ParticleCompute::new(&ctx.device, config, &particles, &density)?)
            }
            ParticleBackend::Cpu => {
                log::warn!(
                    "{} has no compute shaders, stepping particles on the CPU",
                    ctx.adapter_info.name
                );
                Stepper::Cpu(Simulator::new(config, &mut rng))
            }
        };
        log::info!("particle backend: {backend:?}");

        let blit = Blit::new(ctx, &density)?;
        Ok(Self {
            stepper,
            density,
            blit,
        })
    }
}

impl RenderSample for ParticleSample {
    fn on_update(&mut self, ctx: &mut Context, dt: Duration) {
        let dt = dt.as_secs_f32();
        match &mut self.stepper {
            Stepper::Gpu(compute) => compute.write_params(&ctx.queue, dt),
            Stepper::Cpu(simulator) => {
                simulator.step(dt);
                let image = simulator.take_density_image();
                let (width, height) = image.dimensions();
                ctx.queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        aspect: wgpu::TextureAspect::All,
                        texture: &self.density.texture,
                        mip_level: 0,
                        origin: wgpu::Origin3d::ZERO,
                    },
                    &image,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * width),
                        rows_per_image: Some(height),
                    },
                    wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }
    }

    fn on_compute(&mut self, _ctx: &Context, encoder: &mut wgpu::CommandEncoder) {
        if let Stepper::Gpu(compute) = &self.stepper {
            compute.encode(encoder);
        }
    }

    fn on_render<'a>(&'a self, _ctx: &'a Context) -> Render<'a> {
        Render::Draw(Draw {
            pipeline: &self.blit.pipeline,
            bind_groups: vec![&self.blit.bind_group],
            vertex_buffers: vec![],
            vertices: 0..3,
            instances: 0..1,
        })
    }
}
