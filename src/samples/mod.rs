//! The rendering samples, one module each.

pub mod cube;
pub mod instanced;
pub mod particles;
pub mod triangle;
pub mod voxels;

use std::{fmt, str::FromStr};

use wgpu::util::DeviceExt;

use crate::{
    camera::LookCamera,
    context::Context,
    error::SampleError,
    flow::{RenderSample, SampleConstructor, SampleFuture},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleKind {
    Triangle,
    #[default]
    Cube,
    Instanced,
    Voxels,
    Particles,
}

impl SampleKind {
    pub const ALL: [SampleKind; 5] = [
        SampleKind::Triangle,
        SampleKind::Cube,
        SampleKind::Instanced,
        SampleKind::Voxels,
        SampleKind::Particles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SampleKind::Triangle => "triangle",
            SampleKind::Cube => "cube",
            SampleKind::Instanced => "instanced",
            SampleKind::Voxels => "voxels",
            SampleKind::Particles => "particles",
        }
    }

    pub fn constructor(self) -> SampleConstructor {
        Box::new(higher_ranked(move |ctx| self.build(ctx)))
    }

    fn build(self, ctx: &Context) -> SampleFuture<'_> {
        Box::pin(async move {
            log::info!("starting the {self} sample");
            let sample: Box<dyn RenderSample> = match self {
                SampleKind::Triangle => Box::new(triangle::TriangleSample::new(ctx)?),
                SampleKind::Cube => Box::new(cube::CubeSample::new(ctx)?),
                SampleKind::Instanced => Box::new(instanced::InstancedSample::new(ctx).await?),
                SampleKind::Voxels => Box::new(voxels::VoxelSample::new(ctx).await?),
                SampleKind::Particles => Box::new(particles::ParticleSample::new(ctx)?),
            };
            Ok::<_, anyhow::Error>(sample)
        })
    }
}

/// Pins the closure's signature so it accepts a context of any lifetime.
fn higher_ranked<F>(f: F) -> F
where
    F: for<'a> FnOnce(&'a Context) -> SampleFuture<'a>,
{
    f
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleKind {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| SampleError::UnknownSample(s.to_string()))
    }
}

/// Uploads the look camera's view together with a 45° projection.
pub(crate) fn upload_look_camera(ctx: &mut Context, camera: &LookCamera) {
    let projection = ctx.projection.calc_matrix();
    ctx.camera.write(&ctx.queue, camera.view_matrix(), projection);
}

pub(crate) fn vertex_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    contents: &[T],
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(contents),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Voxels".parse::<SampleKind>().ok(), Some(SampleKind::Voxels));
        assert_eq!(" particles ".parse::<SampleKind>().ok(), Some(SampleKind::Particles));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            "teapot".parse::<SampleKind>(),
            Err(SampleError::UnknownSample(name)) if name == "teapot"
        ));
    }

    #[test]
    fn defaults_to_cube() {
        assert_eq!(SampleKind::default(), SampleKind::Cube);
    }
}
