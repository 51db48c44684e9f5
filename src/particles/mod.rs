//! Chladni plate particle simulation.
//!
//! Particles drift over a `width x height` plate towards the nodal lines of
//! the Chladni pattern `(m, n)`. Every frame each particle moves, bounces off
//! the plate's edges, accelerates down the local gradient of the pattern and is
//! slowed by a drag that grows with speed and with how crowded its cell is.
//! Cells are counted so the density can be shown as a grey image.
//!
//! The same update runs in two places: [`gpu::ParticleCompute`] dispatches it as
//! WGSL compute kernels over a storage buffer, and [`physics::Simulator`] runs
//! it on the CPU when the adapter cannot run compute shaders.

pub mod gpu;
pub mod physics;

use rand::Rng;

pub const UPDATE_SHADER: &str = include_str!("update_particles.wgsl");
pub const RENDER_TEXTURE_SHADER: &str = include_str!("render_texture.wgsl");

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    pub width: u32,
    pub height: u32,
    pub particle_count_x: u32,
    pub particle_count_y: u32,
    pub mass_min: f32,
    pub mass_max: f32,
    pub m: f32,
    pub n: f32,
    pub force_multiplier: f32,
    /// Side of the square workgroup that writes the density image.
    pub texture_workgroup_size: u32,
    /// Workgroup size of the per-particle update kernel.
    pub particle_workgroup_size: u32,
    pub respawn_probability: f32,
    /// Half width of the two diagonals on which particles respawn.
    pub respawn_band: f32,
    pub linear_drag: f32,
    pub quadratic_drag: f32,
    pub crowding_drag: f32,
    /// A cell holding this many particles is drawn white.
    pub colour_scale: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            particle_count_x: 512,
            particle_count_y: 512,
            mass_min: 0.75,
            mass_max: 1.25,
            m: 4.0,
            n: 7.0,
            force_multiplier: 20.0,
            texture_workgroup_size: 16,
            particle_workgroup_size: 256,
            respawn_probability: 0.2,
            respawn_band: 3.0,
            linear_drag: 0.8,
            quadratic_drag: 0.0001,
            crowding_drag: 0.3,
            colour_scale: 15.0,
        }
    }
}

impl ParticleConfig {
    pub fn particle_count(&self) -> usize {
        (self.particle_count_x * self.particle_count_y) as usize
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Template values substituted into the compute kernels.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("texture_workgroup_size", self.texture_workgroup_size.to_string()),
            ("particle_workgroup_size", self.particle_workgroup_size.to_string()),
            ("respawn_probability", wgsl_float(self.respawn_probability)),
            ("respawn_band", wgsl_float(self.respawn_band)),
            ("linear_drag", wgsl_float(self.linear_drag)),
            ("quadratic_drag", wgsl_float(self.quadratic_drag)),
            ("crowding_drag", wgsl_float(self.crowding_drag)),
            ("colour_scale", wgsl_float(self.colour_scale)),
        ]
    }

    /// Particles spread uniformly over the plate, at rest, with random masses.
    pub fn initial_particles<R: Rng>(&self, rng: &mut R) -> Vec<Particle> {
        let (w, h) = (self.width as f32, self.height as f32);
        (0..self.particle_count())
            .map(|_| Particle {
                position: [rng.gen_range(0.0..w), rng.gen_range(0.0..h)],
                velocity: [0.0, 0.0],
                mass: rng.gen_range(self.mass_min..=self.mass_max),
                _pad: [0.0; 3],
            })
            .collect()
    }

    pub fn params(&self, dt: f32, frame: u32) -> SimulationParams {
        SimulationParams {
            force_multiplier: self.force_multiplier,
            time_since_last_frame: dt,
            m: self.m,
            n: self.n,
            width: self.width,
            height: self.height,
            frame,
            _pad: 0,
        }
    }
}

/// WGSL needs a decimal point to read a literal as `f32`.
fn wgsl_float(value: f32) -> String {
    let text = value.to_string();
    if text.contains('.') || text.contains('e') {
        text
    } else {
        format!("{text}.0")
    }
}

/// One particle as stored in the GPU storage buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub mass: f32,
    pub _pad: [f32; 3],
}

/// Per-frame uniforms of the update kernel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimulationParams {
    pub force_multiplier: f32,
    pub time_since_last_frame: f32,
    pub m: f32,
    pub n: f32,
    pub width: u32,
    pub height: u32,
    pub frame: u32,
    pub _pad: u32,
}

/// Where the particle update runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleBackend {
    Gpu,
    Cpu,
}

impl ParticleBackend {
    pub fn for_adapter(downlevel: &wgpu::DownlevelCapabilities) -> Self {
        if downlevel
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            Self::Gpu
        } else {
            Self::Cpu
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn backend_follows_compute_support() {
        let mut downlevel = wgpu::DownlevelCapabilities::default();
        assert_eq!(ParticleBackend::for_adapter(&downlevel), ParticleBackend::Gpu);
        downlevel.flags.remove(wgpu::DownlevelFlags::COMPUTE_SHADERS);
        assert_eq!(ParticleBackend::for_adapter(&downlevel), ParticleBackend::Cpu);
    }

    #[test]
    fn particle_matches_storage_layout() {
        assert_eq!(std::mem::size_of::<Particle>(), 32);
        assert_eq!(std::mem::size_of::<SimulationParams>(), 32);
    }

    #[test]
    fn initial_particles_are_on_the_plate_and_at_rest() {
        let config = ParticleConfig {
            particle_count_x: 8,
            particle_count_y: 8,
            ..Default::default()
        };
        let particles = config.initial_particles(&mut StdRng::seed_from_u64(7));
        assert_eq!(particles.len(), 64);
        for p in particles {
            assert!((0.0..1024.0).contains(&p.position[0]));
            assert!((0.0..1024.0).contains(&p.position[1]));
            assert_eq!(p.velocity, [0.0, 0.0]);
            assert!((0.75..=1.25).contains(&p.mass));
        }
    }

    #[test]
    fn float_values_are_wgsl_literals() {
        assert_eq!(wgsl_float(15.0), "15.0");
        assert_eq!(wgsl_float(0.2), "0.2");
    }
}
