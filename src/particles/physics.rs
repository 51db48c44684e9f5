//! CPU implementation of the particle update.
//!
//! Mirrors `update_particles.wgsl` and `render_texture.wgsl` step for step,
//! including the hash used for random numbers, so both backends pick the
//! same neighbours for the same input.

use image::RgbaImage;
use rand::Rng;

use super::{Particle, ParticleConfig, SimulationParams};

/// Nodal value of the plate at integer cell `(x, y)`, in `[0, 1]`.
pub fn chladni(params: &SimulationParams, x: i32, y: i32) -> f32 {
    use std::f32::consts::PI;
    let sx = x as f32 / params.width as f32 - 0.5;
    let sy = 0.5 - y as f32 / params.height as f32;
    let (m, n) = (params.m, params.n);
    ((n * PI * sx).cos() * (m * PI * sy).cos() - (m * PI * sx).cos() * (n * PI * sy).cos()).abs()
        / 2.0
}

/// Direction to one of the lowest in-bounds neighbours of `cell`.
///
/// Only neighbours at or below the centre value qualify; a strictly lower one
/// discards the candidates found so far. `rand` in `[0, 1)` selects among the
/// remaining ties. With no candidate the particle feels no force.
pub fn gradient(params: &SimulationParams, cell: (i32, i32), rand: f32) -> (i32, i32) {
    let (w, h) = (params.width as i32, params.height as i32);
    let mut min_value = chladni(params, cell.0, cell.1);
    let mut candidates = [(0, 0); 8];
    let mut count = 0;

    for i in -1..=1 {
        for j in -1..=1 {
            if i == 0 && j == 0 {
                continue;
            }
            let (x, y) = (cell.0 + i, cell.1 + j);
            if x < 0 || x >= w || y < 0 || y >= h {
                continue;
            }
            let value = chladni(params, x, y);
            if value <= min_value {
                if value < min_value {
                    min_value = value;
                    count = 0;
                }
                candidates[count] = (i, j);
                count += 1;
            }
        }
    }

    if count == 0 {
        return (0, 0);
    }
    let choice = ((rand * count as f32) as usize).min(count - 1);
    candidates[choice]
}

fn pcg(v: u32) -> u32 {
    let state = v.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Hash of a position and a seed to a float in `[0, 1)`.
pub fn hash_rand(x: f32, y: f32, seed: u32) -> f32 {
    let h = pcg(x.to_bits() ^ pcg(y.to_bits() ^ pcg(seed)));
    (h >> 8) as f32 / 16_777_216.0
}

/// Mirrors `position` back into `[0, limit)`, flipping `velocity` on a bounce.
pub fn reflect(position: f32, velocity: f32, limit: f32) -> (f32, f32) {
    let upper = limit - 1e-3;
    if position < 0.0 {
        ((-position).min(upper), -velocity)
    } else if position > upper {
        ((2.0 * limit - position).clamp(0.0, upper), -velocity)
    } else {
        (position, velocity)
    }
}

/// Moves `velocity` towards zero by `drag` without crossing it.
pub fn apply_drag(velocity: f32, drag: f32) -> f32 {
    if velocity > drag {
        velocity - drag
    } else if velocity < -drag {
        velocity + drag
    } else {
        0.0
    }
}

fn in_respawn_band(config: &ParticleConfig, x: f32, y: f32) -> bool {
    let band = config.respawn_band;
    (x - y).abs() < band || (x + y - config.width as f32).abs() < band
}

/// Advances one particle by `params.time_since_last_frame`.
///
/// `count_at` is handed the cell index the particle ends up in; it must
/// increment that cell's count and return the count from before.
pub fn step(
    config: &ParticleConfig,
    params: &SimulationParams,
    particle: &mut Particle,
    mut count_at: impl FnMut(usize) -> u32,
) {
    let dt = params.time_since_last_frame;
    let (w, h) = (params.width as f32, params.height as f32);
    let [mut x, mut y] = particle.position;
    let [mut vx, mut vy] = particle.velocity;

    x += vx * dt;
    y += vy * dt;
    (x, vx) = reflect(x, vx, w);
    (y, vy) = reflect(y, vy, h);

    let cell = (x as i32, y as i32);
    let pick = hash_rand(cell.0 as f32 / w, cell.1 as f32 / h, params.frame);
    let (gx, gy) = gradient(params, cell, pick);
    let vibration = chladni(params, cell.0, cell.1);
    let c = dt * vibration * 60.0 * params.force_multiplier / particle.mass;
    vx += c * gx as f32;
    vy += c * gy as f32;

    if in_respawn_band(config, x, y)
        && hash_rand(x, y, params.frame.wrapping_mul(4)) < config.respawn_probability
    {
        let seed = params.frame.wrapping_mul(4);
        let (ox, oy) = (x, y);
        x = hash_rand(ox + 0.1, oy + 0.2, seed.wrapping_add(1)) * (w - 1e-3);
        y = hash_rand(ox + 0.3, oy + 0.4, seed.wrapping_add(2)) * (h - 1e-3);
    }

    let index = (y as usize).min(params.height as usize - 1) * params.width as usize
        + (x as usize).min(params.width as usize - 1);
    let count = count_at(index);

    let drag = dt
        * (config.linear_drag
            + config.quadratic_drag * (vx * vx + vy * vy)
            + config.crowding_drag * count as f32);
    particle.position = [x, y];
    particle.velocity = [apply_drag(vx, drag), apply_drag(vy, drag)];
}

/// Whole-plate CPU simulation with its density counts.
pub struct Simulator {
    pub config: ParticleConfig,
    pub particles: Vec<Particle>,
    pub counts: Vec<u32>,
    frame: u32,
}

impl Simulator {
    pub fn new<R: Rng>(config: ParticleConfig, rng: &mut R) -> Self {
        let particles = config.initial_particles(rng);
        Self::with_particles(config, particles)
    }

    pub fn with_particles(config: ParticleConfig, particles: Vec<Particle>) -> Self {
        let counts = vec![0; config.cell_count()];
        Self {
            config,
            particles,
            counts,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn step(&mut self, dt: f32) {
        let params = self.config.params(dt, self.frame);
        let counts = &mut self.counts;
        for particle in &mut self.particles {
            step(&self.config, &params, particle, |index| {
                let before = counts[index];
                counts[index] += 1;
                before
            });
        }
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn total_count(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Grey density image; resets every count to zero like the render kernel.
    pub fn take_density_image(&mut self) -> RgbaImage {
        let (w, h) = (self.config.width, self.config.height);
        let scale = self.config.colour_scale;
        let counts = &mut self.counts;
        RgbaImage::from_fn(w, h, |x, y| {
            let count = std::mem::take(&mut counts[(y * w + x) as usize]);
            let grey = ((count as f32 / scale).min(1.0) * 255.0).round() as u8;
            image::Rgba([grey, grey, grey, 255])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimulationParams {
        ParticleConfig::default().params(1.0 / 60.0, 0)
    }

    #[test]
    fn hash_is_in_unit_interval() {
        for i in 0..1000 {
            let r = hash_rand(i as f32 * 0.37, i as f32 * 1.3, i);
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn edge_cells_only_look_inside() {
        let params = params();
        for r in [0.0, 0.5, 0.99] {
            let (gx, gy) = gradient(&params, (0, 0), r);
            assert!(gx >= 0 && gy >= 0);
        }
    }
}
