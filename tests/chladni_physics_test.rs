use rand::{SeedableRng, rngs::StdRng};
use render_samples::particles::{
    Particle,
    physics::{Simulator, apply_drag, chladni, gradient, reflect, step},
};

mod common;
use common::test_utils::small_plate;

#[test]
fn chladni_values_are_in_unit_interval() {
    let params = small_plate().params(0.016, 0);
    for y in 0..params.height as i32 {
        for x in 0..params.width as i32 {
            let v = chladni(&params, x, y);
            assert!((0.0..=1.0).contains(&v), "chladni({x}, {y}) = {v}");
        }
    }
}

#[test]
fn gradient_never_points_uphill() {
    let params = small_plate().params(0.016, 0);
    for y in (0..params.height as i32).step_by(3) {
        for x in (0..params.width as i32).step_by(3) {
            for rand in [0.0, 0.33, 0.999] {
                let (gx, gy) = gradient(&params, (x, y), rand);
                assert!(gx.abs() <= 1 && gy.abs() <= 1);
                if (gx, gy) != (0, 0) {
                    assert!(chladni(&params, x + gx, y + gy) <= chladni(&params, x, y));
                }
            }
        }
    }
}

#[test]
fn drag_never_flips_the_sign() {
    for v in [-10.0, -0.5, -0.01, 0.0, 0.01, 0.5, 10.0] {
        for drag in [0.0, 0.1, 1.0, 100.0] {
            let after = apply_drag(v, drag);
            assert!(after * v >= 0.0, "drag {drag} flipped {v} to {after}");
            assert!(after.abs() <= v.abs());
        }
    }
}

#[test]
fn reflection_keeps_positions_on_the_plate() {
    for (position, velocity) in [(-3.0, -5.0), (64.5, 2.0), (130.0, 9.0), (-0.0, 0.0), (31.0, 1.0)] {
        let (p, v) = reflect(position, velocity, 64.0);
        assert!((0.0..64.0).contains(&p), "{position} reflected to {p}");
        if (0.0..64.0).contains(&position) {
            assert_eq!(v, velocity);
        } else {
            assert_eq!(v, -velocity);
        }
    }
}

#[test]
fn resting_particle_without_time_stays_put() {
    let config = small_plate();
    let params = config.params(0.0, 0);
    let mut particle = Particle {
        position: [10.5, 20.5],
        velocity: [0.0, 0.0],
        mass: 1.0,
        _pad: [0.0; 3],
    };
    let mut counted = Vec::new();
    step(&config, &params, &mut particle, |index| {
        counted.push(index);
        0
    });
    assert_eq!(particle.position, [10.5, 20.5]);
    assert_eq!(particle.velocity, [0.0, 0.0]);
    assert_eq!(counted, vec![20 * config.width as usize + 10]);
}

#[test]
fn every_particle_is_counted_once_per_step() {
    let config = small_plate();
    let mut simulator = Simulator::new(config.clone(), &mut StdRng::seed_from_u64(3));
    for _ in 0..5 {
        simulator.step(1.0 / 60.0);
        assert_eq!(simulator.total_count(), config.particle_count() as u64);
        let image = simulator.take_density_image();
        assert_eq!(image.dimensions(), (config.width, config.height));
        assert_eq!(simulator.total_count(), 0);
    }
    assert_eq!(simulator.frame(), 5);
}

#[test]
fn particles_stay_on_the_plate() {
    let config = small_plate();
    let mut simulator = Simulator::new(config.clone(), &mut StdRng::seed_from_u64(9));
    for _ in 0..120 {
        simulator.step(1.0 / 30.0);
        simulator.take_density_image();
    }
    for p in &simulator.particles {
        assert!((0.0..config.width as f32).contains(&p.position[0]));
        assert!((0.0..config.height as f32).contains(&p.position[1]));
        assert!(p.velocity.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn density_saturates_at_the_colour_scale() {
    let config = small_plate();
    let resting = Particle {
        position: [5.5, 20.5],
        velocity: [0.0, 0.0],
        mass: 1.0,
        _pad: [0.0; 3],
    };
    let particles = vec![resting; 40];
    let mut simulator = Simulator::with_particles(config.clone(), particles);
    simulator.step(0.0);
    let image = simulator.take_density_image();
    assert_eq!(image.get_pixel(5, 20).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(6, 20).0, [0, 0, 0, 255]);
}

#[test]
fn same_particles_step_identically() {
    let config = small_plate();
    let particles = config.initial_particles(&mut StdRng::seed_from_u64(1));
    let mut a = Simulator::with_particles(config.clone(), particles.clone());
    let mut b = Simulator::with_particles(config, particles);
    for _ in 0..10 {
        a.step(0.02);
        b.step(0.02);
    }
    assert_eq!(a.particles, b.particles);
    assert_eq!(a.counts, b.counts);
}
