use cgmath::{Deg, InnerSpace};
use render_samples::camera::{Camera, LookCamera, MIN_ZOOM, Projection, ZOOM};

mod common;
use common::test_utils::approx_eq;

fn assert_orthonormal(camera: &Camera) {
    for v in [camera.front, camera.up, camera.right] {
        assert!(approx_eq(v.magnitude(), 1.0), "not unit length: {v:?}");
    }
    assert!(approx_eq(camera.front.dot(camera.up), 0.0));
    assert!(approx_eq(camera.front.dot(camera.right), 0.0));
    assert!(approx_eq(camera.up.dot(camera.right), 0.0));
}

#[test]
fn fly_camera_basis_stays_orthonormal() {
    let mut camera = Camera::default();
    assert_orthonormal(&camera);
    let drags = [(120.0, -40.0), (-3000.0, 900.0), (0.5, 0.5), (17.0, 4000.0)];
    for _ in 0..50 {
        for (dx, dy) in drags {
            camera.process_mouse_movement(dx, dy);
        }
    }
    assert_orthonormal(&camera);
}

#[test]
fn pitch_offset_rotates_front_by_that_angle() {
    let mut camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 1.0), Deg(0.0), Deg(0.0));
    // 1800 px at 0.05°/px is a 90° pitch.
    camera.process_mouse_movement(0.0, -1800.0);
    assert_orthonormal(&camera);
    assert!(approx_eq(camera.front.z, 0.0));
    assert!(approx_eq(camera.front.y.abs(), 1.0));
}

#[test]
fn zoom_is_clamped() {
    let mut camera = Camera::default();
    camera.process_mouse_scroll(100.0);
    assert_eq!(camera.zoom, MIN_ZOOM);
    camera.process_mouse_scroll(-100.0);
    assert_eq!(camera.zoom, ZOOM);
    camera.process_mouse_scroll(5.0);
    assert_eq!(camera.zoom, ZOOM - 5.0);
}

#[test]
fn look_camera_starts_looking_down_negative_z() {
    let camera = LookCamera::default();
    let front = camera.front();
    assert!(approx_eq(front.x, 0.0));
    assert!(approx_eq(front.y, 0.0));
    assert!(approx_eq(front.z, -1.0));
}

#[test]
fn look_camera_pitch_is_clamped() {
    let mut camera = LookCamera::default();
    camera.apply_drag(0.0, 1.0e6);
    assert_eq!(camera.pitch, LookCamera::MAX_PITCH);
    camera.apply_drag(0.0, -1.0e7);
    assert_eq!(camera.pitch, -LookCamera::MAX_PITCH);
}

#[test]
fn dragging_right_turns_left() {
    let mut camera = LookCamera::default();
    camera.apply_drag(1000.0, 0.0);
    assert!(camera.yaw < -90.0);
}

#[test]
fn zero_sized_projection_stays_square() {
    let square = Projection::new(600, 600, Deg(45.0), 0.1, 100.0).calc_matrix();
    for (width, height) in [(0, 600), (800, 0), (0, 0)] {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        projection.resize(width, height);
        let matrix = projection.calc_matrix();
        assert!(approx_eq(matrix.x.x, square.x.x), "{width}x{height}");
        assert!(approx_eq(matrix.y.y, square.y.y), "{width}x{height}");
    }
}
