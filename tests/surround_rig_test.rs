use cgmath::{InnerSpace, Matrix, Matrix4, SquareMatrix};
use render_samples::surround::RIG;

mod common;
use common::test_utils::approx_eq;

#[test]
fn extrinsic_maps_camera_centre_to_origin() {
    for cam in &RIG {
        let pose = cam.pose();
        let p = pose.extrinsic * pose.centre.extend(1.0);
        assert!(
            p.truncate().magnitude() < 1e-4,
            "{} centre maps to {p:?}",
            cam.name
        );
        assert!(approx_eq(p.w, 1.0));
    }
}

#[test]
fn extrinsic_is_a_rigid_transform() {
    for cam in &RIG {
        let m: Matrix4<f32> = cam.pose().extrinsic;
        assert!((m.determinant() - 1.0).abs() < 1e-3, "{}", cam.name);
        let last = m.row(3);
        assert!(approx_eq(last.x, 0.0) && approx_eq(last.y, 0.0) && approx_eq(last.z, 0.0));
        assert!(approx_eq(last.w, 1.0));
    }
}

#[test]
fn intrinsics_are_normalized() {
    for cam in &RIG {
        let f = cam.intrinsics.focal_lengths();
        let c = cam.intrinsics.principal_point();
        assert!(f.x > 0.0 && f.x < 1.0 && f.y > 0.0 && f.y < 2.0, "{}", cam.name);
        assert!((0.0..1.0).contains(&c.x) && (0.0..1.0).contains(&c.y), "{}", cam.name);
    }
}

#[test]
fn every_camera_has_an_image() {
    let paths: Vec<String> = RIG.iter().map(|cam| cam.image_path()).collect();
    assert!(paths.contains(&"cameras/front.jpg".to_string()));
    assert!(paths.contains(&"cameras/back_right.jpg".to_string()));
}
