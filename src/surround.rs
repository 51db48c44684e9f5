//! Calibration of the six-camera surround rig used by the voxel sample.
//!
//! Each camera comes with pinhole intrinsics (in pixels of a 1600x900 image)
//! and an extrinsic pose: the rotation and translation that take points from
//! the camera frame into the ego-vehicle frame. The voxel shader needs the
//! opposite direction, world to camera, so [`model_matrix`] inverts the pose
//! after aligning the ego frame with the voxel grid.

use cgmath::{Deg, Matrix3, Matrix4, Quaternion, Rotation3, SquareMatrix, Vector2, Vector3};

pub const IMAGE_WIDTH: f32 = 1600.0;
pub const IMAGE_HEIGHT: f32 = 900.0;
pub const CAMERA_COUNT: usize = 6;
/// Shift between the calibration's ego frame and the voxel grid's frame.
pub const EXTRINSIC_OFFSET: Vector3<f32> = Vector3::new(0.0, 1.0, 1.5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Intrinsics {
    /// Focal lengths in normalized image coordinates.
    pub fn focal_lengths(&self) -> Vector2<f32> {
        Vector2::new(self.fx / IMAGE_WIDTH, self.fy / IMAGE_HEIGHT)
    }

    /// Principal point in normalized image coordinates.
    pub fn principal_point(&self) -> Vector2<f32> {
        Vector2::new(self.cx / IMAGE_WIDTH, self.cy / IMAGE_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SurroundCamera {
    pub name: &'static str,
    pub intrinsics: Intrinsics,
    /// Camera to ego rotation as `[w, x, y, z]`.
    pub rotation: [f32; 4],
    pub translation: [f32; 3],
}

impl SurroundCamera {
    pub fn image_path(&self) -> String {
        format!("cameras/{}.jpg", self.name)
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        let [w, x, y, z] = self.rotation;
        Quaternion::new(w, x, y, z)
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.translation.into()
    }

    pub fn pose(&self) -> CameraPose {
        let (extrinsic, centre) = model_matrix(self.rotation(), self.translation(), EXTRINSIC_OFFSET);
        CameraPose { extrinsic, centre }
    }
}

/// World-space pose of one surround camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// World to camera transform.
    pub extrinsic: Matrix4<f32>,
    /// Camera centre in world space.
    pub centre: Vector3<f32>,
}

/// Computes the world to camera matrix and the camera centre.
///
/// The calibration's ego frame is rotated 90° about Z relative to the voxel
/// grid, so both rotation and translation are pre-rotated before building the
/// camera to world matrix, which is then inverted. A singular matrix cannot
/// occur for a unit quaternion; if it does anyway the identity is returned.
pub fn model_matrix(
    rotation: Quaternion<f32>,
    translation: Vector3<f32>,
    extrinsic_offset: Vector3<f32>,
) -> (Matrix4<f32>, Vector3<f32>) {
    let align = Quaternion::from_angle_z(Deg(90.0));
    let rotation = align * rotation;
    let centre = align * (translation + extrinsic_offset);

    let mut camera_to_world = Matrix4::from(Matrix3::from(rotation));
    camera_to_world.w = centre.extend(1.0);

    let world_to_camera = camera_to_world.invert().unwrap_or_else(|| {
        log::warn!("camera pose is singular, falling back to identity");
        Matrix4::identity()
    });
    (world_to_camera, centre)
}

pub const RIG: [SurroundCamera; CAMERA_COUNT] = [
    SurroundCamera {
        name: "front",
        intrinsics: Intrinsics {
            fx: 1266.417203046554,
            fy: 1266.417203046554,
            cx: 816.2670197447984,
            cy: 491.50706579294757,
        },
        rotation: [0.4998015430569128, -0.5030316162024876, 0.4997798114386805, -0.49737083824542755],
        translation: [1.70079118954, 0.0159456324149, 1.51095763913],
    },
    SurroundCamera {
        name: "back",
        intrinsics: Intrinsics {
            fx: 809.2209905677063,
            fy: 809.2209905677063,
            cx: 829.2196003259838,
            cy: 481.77842384512485,
        },
        rotation: [0.5037872666382278, -0.49740249788611096, -0.4941850223835201, 0.5045496097725578],
        translation: [0.0283260309358, 0.00345136761476, 1.57910346144],
    },
    SurroundCamera {
        name: "front_left",
        intrinsics: Intrinsics {
            fx: 1272.5979470598488,
            fy: 1272.5979470598488,
            cx: 826.6154927353808,
            cy: 479.75165386361925,
        },
        rotation: [0.6757265034669446, -0.6736266522251881, 0.21214015046209478, -0.21122827103904068],
        translation: [1.52387798135, 0.494631336551, 1.50932822144],
    },
    SurroundCamera {
        name: "front_right",
        intrinsics: Intrinsics {
            fx: 1260.8474446004698,
            fy: 1260.8474446004698,
            cx: 807.968244525554,
            cy: 495.3344268742088,
        },
        rotation: [0.2060347966337182, -0.2026940577919598, 0.6824507824531167, -0.6713610884174485],
        translation: [1.5508477543, -0.493404796419, 1.49574800619],
    },
    SurroundCamera {
        name: "back_left",
        intrinsics: Intrinsics {
            fx: 1256.7414812095406,
            fy: 1256.7414812095406,
            cx: 792.1125740759628,
            cy: 492.7757465151356,
        },
        rotation: [0.6924185592174665, -0.7031619420114925, -0.11648342771943819, 0.11203317912370753],
        translation: [1.0148780988, -0.480568219723, 1.56239545128],
    },
    SurroundCamera {
        name: "back_right",
        intrinsics: Intrinsics {
            fx: 1259.5137405846733,
            fy: 1259.5137405846733,
            cx: 807.2529053838625,
            cy: 501.19579884916527,
        },
        rotation: [0.12280980120078765, -0.132400842670559, -0.7004305821388234, 0.690496031265798],
        // Same translation as back_left in the calibration this rig was taken from.
        translation: [1.0148780988, -0.480568219723, 1.56239545128],
    },
];
