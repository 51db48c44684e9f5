//! Cameras, projection and the camera uniform shared by every sample.
//!
//! Two camera models exist side by side:
//!
//! - [`Camera`] is a quaternion fly camera. Mouse movement rotates the
//!   orientation directly, so it never suffers from gimbal lock and can look
//!   straight up or down.
//! - [`LookCamera`] is the classic yaw/pitch look-around camera with a clamped
//!   pitch and a fixed +Y up vector.
//!
//! Both produce a right-handed view matrix; [`Projection`] produces the matching
//! perspective matrix already converted to wgpu's clip space.

use cgmath::{
    Deg, InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation3, SquareMatrix, Vector3,
};
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Default yaw in degrees.
pub const YAW: f32 = 0.0;
/// Default pitch in degrees. Looking almost straight down the -Z axis of a Z-up world.
pub const PITCH: f32 = 89.0;
pub const SPEED: f32 = 5.0;
pub const SENSITIVITY: f32 = 0.05;
/// Default (and maximum) vertical field of view in degrees.
pub const ZOOM: f32 = 45.0;
pub const MIN_ZOOM: f32 = 1.0;

/// wgpu's clip space has z in [0, 1] while cgmath produces OpenGL's [-1, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Movement directions, kept independent of any windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Quaternion-based fly camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,
    pub orientation: Quaternion<f32>,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees, kept in `[MIN_ZOOM, ZOOM]`.
    pub zoom: f32,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, V: Into<Vector3<f32>>>(
        position: P,
        world_up: V,
        yaw: Deg<f32>,
        pitch: Deg<f32>,
    ) -> Self {
        // Pitch about X first, then yaw about Y.
        let orientation = Quaternion::from_angle_y(yaw) * Quaternion::from_angle_x(pitch);
        let mut camera = Self {
            position: position.into(),
            front: -Vector3::unit_z(),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: world_up.into(),
            orientation,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_camera_vectors();
        camera
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Rotates the camera by a pointer offset in pixels.
    ///
    /// The vertical offset pitches around the camera's local X axis, the
    /// horizontal offset yaws around the world Z axis. Pitch is applied first.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        let x_offset = x_offset * self.mouse_sensitivity;
        let y_offset = y_offset * self.mouse_sensitivity;

        let q_pitch = Quaternion::from_axis_angle(Vector3::unit_x(), Deg(y_offset));
        let q_yaw = Quaternion::from_axis_angle(Vector3::unit_z(), Deg(x_offset));

        self.orientation = (q_yaw * self.orientation * q_pitch).normalize();
        self.update_camera_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, ZOOM);
    }

    fn update_camera_vectors(&mut self) {
        self.front = (self.orientation * -Vector3::unit_z()).normalize();
        self.right = (self.orientation * Vector3::unit_x()).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new((0.0, 0.0, 5.0), (0.0, 0.0, 1.0), Deg(YAW), Deg(PITCH))
    }
}

/// Yaw/pitch look-around camera with +Y up.
#[derive(Debug, Clone)]
pub struct LookCamera {
    pub position: Point3<f32>,
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Degrees, clamped to `[-MAX_PITCH, MAX_PITCH]`.
    pub pitch: f32,
    pub sensitivity: f32,
}

impl LookCamera {
    pub const MAX_PITCH: f32 = 89.0;

    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            yaw: -90.0,
            pitch: 0.0,
            sensitivity: 0.001,
        }
    }

    /// Applies a drag delta. Dragging right turns left, as on a touch screen.
    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        self.yaw += -dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    pub fn front(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = Rad::from(Deg(self.yaw)).0.sin_cos();
        let (sin_pitch, cos_pitch) = Rad::from(Deg(self.pitch)).0.sin_cos();
        Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front(), Vector3::unit_y())
    }
}

impl Default for LookCamera {
    fn default() -> Self {
        Self::new((0.0, 0.0, 3.0))
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy: fovy.into(),
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// A zero-sized side falls back to a square aspect, which cgmath accepts.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view: Matrix4::identity().into(),
            projection: Matrix4::identity().into(),
        }
    }

    pub fn update(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.view = view.into();
        self.projection = projection.into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: one uniform buffer bound at group 0, binding 0.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = CameraUniform::new();

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.uniform.update(view, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// Translates keyboard and scroll events into [`Camera`] operations.
#[derive(Debug, Default)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    scroll: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the event was consumed.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                true
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.right = pressed,
            _ => return false,
        }
        true
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();
        let pressed = [
            (self.forward, CameraMovement::Forward),
            (self.backward, CameraMovement::Backward),
            (self.left, CameraMovement::Left),
            (self.right, CameraMovement::Right),
        ];
        for (_, direction) in pressed.iter().filter(|(held, _)| *held) {
            camera.process_keyboard(*direction, dt);
        }
        if self.scroll != 0.0 {
            camera.process_mouse_scroll(self.scroll);
            self.scroll = 0.0;
        }
    }
}
