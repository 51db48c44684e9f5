//! Vertex formats and the fixed sample geometry.

use cgmath::Vector3;

/// Side length of one voxel in world units.
pub const VOXEL_SIZE: f32 = 1.024;

/// Anything that can describe its own GPU vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl Vertex for PositionVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PositionVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

impl From<[f32; 3]> for PositionVertex {
    fn from(position: [f32; 3]) -> Self {
        Self { position }
    }
}

#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [[f32; 3]; 3] = [
    [ 0.0,  1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [ 1.0, -1.0, 0.0],
];

/// Unit cube centred on the origin, two triangles per face.
#[rustfmt::skip]
pub const CUBE_VERTICES: [[f32; 3]; 36] = [
    // -Z
    [-0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
    [ 0.5,  0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5],
    // +Z
    [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5],
    [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5],
    // -X
    [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5], [-0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5],
    // +X
    [ 0.5,  0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5],
    [ 0.5, -0.5, -0.5], [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5],
    // -Y
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5],
    [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5], [-0.5, -0.5, -0.5],
    // +Y
    [-0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5],
    [ 0.5,  0.5,  0.5], [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5],
];

pub fn triangle() -> Vec<PositionVertex> {
    TRIANGLE_VERTICES.iter().copied().map(PositionVertex::from).collect()
}

/// The unit cube with every coordinate multiplied by `scale`.
pub fn scaled_cube(scale: f32) -> Vec<PositionVertex> {
    CUBE_VERTICES
        .iter()
        .map(|&p| PositionVertex {
            position: (Vector3::from(p) * scale).into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_are_counter_clockwise_from_outside() {
        for tri in CUBE_VERTICES.chunks(3) {
            let a = Vector3::from(tri[0]);
            let b = Vector3::from(tri[1]);
            let c = Vector3::from(tri[2]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                cgmath::dot(normal, centroid) > 0.0,
                "triangle {tri:?} faces inwards"
            );
        }
    }

    #[test]
    fn scaled_cube_spans_voxel_size() {
        let cube = scaled_cube(VOXEL_SIZE);
        let max = cube
            .iter()
            .flat_map(|v| v.position)
            .fold(f32::MIN, f32::max);
        assert!((max - VOXEL_SIZE / 2.0).abs() < 1e-6);
    }
}
