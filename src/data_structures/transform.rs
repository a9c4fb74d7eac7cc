//! Per-instance transformation data for GPU rendering.
//!
//! Every mesh node carries one or more [`Transform`]s. World matrices are
//! composed CPU-side (parent matrix times local matrix) and uploaded as
//! packed [`TransformRaw`] instance data.

use cgmath::{Matrix4, Rad, Vector3};

/// Position, Euler rotation (radians) and scale of a single instance.
///
/// Rotation is stored as per-axis angles rather than a quaternion because the
/// animation mutates single axes by fixed increments every frame; the angles
/// accumulate unbounded and are only wrapped when inspected.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::new()
        }
    }

    fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * self.rotation_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Pack the world matrix of `parent * self` for the instance buffer.
    pub fn to_raw(&self, parent: &Matrix4<f32>) -> TransformRaw {
        let world = parent * self.to_matrix();
        TransformRaw {
            model: world.into(),
            normal: normal_matrix(&world),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper-left 3x3 of the world matrix. Valid as a normal matrix here because
/// every node in the scene has uniform scale.
fn normal_matrix(world: &Matrix4<f32>) -> [[f32; 3]; 3] {
    [
        [world.x.x, world.x.y, world.x.z],
        [world.y.x, world.y.y, world.y.z],
        [world.z.x, world.z.y, world.z.z],
    ]
}

/// The raw instance data as stored on the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl TransformRaw {
    /// Vertex layout of the instance buffer: a mat4 (four vec4 slots) followed
    /// by a mat3 (three vec3 slots), stepped per instance.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<TransformRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = Transform::new();
        assert_eq!(t.to_matrix(), Matrix4::identity());
    }

    #[test]
    fn translation_lands_in_last_column() {
        let t = Transform::at(1.0, 2.0, 3.0);
        let m = t.to_matrix();
        assert_eq!(m.w, Vector4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn parent_translation_composes_onto_child() {
        let parent = Transform::at(0.0, 10.0, 0.0).to_matrix();
        let child = Transform::at(0.0, 0.0, -10.0);
        let world = parent * child.to_matrix();
        assert_eq!(world.w, Vector4::new(0.0, 10.0, -10.0, 1.0));
    }

    #[test]
    fn z_rotation_spins_the_x_axis() {
        let mut t = Transform::new();
        t.rotation.z = std::f32::consts::FRAC_PI_2;
        let m = t.to_matrix();
        let x = m * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!((x.x).abs() < 1e-6);
        assert!((x.y - 1.0).abs() < 1e-6);
    }
}
