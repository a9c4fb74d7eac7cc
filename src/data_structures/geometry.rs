//! Procedural shape generators and their GPU buffers.
//!
//! The scene is built entirely from parametric primitives: a partial-arc
//! circle for the blades, a torus for the outer ring, and cylinders for the
//! shaft and the stand. Each generator produces a CPU-side [`MeshData`]
//! which is uploaded once into a [`MeshBuffers`] and shared between nodes.

use std::f32::consts::TAU;

use wgpu::util::DeviceExt;

/// A single mesh vertex: position, normal and texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU-side triangle mesh produced by the generators below.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// A flat disc sector in the XY plane, normal towards +Z.
///
/// With a partial `theta_length` this yields the wedge the fan blades are
/// made of: a triangle fan from the center across `segments` steps of the
/// arc.
#[derive(Debug, Clone, Copy)]
pub struct CircleGeometry {
    pub radius: f32,
    pub segments: u32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl CircleGeometry {
    pub fn mesh_data(&self) -> MeshData {
        let segments = self.segments.max(3);
        let mut vertices = Vec::with_capacity(segments as usize + 2);
        vertices.push(Vertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.5, 0.5],
        });
        for s in 0..=segments {
            let theta = self.theta_start + s as f32 / segments as f32 * self.theta_length;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex {
                position: [self.radius * cos, self.radius * sin, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [(cos + 1.0) / 2.0, (sin + 1.0) / 2.0],
            });
        }
        let mut indices = Vec::with_capacity(segments as usize * 3);
        for s in 1..=segments {
            indices.extend_from_slice(&[s, s + 1, 0]);
        }
        MeshData { vertices, indices }
    }
}

/// A torus around the Z axis, centered at the origin.
#[derive(Debug, Clone, Copy)]
pub struct TorusGeometry {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
}

impl TorusGeometry {
    pub fn mesh_data(&self) -> MeshData {
        let radial = self.radial_segments.max(2);
        let tubular = self.tubular_segments.max(3);
        let ring = tubular + 1;

        let mut vertices = Vec::with_capacity(((radial + 1) * ring) as usize);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let (sin_v, cos_v) = v.sin_cos();
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                let (sin_u, cos_u) = u.sin_cos();

                let x = (self.radius + self.tube * cos_v) * cos_u;
                let y = (self.radius + self.tube * cos_v) * sin_u;
                let z = self.tube * sin_v;
                // The tube center circle lies in the XY plane; the normal
                // points away from it.
                let center = [self.radius * cos_u, self.radius * sin_u, 0.0];
                let normal = normalize([x - center[0], y - center[1], z - center[2]]);
                vertices.push(Vertex {
                    position: [x, y, z],
                    normal,
                    uv: [i as f32 / tubular as f32, j as f32 / radial as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
        for j in 1..=radial {
            for i in 1..=tubular {
                let a = ring * j + i - 1;
                let b = ring * (j - 1) + i - 1;
                let c = ring * (j - 1) + i;
                let d = ring * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        MeshData { vertices, indices }
    }
}

/// A capped cylinder (or truncated cone) along the Y axis.
#[derive(Debug, Clone, Copy)]
pub struct CylinderGeometry {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl CylinderGeometry {
    pub fn mesh_data(&self) -> MeshData {
        let radial = self.radial_segments.max(3);
        let half = self.height / 2.0;
        let slope = (self.radius_bottom - self.radius_top) / self.height;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Torso: two rings, top first.
        for (row, (y, radius)) in [(half, self.radius_top), (-half, self.radius_bottom)]
            .into_iter()
            .enumerate()
        {
            for i in 0..=radial {
                let u = i as f32 / radial as f32;
                let theta = u * TAU;
                let (sin, cos) = theta.sin_cos();
                vertices.push(Vertex {
                    position: [radius * sin, y, radius * cos],
                    normal: normalize([sin, slope, cos]),
                    uv: [u, row as f32],
                });
            }
        }
        let ring = radial + 1;
        for i in 0..radial {
            let a = i;
            let b = i + ring;
            let c = i + 1 + ring;
            let d = i + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        // Caps: a fan around one center vertex each.
        for (y, radius, sign) in [(half, self.radius_top, 1.0), (-half, self.radius_bottom, -1.0)]
        {
            if radius <= 0.0 {
                continue;
            }
            let center = vertices.len() as u32;
            vertices.push(Vertex {
                position: [0.0, y, 0.0],
                normal: [0.0, sign, 0.0],
                uv: [0.5, 0.5],
            });
            for i in 0..=radial {
                let theta = i as f32 / radial as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                vertices.push(Vertex {
                    position: [radius * sin, y, radius * cos],
                    normal: [0.0, sign, 0.0],
                    uv: [(sin + 1.0) / 2.0, (cos + 1.0) / 2.0],
                });
            }
            // Same counter-clockwise-outward winding as the torso: seen
            // along the cap normal the fan runs with increasing theta on
            // top and against it on the bottom.
            for i in 0..radial {
                let first = center + 1 + i;
                if sign > 0.0 {
                    indices.extend_from_slice(&[center, first, first + 1]);
                } else {
                    indices.extend_from_slice(&[center, first + 1, first]);
                }
            }
        }

        MeshData { vertices, indices }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        return [0.0, 0.0, 1.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Vertex and index buffers of one geometry, shared between mesh nodes.
#[derive(Debug)]
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn assert_indices_in_bounds(data: &MeshData) {
        let len = data.vertices.len() as u32;
        assert!(data.indices.iter().all(|&i| i < len));
        assert_eq!(data.indices.len() % 3, 0);
    }

    /// Every triangle's geometric (winding-derived) normal must point the
    /// same way as its vertex normals, otherwise back-face culling eats the
    /// front of the shape.
    fn assert_triangles_wind_with_their_normals(data: &MeshData) {
        for tri in data.indices.chunks(3) {
            let corner = |i: u32| {
                let v = &data.vertices[i as usize];
                (Vector3::from(v.position), Vector3::from(v.normal))
            };
            let (pa, na) = corner(tri[0]);
            let (pb, nb) = corner(tri[1]);
            let (pc, nc) = corner(tri[2]);
            let face = (pb - pa).cross(pc - pa);
            assert!(
                face.dot(na + nb + nc) > 0.0,
                "triangle {tri:?} winds against its normals"
            );
        }
    }

    #[test]
    fn circle_sector_counts() {
        let data = CircleGeometry {
            radius: 8.0,
            segments: 4,
            theta_start: 0.0,
            theta_length: 1.0,
        }
        .mesh_data();
        // center + 5 arc vertices, 4 triangles
        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices.len(), 12);
        assert_indices_in_bounds(&data);
    }

    #[test]
    fn circle_arc_vertices_sit_on_the_radius() {
        let data = CircleGeometry {
            radius: 8.0,
            segments: 4,
            theta_start: 0.0,
            theta_length: 1.0,
        }
        .mesh_data();
        for v in &data.vertices[1..] {
            let r = (v.position[0].powi(2) + v.position[1].powi(2)).sqrt();
            assert!((r - 8.0).abs() < 1e-4);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn torus_counts() {
        let data = TorusGeometry {
            radius: 10.0,
            tube: 1.485,
            radial_segments: 2,
            tubular_segments: 106,
        }
        .mesh_data();
        assert_eq!(data.vertices.len(), 3 * 107);
        assert_eq!(data.indices.len(), 2 * 106 * 6);
        assert_indices_in_bounds(&data);
    }

    #[test]
    fn torus_normals_are_unit_length() {
        let data = TorusGeometry {
            radius: 10.0,
            tube: 1.485,
            radial_segments: 2,
            tubular_segments: 106,
        }
        .mesh_data();
        for v in &data.vertices {
            let len = (v.normal[0].powi(2) + v.normal[1].powi(2) + v.normal[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cylinder_counts() {
        let data = CylinderGeometry {
            radius_top: 4.0,
            radius_bottom: 4.0,
            height: 20.0,
            radial_segments: 20,
        }
        .mesh_data();
        // torso: 2 rings of 21; caps: 2 * (center + 21 ring)
        assert_eq!(data.vertices.len(), 42 + 44);
        assert_eq!(data.indices.len(), 20 * 6 + 2 * 20 * 3);
        assert_indices_in_bounds(&data);
    }

    #[test]
    fn cylinder_caps_wind_the_same_way_as_the_torso() {
        for geometry in [
            CylinderGeometry {
                radius_top: 4.0,
                radius_bottom: 4.0,
                height: 20.0,
                radial_segments: 20,
            },
            CylinderGeometry {
                radius_top: 10.0,
                radius_bottom: 14.0,
                height: 1.0,
                radial_segments: 32,
            },
        ] {
            assert_triangles_wind_with_their_normals(&geometry.mesh_data());
        }
    }

    #[test]
    fn circle_triangles_wind_towards_their_face() {
        let data = CircleGeometry {
            radius: 8.0,
            segments: 4,
            theta_start: 0.0,
            theta_length: 1.0,
        }
        .mesh_data();
        assert_triangles_wind_with_their_normals(&data);
    }

    #[test]
    fn truncated_cone_spans_both_radii() {
        let data = CylinderGeometry {
            radius_top: 2.0,
            radius_bottom: 3.0,
            height: 30.0,
            radial_segments: 10,
        }
        .mesh_data();
        let top = &data.vertices[0];
        let bottom = &data.vertices[11];
        assert_eq!(top.position[1], 15.0);
        assert_eq!(bottom.position[1], -15.0);
        let r_top = (top.position[0].powi(2) + top.position[2].powi(2)).sqrt();
        let r_bot = (bottom.position[0].powi(2) + bottom.position[2].powi(2)).sqrt();
        assert!((r_top - 2.0).abs() < 1e-4);
        assert!((r_bot - 3.0).abs() < 1e-4);
        assert_indices_in_bounds(&data);
    }
}
