//! Cube geometry and the tangent-space basis computation.
//!
//! The demo renders exactly one mesh: a unit cube with 4 vertices per face
//! (24 total) so every face gets its own normal and 0..1 UV range, indexed
//! as two triangles per face. Tangents and bitangents are derived from the
//! UV parameterization before upload; they are never authored.

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

/// A single mesh vertex as laid out in the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
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
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

const fn vertex(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> MeshVertex {
    MeshVertex {
        position,
        normal,
        tex_coords,
        tangent: [0.0; 3],
        bitangent: [0.0; 3],
    }
}

/// The 24 cube vertices, tangent basis not yet computed.
///
/// Convention for each face: lower-left, lower-right, upper-right,
/// upper-left.
pub fn cube_vertices() -> Vec<MeshVertex> {
    vec![
        // Front
        vertex([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        vertex([1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        vertex([1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        vertex([-1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        // Back
        vertex([1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0]),
        vertex([-1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 0.0]),
        vertex([-1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 1.0]),
        vertex([1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 1.0]),
        // Left
        vertex([-1.0, -1.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 0.0]),
        vertex([-1.0, -1.0, 1.0], [-1.0, 0.0, 0.0], [1.0, 0.0]),
        vertex([-1.0, 1.0, 1.0], [-1.0, 0.0, 0.0], [1.0, 1.0]),
        vertex([-1.0, 1.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0]),
        // Right
        vertex([1.0, -1.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
        vertex([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [1.0, 0.0]),
        vertex([1.0, 1.0, -1.0], [1.0, 0.0, 0.0], [1.0, 1.0]),
        vertex([1.0, 1.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0]),
        // Top
        vertex([-1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
        vertex([1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
        vertex([1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 1.0]),
        vertex([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
        // Bottom
        vertex([-1.0, -1.0, -1.0], [0.0, -1.0, 0.0], [0.0, 0.0]),
        vertex([1.0, -1.0, -1.0], [0.0, -1.0, 0.0], [1.0, 0.0]),
        vertex([1.0, -1.0, 1.0], [0.0, -1.0, 0.0], [1.0, 1.0]),
        vertex([-1.0, -1.0, 1.0], [0.0, -1.0, 0.0], [0.0, 1.0]),
    ]
}

/// Two CCW triangles per face.
pub fn cube_indices() -> Vec<u32> {
    vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ]
}

/// Derive a tangent/bitangent pair per triangle from the UV
/// parameterization and write it to all three vertices.
///
/// With edges e1 = p1 - p0, e2 = p2 - p0 and the matching UV deltas, the
/// 2x2 UV Jacobian is inverted to express the edges in terms of the tangent
/// frame:
///
/// ```text
/// f = 1 / (du1*dv2 - du2*dv1)
/// tangent   = f * ( dv2*e1 - dv1*e2)
/// bitangent = f * (-du2*e1 + du1*e2)
/// ```
///
/// A vertex shared between triangles keeps the basis of whichever triangle
/// is processed last; there is no averaging. Callers must supply
/// non-degenerate UV triangles, a collapsed UV mapping makes `f` a division
/// by zero.
pub fn compute_tangents(vertices: &mut [MeshVertex], indices: &[u32]) {
    for tri in indices.chunks(3) {
        let p0 = vertices[tri[0] as usize];
        let p1 = vertices[tri[1] as usize];
        let p2 = vertices[tri[2] as usize];

        let e1 = Vector3::from(p1.position) - Vector3::from(p0.position);
        let e2 = Vector3::from(p2.position) - Vector3::from(p0.position);

        let du1 = p1.tex_coords[0] - p0.tex_coords[0];
        let dv1 = p1.tex_coords[1] - p0.tex_coords[1];
        let du2 = p2.tex_coords[0] - p0.tex_coords[0];
        let dv2 = p2.tex_coords[1] - p0.tex_coords[1];

        let f = 1.0 / (du1 * dv2 - du2 * dv1);
        let tangent = ((e1 * dv2 - e2 * dv1) * f).normalize();
        let bitangent = ((e2 * du1 - e1 * du2) * f).normalize();

        for &i in tri {
            vertices[i as usize].tangent = tangent.into();
            vertices[i as usize].bitangent = bitangent.into();
        }
    }
}

/// Static mesh geometry uploaded to the GPU once at startup.
#[derive(Debug)]
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    /// Build the cube with its tangent basis and upload it.
    pub fn cube(device: &wgpu::Device) -> Self {
        let mut vertices = cube_vertices();
        let indices = cube_indices();
        compute_tangents(&mut vertices, &indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn cube_has_expected_topology() {
        let vertices = cube_vertices();
        let indices = cube_indices();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn tangent_basis_is_unit_length_and_orthogonal_to_normal() {
        let mut vertices = cube_vertices();
        let indices = cube_indices();
        compute_tangents(&mut vertices, &indices);

        for v in &vertices {
            let normal = Vector3::from(v.normal);
            let tangent = Vector3::from(v.tangent);
            let bitangent = Vector3::from(v.bitangent);
            assert!((tangent.magnitude() - 1.0).abs() < EPS);
            assert!((bitangent.magnitude() - 1.0).abs() < EPS);
            assert!(tangent.dot(normal).abs() < EPS);
            assert!(bitangent.dot(normal).abs() < EPS);
        }
    }

    #[test]
    fn front_face_tangent_follows_u_direction() {
        let mut vertices = cube_vertices();
        let indices = cube_indices();
        compute_tangents(&mut vertices, &indices);

        // On the front face u grows along +x and v along +y.
        let v = &vertices[0];
        assert!((Vector3::from(v.tangent).dot(Vector3::unit_x()) - 1.0).abs() < EPS);
        assert!((Vector3::from(v.bitangent).dot(Vector3::unit_y()) - 1.0).abs() < EPS);
    }

    #[test]
    fn shared_vertices_keep_the_last_triangle_basis() {
        // A quad where the second triangle's UV frame is rotated relative to
        // the first, so the two triangles disagree on the tangent. Vertices
        // 0 and 2 are shared between both triangles.
        let mut vertices = vec![
            vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            vertex([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        ];
        let indices = vec![0, 1, 2, 2, 3, 0];
        compute_tangents(&mut vertices, &indices);

        // First triangle alone would leave (1,0,0); the second computes
        // (0,1,0) and wins on the shared vertices. No averaging happens.
        let last = [0.0, 1.0, 0.0];
        assert_eq!(vertices[0].tangent, last);
        assert_eq!(vertices[2].tangent, last);
        assert_eq!(vertices[3].tangent, last);
        assert_eq!(vertices[1].tangent, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[0].bitangent, [1.0, 0.0, 0.0]);
    }
}
