//! The demo scene: ten textured cubes with fixed transforms.
//!
//! Each cube shares the same mesh and material. Transforms are constant for
//! the process lifetime and uploaded once per object as a model matrix
//! uniform; the draw order follows the position table below.

use anyhow::Result;
use cgmath::{Deg, InnerSpace, Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::material::{self, Material};
use crate::data_structures::mesh::Mesh;
use crate::resources;

/// World positions of the ten cubes, in draw order.
pub const CUBE_POSITIONS: [[f32; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [2.0, 5.0, -15.0],
    [-1.5, -2.2, -2.5],
    [-3.8, -2.0, -12.3],
    [2.4, -0.4, -3.5],
    [-1.7, 3.0, -7.5],
    [1.3, -2.0, -2.5],
    [1.5, 2.0, -2.5],
    [1.5, 0.2, -1.5],
    [-1.3, 1.0, -1.5],
];

/// Model matrix for cube `index`: translate to its position, rotate by
/// `20 * index` degrees around the normalized (1, 1, 1) axis, scale by 0.5.
pub fn model_matrix(index: usize) -> Matrix4<f32> {
    let position = Vector3::from(CUBE_POSITIONS[index]);
    let axis = Vector3::new(1.0, 1.0, 1.0).normalize();
    Matrix4::from_translation(position)
        * Matrix4::from_axis_angle(axis, Deg(20.0 * index as f32))
        * Matrix4::from_scale(0.5)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn new(index: usize) -> Self {
        Self {
            model: model_matrix(index).into(),
        }
    }
}

/// Runtime-toggleable scene settings.
#[derive(Debug, Clone, Copy)]
pub struct SceneSettings {
    pub normal_mapping: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            normal_mapping: true,
        }
    }
}

impl SceneSettings {
    pub fn toggle_normal_mapping(&mut self) {
        self.normal_mapping = !self.normal_mapping;
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("object_bind_group_layout"),
    })
}

/// One cube's GPU-side transform.
#[derive(Debug)]
pub struct SceneObject {
    #[allow(unused)]
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl SceneObject {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, index: usize) -> Self {
        let uniform = ObjectUniform::new(index);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Object Buffer {index}")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("object_bind_group_{index}")),
        });

        Self { buffer, bind_group }
    }
}

/// Everything drawable: the cube mesh, the shared material and the ten
/// per-object transforms.
#[derive(Debug)]
pub struct Scene {
    pub mesh: Mesh,
    pub material: Material,
    pub material_layout: wgpu::BindGroupLayout,
    pub object_layout: wgpu::BindGroupLayout,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Load the container textures and build all GPU resources. Fails if any
    /// texture is missing or undecodable.
    pub async fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        let diffuse = resources::load_texture("container-diffuse.png", false, device, queue).await?;
        let specular =
            resources::load_texture("container-specular.png", false, device, queue).await?;
        let normal = resources::load_texture("container-normal.png", true, device, queue).await?;

        let material_layout = material::bind_group_layout(device);
        let material = Material::new(
            device,
            "container",
            diffuse,
            specular,
            normal,
            &material_layout,
        );

        let object_layout = object_bind_group_layout(device);
        let objects = (0..CUBE_POSITIONS.len())
            .map(|i| SceneObject::new(device, &object_layout, i))
            .collect();

        Ok(Self {
            mesh: Mesh::cube(device),
            material,
            material_layout,
            object_layout,
            objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Transform};

    #[test]
    fn first_cube_sits_at_the_origin_half_size() {
        // Index 0 rotates by 0 degrees, so the matrix is translate * scale.
        let m = model_matrix(0);
        let p = m.transform_point(Point3::new(1.0, 1.0, 1.0));
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);
        assert!((p.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn model_matrices_are_deterministic() {
        for i in 0..CUBE_POSITIONS.len() {
            assert_eq!(model_matrix(i), model_matrix(i));
        }
    }

    #[test]
    fn translation_column_matches_position_table() {
        for (i, pos) in CUBE_POSITIONS.iter().enumerate() {
            let m = model_matrix(i);
            assert_eq!(m.w.x, pos[0]);
            assert_eq!(m.w.y, pos[1]);
            assert_eq!(m.w.z, pos[2]);
        }
    }

    #[test]
    fn settings_toggle_flips_normal_mapping() {
        let mut settings = SceneSettings::default();
        assert!(settings.normal_mapping);
        settings.toggle_normal_mapping();
        assert!(!settings.normal_mapping);
        settings.toggle_normal_mapping();
        assert!(settings.normal_mapping);
    }
}
