//! The fixed light rig and its shader-visible uniform.
//!
//! Three lights shine on the scene: a directional light, a point light at
//! the origin with quadratic attenuation, and a spot light bound to the
//! camera pose every frame to act as a flashlight. Everything except the
//! spot light pose is constant for the process lifetime.

use cgmath::{Deg, EuclideanSpace, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;

use crate::camera::Camera;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub k_constant: f32,
    pub k_linear: f32,
    pub k_quadratic: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub k_constant: f32,
    pub k_linear: f32,
    pub k_quadratic: f32,
    pub cut_off_angle: Rad<f32>,
}

/// The complete rig. Only [`follow_camera`](Self::follow_camera) mutates it.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub directional: DirectionalLight,
    pub point: PointLight,
    pub spot: SpotLight,
}

impl LightRig {
    /// The demo's rig: white lights, dim ambients, attenuation tuned for a
    /// scene roughly 15 units deep.
    pub fn demo_rig() -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vector3::new(0.0, -1.0, 0.0),
                ambient: Vector3::new(0.05, 0.05, 0.05),
                diffuse: Vector3::new(1.0, 1.0, 1.0),
                specular: Vector3::new(1.0, 1.0, 1.0),
            },
            point: PointLight {
                position: Point3::new(0.0, 0.0, 0.0),
                ambient: Vector3::new(0.01, 0.01, 0.01),
                diffuse: Vector3::new(1.0, 1.0, 1.0),
                specular: Vector3::new(1.0, 1.0, 1.0),
                k_constant: 1.0,
                k_linear: 0.09,
                k_quadratic: 0.032,
            },
            spot: SpotLight {
                position: Point3::new(0.0, 0.0, 0.0),
                direction: Vector3::new(0.0, 0.0, -1.0),
                ambient: Vector3::new(0.1, 0.1, 0.1),
                diffuse: Vector3::new(1.0, 1.0, 1.0),
                specular: Vector3::new(1.0, 1.0, 1.0),
                k_constant: 1.0,
                k_linear: 0.09,
                k_quadratic: 0.032,
                cut_off_angle: Deg(12.5).into(),
            },
        }
    }

    /// Rebind the spot light to the camera pose (flashlight emulation).
    pub fn follow_camera(&mut self, camera: &Camera) {
        self.spot.position = camera.position;
        self.spot.direction = camera.look_dir();
    }
}

// The GPU-side structs pack the attenuation scalars into the padding slots
// that WGSL leaves after each vec3, keeping host and shader layouts in sync
// without wasted rows.

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DirectionalLightUniform {
    direction: [f32; 3],
    _pad0: f32,
    ambient: [f32; 3],
    _pad1: f32,
    diffuse: [f32; 3],
    _pad2: f32,
    specular: [f32; 3],
    _pad3: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PointLightUniform {
    position: [f32; 3],
    k_constant: f32,
    ambient: [f32; 3],
    k_linear: f32,
    diffuse: [f32; 3],
    k_quadratic: f32,
    specular: [f32; 3],
    _pad0: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpotLightUniform {
    position: [f32; 3],
    k_constant: f32,
    direction: [f32; 3],
    k_linear: f32,
    ambient: [f32; 3],
    k_quadratic: f32,
    diffuse: [f32; 3],
    cut_off_angle: f32,
    specular: [f32; 3],
    _pad0: f32,
}

/// Everything the fragment shader needs about lighting, plus the normal
/// mapping toggle as a 0/1 integer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    directional: DirectionalLightUniform,
    point: PointLightUniform,
    spot: SpotLightUniform,
    normal_mapping_enabled: u32,
    _padding: [u32; 3],
}

impl LightsUniform {
    pub fn new(rig: &LightRig, normal_mapping: bool) -> Self {
        Self {
            directional: DirectionalLightUniform {
                direction: rig.directional.direction.into(),
                _pad0: 0.0,
                ambient: rig.directional.ambient.into(),
                _pad1: 0.0,
                diffuse: rig.directional.diffuse.into(),
                _pad2: 0.0,
                specular: rig.directional.specular.into(),
                _pad3: 0.0,
            },
            point: PointLightUniform {
                position: rig.point.position.to_vec().into(),
                k_constant: rig.point.k_constant,
                ambient: rig.point.ambient.into(),
                k_linear: rig.point.k_linear,
                diffuse: rig.point.diffuse.into(),
                k_quadratic: rig.point.k_quadratic,
                specular: rig.point.specular.into(),
                _pad0: 0.0,
            },
            spot: SpotLightUniform {
                position: rig.spot.position.to_vec().into(),
                k_constant: rig.spot.k_constant,
                direction: rig.spot.direction.into(),
                k_linear: rig.spot.k_linear,
                ambient: rig.spot.ambient.into(),
                k_quadratic: rig.spot.k_quadratic,
                diffuse: rig.spot.diffuse.into(),
                cut_off_angle: rig.spot.cut_off_angle.0,
                specular: rig.spot.specular.into(),
                _pad0: 0.0,
            },
            normal_mapping_enabled: normal_mapping as u32,
            _padding: [0; 3],
        }
    }
}

/// Light rig state bundled with its GPU resources, owned by the context.
#[derive(Debug)]
pub struct LightResources {
    pub rig: LightRig,
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let rig = LightRig::demo_rig();
        let uniform = LightsUniform::new(&rig, true);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("lights_bind_group"),
        });

        Self {
            rig,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("lights_bind_group_layout"),
    })
}
