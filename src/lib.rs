//! lumicube
//!
//! A small real-time rendering demo: ten textured cubes lit by a directional
//! light, a point light and a camera-bound spot light, with tangent-space
//! normal mapping that can be toggled at runtime. The crate exposes the
//! pieces the demo is built from so the per-frame update logic (camera,
//! lights, transforms, tangent basis) can be tested without a GPU.
//!
//! High-level modules
//! - `app`: winit application handler and the main event/render loop
//! - `camera`: first-person camera, mouse/keyboard controller and uniforms
//! - `context`: central GPU context that owns device/queue/pipelines
//! - `data_structures`: mesh, texture and material types
//! - `lights`: the fixed light rig and its shader-visible uniform
//! - `pipelines`: render pipeline construction
//! - `resources`: asset loading helpers
//! - `scene`: the fixed cube arrangement and shading settings

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod lights;
pub mod pipelines;
pub mod resources;
pub mod scene;

// Re-exports commonly used math types for convenience in downstream code.
pub use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};
