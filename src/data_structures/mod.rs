//! Data types the demo scene is built from.
//!
//! - `mesh` contains the cube geometry, vertex layout and tangent basis math
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `material` bundles the diffuse/specular/normal maps into one bind group

pub mod material;
pub mod mesh;
pub mod texture;
