//! Render pipeline construction.

pub mod scene;

pub use scene::mk_scene_pipeline;
