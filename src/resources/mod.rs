//! Asset loading from the `assets/` directory next to the executable.

use anyhow::{Context, Result};
use std::path::Path;

use crate::data_structures::texture::Texture;

pub async fn load_binary(file_name: &str) -> Result<Vec<u8>> {
    let path = Path::new("assets").join(file_name);
    std::fs::read(&path).with_context(|| format!("failed to read asset {}", path.display()))
}

pub async fn load_texture(
    file_name: &str,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name, is_normal_map)
}
