use anyhow::{Context as _, anyhow};

use crate::data_structures::texture::Texture;

/// Colour map plus its filtering sampler, group 0 of the mesh and background pipelines.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> anyhow::Result<wgpu::BindGroup> {
    let sampler = texture
        .sampler
        .as_ref()
        .ok_or_else(|| anyhow!("texture {label} has no sampler"))?;
    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    }))
}

/// Absolute http(s) URLs are fetched over the network on every target.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let origin = web_sys::window()
        .ok_or_else(|| anyhow!("no window to resolve {file_name} against"))?
        .location()
        .origin()
        .map_err(|err| anyhow!("page has no origin: {err:?}"))?;
    let base = reqwest::Url::parse(&format!("{origin}/assets/"))?;
    Ok(base.join(file_name)?)
}

async fn fetch(url: reqwest::Url) -> anyhow::Result<Vec<u8>> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/**
 * Read the bytes behind `source`.
 *
 * Remote URLs are downloaded. Anything else is an asset path: served from
 * `<origin>/assets/` in the browser and read from `./assets` natively.
 */
pub async fn load_binary(source: &str) -> anyhow::Result<Vec<u8>> {
    if is_remote(source) {
        return fetch(reqwest::Url::parse(source)?).await;
    }
    #[cfg(target_arch = "wasm32")]
    let data = fetch(format_url(source)?).await?;
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(source);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?
    };
    Ok(data)
}

pub async fn load_texture(
    source: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(source)
        .await
        .with_context(|| format!("could not load {source}"))?;
    Texture::from_bytes(device, queue, &data, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_sources_are_urls() {
        assert!(is_remote("https://threejs.org/examples/textures/gradient.jpg"));
        assert!(is_remote("http://localhost:8080/wood.jpg"));
        assert!(!is_remote("textures/wood.jpg"));
        assert!(!is_remote("httpdocs/wood.jpg"));
    }
}
