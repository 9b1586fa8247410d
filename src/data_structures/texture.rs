//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU GPU texture resources,
//! and helper methods for creating the depth buffer, the shadow map, solid colour
//! fallbacks and textures decoded from image data.

use anyhow::*;
use image::GenericImageView;

/// A GPU texture with a view and optional sampler.
///
/// Textures are used for colour maps, the background, the depth buffer and
/// the shadow map. Typically created via [`from_bytes`](Self::from_bytes) or
/// via [`create_depth_texture`](Self::create_depth_texture).
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let texture = Self::depth_target(device, size, label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// Create the square depth target the shadow pass renders into.
    ///
    /// The sampler compares against the stored depth, so shaders read it with
    /// `textureSampleCompare*` and get a lit factor in `0.0..=1.0`.
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        let texture = Self::depth_target(device, [size, size], "shadow map");
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        }));
        Self {
            texture,
            view,
            sampler,
        }
    }

    fn depth_target(device: &wgpu::Device, size: [u32; 2], label: &str) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        })
    }

    /// A 1x1 texture of a single sRGB colour.
    ///
    /// Untextured materials bind this so the mesh shader never needs a
    /// separate code path.
    pub fn create_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Texture {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            1,
            1,
            image::Rgba(rgba),
        ));
        Self::upload(device, queue, &img, Some(label))
    }

    /// Load a texture from raw byte data (image file contents).
    ///
    /// # Arguments
    ///
    /// * `bytes` represent raw image file data (PNG, JPEG, etc.), the format is guessed
    /// * `label` is used as a debug name for the GPU resource
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("could not decode image {label}"))?;
        Self::from_image(device, queue, &img, Some(label))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            bail!("image {} has no pixels", label.unwrap_or("<unnamed>"));
        }
        Ok(Self::upload(device, queue, img, label))
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let dimensions = img.dimensions();
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_default_sampler(device));

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Linear filtering with repeat wrapping, used by colour maps that tile.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
