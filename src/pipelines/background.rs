use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{RasterOptions, mk_render_pipeline},
};

/**
 * Fullscreen background image.
 *
 * Draws one oversized triangle generated in the vertex shader at the far end
 * of the depth range. It runs first in the main pass and neither writes depth
 * nor hides anything drawn after it.
 */
pub fn mk_background_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Background Pipeline Layout"),
        bind_group_layouts: &[texture_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Background Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        None,
        Some(Texture::DEPTH_FORMAT),
        RasterOptions {
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            cull_mode: None,
        },
        &[],
        shader,
    )
}
