use crate::{
    data_structures::{instance::InstanceRaw, shape::ModelVertex, texture::Texture},
    pipelines::basic::{RasterOptions, mesh_shader, mk_mesh_pipeline_layout, mk_render_pipeline},
};

/**
 * Pipeline for meshes whose material is transparent.
 *
 * Same shader and bindings as the basic pipeline, blended over what is
 * already drawn. Depth is tested but not written, so the caller draws these
 * after all opaque meshes and back to front.
 */
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_mesh_pipeline_layout(
        device,
        texture_bind_group_layout,
        camera_bind_group_layout,
        light_bind_group_layout,
    );
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        RasterOptions {
            depth_write: false,
            ..Default::default()
        },
        &[ModelVertex::desc(), InstanceRaw::desc()],
        mesh_shader(),
    )
}
