//! Render pipelines and the uniforms they share.
//!
//! - `basic`: opaque meshes, plus the generic pipeline builder
//! - `transparent`: alpha blended meshes drawn after the opaque ones
//! - `shadow`: depth only pass filling the key light's shadow map
//! - `background`: fullscreen background texture
//! - `light`: light rig uniform and shadow map bindings

pub mod background;
pub mod basic;
pub mod light;
pub mod shadow;
pub mod transparent;

/// Every pipeline the renderer needs, built once at startup.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
    pub background: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light: &light::LightResources,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                texture_bind_group_layout,
                camera_bind_group_layout,
                &light.bind_group_layout,
            ),
            transparent: transparent::mk_transparent_pipeline(
                device,
                config,
                texture_bind_group_layout,
                camera_bind_group_layout,
                &light.bind_group_layout,
            ),
            shadow: shadow::mk_shadow_pipeline(device, &light.shadow_bind_group_layout),
            background: background::mk_background_pipeline(
                device,
                config,
                texture_bind_group_layout,
            ),
        }
    }
}
