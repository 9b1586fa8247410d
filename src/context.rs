use std::sync::Arc;

use anyhow::Context as _;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    window::Window,
};

use crate::{
    camera::{Camera, CameraResources, OrbitControls, Projection},
    config::RoomConfig,
    data_structures::texture::Texture,
    lighting::LightRig,
    pick::Ray,
    pipelines::{Pipelines, light::LightResources},
    resources::texture::texture_layout,
};

/// Which mouse button is held down, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseButtonState {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MouseState {
    /// Last cursor position in physical window pixels.
    pub coords: PhysicalPosition<f64>,
    pub pressed: MouseButtonState,
}

impl MouseState {
    pub fn cursor(&self) -> [f32; 2] {
        [self.coords.x as f32, self.coords.y as f32]
    }
}

/**
 * Size of the render surface for a window.
 *
 * `inner` is the physical window size, i.e. the logical size times
 * `scale_factor`. The surface uses at most `max_pixel_ratio` physical pixels
 * per logical pixel and never less than one pixel per side.
 */
pub fn surface_size(
    inner: PhysicalSize<u32>,
    scale_factor: f64,
    max_pixel_ratio: f64,
) -> PhysicalSize<u32> {
    let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let ratio = scale_factor.min(max_pixel_ratio) / scale_factor;
    let scaled = |side: u32| ((side as f64 * ratio).round() as u32).max(1);
    PhysicalSize::new(scaled(inner.width), scaled(inner.height))
}

/// The window, the GPU device and everything created from them at startup.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub texture_layout: wgpu::BindGroupLayout,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub mouse: MouseState,
    max_pixel_ratio: f64,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        room_config: &RoomConfig,
        rig: &LightRig,
    ) -> anyhow::Result<Self> {
        let size = surface_size(
            window.inner_size(),
            window.scale_factor(),
            room_config.max_pixel_ratio,
        );

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("could not open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = Camera::new(room_config.camera_start);
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(room_config.fov_deg),
            room_config.znear,
            room_config.zfar,
        );
        let controls = OrbitControls::new(room_config);
        let camera = CameraResources::new(&device, camera, controls, &projection);

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");
        let light = LightResources::new(&device, rig, room_config.shadow_map_size)?;
        let texture_layout = texture_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            &config,
            &texture_layout,
            &camera.bind_group_layout,
            &light,
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            texture_layout,
            pipelines,
            clear_colour: room_config.clear_colour,
            mouse: MouseState::default(),
            max_pixel_ratio: room_config.max_pixel_ratio,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /**
     * Follow the window's current size: surface, depth buffer and aspect ratio.
     *
     * A minimized (zero sized) window leaves everything untouched and returns
     * `false`.
     */
    pub fn resize(&mut self) -> bool {
        let inner = self.window.inner_size();
        if inner.width == 0 || inner.height == 0 {
            return false;
        }
        let size = surface_size(inner, self.window.scale_factor(), self.max_pixel_ratio);
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [size.width, size.height],
            "depth_texture",
        );
        self.projection.resize(size.width, size.height);
        log::debug!("Resized surface to {}x{}", size.width, size.height);
        true
    }

    /// Window size in the pixel space of the cursor coordinates.
    pub fn viewport(&self) -> [f32; 2] {
        let size = self.window.inner_size();
        [size.width as f32, size.height as f32]
    }

    /// The ray under the last known cursor position.
    pub fn cursor_ray(&self) -> Option<Ray> {
        self.camera
            .camera
            .cast_ray_from_cursor(self.mouse.cursor(), self.viewport(), &self.projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let inner = PhysicalSize::new(3000, 1500);
        assert_eq!(surface_size(inner, 3.0, 2.0), PhysicalSize::new(2000, 1000));
        assert_eq!(surface_size(inner, 1.5, 2.0), inner);
    }

    #[test]
    fn surface_never_collapses() {
        let size = surface_size(PhysicalSize::new(0, 0), 1.0, 2.0);
        assert_eq!(size, PhysicalSize::new(1, 1));
    }
}
