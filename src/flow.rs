//! Application event loop of the living room.
//!
//! [`run`] opens the window (or binds the page's canvas), builds the GPU
//! context and the room, and then drives both from winit events.
//!
//! # Lifecycle Flow
//!
//! 1. `resumed`: create the window and the host page, initialise the context,
//!    the room and its GPU resources (blocking natively, spawned on the web)
//! 2. Window events: cursor moves steer the orbit controls and the hover
//!    highlight, button releases click, the wheel dollies
//! 3. Each redraw: advance the room to the current time, upload camera,
//!    lights and instances, render the shadow map and the frame, present
//! 4. A lost or outdated surface is reconfigured from the window size

use std::{fmt::Debug, iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    camera::DragMode,
    config::RoomConfig,
    context::{Context, MouseButtonState},
    page::{HostPage, report_startup},
    resources::scene::SceneResources,
    room::Room,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Everything that exists once startup succeeded.
pub struct AppState {
    pub(crate) ctx: Context,
    room: Room,
    resources: SceneResources,
    page: Box<dyn HostPage>,
    config: RoomConfig,
    is_surface_configured: bool,
}

impl Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ctx", &self.ctx)
            .field("meshes", &self.resources.mesh_count())
            .field("is_surface_configured", &self.is_surface_configured)
            .finish_non_exhaustive()
    }
}

async fn init_gpu(
    window: Arc<Window>,
    config: &RoomConfig,
    room: &Room,
    page: &mut dyn HostPage,
) -> anyhow::Result<(Context, SceneResources)> {
    let ctx = Context::new(window, config, &room.lights).await?;
    let mut resources = SceneResources::new(
        &ctx.device,
        &ctx.queue,
        &ctx.texture_layout,
        &room.scene,
        &room.materials,
    )?;
    resources
        .load_background(
            &ctx.device,
            &ctx.queue,
            &ctx.texture_layout,
            &config.background_texture_url,
        )
        .await;
    resources
        .load_maps(
            &ctx.device,
            &ctx.queue,
            &ctx.texture_layout,
            &room.materials,
            page,
        )
        .await;
    Ok((ctx, resources))
}

impl AppState {
    /// Build the room and its GPU side. Failures are shown on `page` and
    /// leave the app without state.
    async fn new(window: Arc<Window>, config: RoomConfig, mut page: Box<dyn HostPage>) -> Option<Self> {
        let room = Room::new(&config);
        let initialized = init_gpu(window, &config, &room, page.as_mut()).await;
        let (ctx, resources) = report_startup(initialized, page.as_mut())?;
        log::info!("Living room ready");
        Some(Self {
            ctx,
            room,
            resources,
            page,
            config,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self) {
        if self.ctx.resize() {
            self.is_surface_configured = true;
        }
    }

    fn on_cursor_moved(&mut self) {
        let cursor = self.ctx.mouse.cursor();
        let viewport = self.ctx.viewport();
        let ctx = &mut self.ctx;
        ctx.camera
            .controls
            .drag_to(cursor, viewport[1], &ctx.camera.camera, &ctx.projection);
        if let Some(ray) = self.ctx.cursor_ray() {
            self.room.on_pointer_move(&ray);
        }
    }

    fn on_mouse_input(&mut self, button: MouseButton, pressed: bool) {
        let cursor = self.ctx.mouse.cursor();
        match (button, pressed) {
            (MouseButton::Left, true) => {
                self.ctx.mouse.pressed = MouseButtonState::Left;
                self.ctx.camera.controls.start_drag(DragMode::Rotate, cursor);
                self.room.on_drag_start();
            }
            (MouseButton::Right, true) => {
                self.ctx.mouse.pressed = MouseButtonState::Right;
                self.ctx.camera.controls.start_drag(DragMode::Pan, cursor);
                self.room.on_drag_start();
            }
            (_, false) => {
                self.ctx.mouse.pressed = MouseButtonState::None;
                if self.ctx.camera.controls.end_drag() {
                    self.room.on_drag_end();
                }
                if button == MouseButton::Left {
                    self.room.on_click(Instant::now(), self.page.as_mut());
                }
            }
            _ => (),
        }
    }

    fn reset_view(&mut self) {
        let camera = &mut self.ctx.camera;
        self.room
            .reset_view(&mut camera.camera, &mut camera.controls, &self.config);
    }

    /// Advance the room to `now` and upload what changed.
    fn update(&mut self, now: Instant) {
        let ctx = &mut self.ctx;
        self.room.on_update(
            &mut ctx.camera.camera,
            &mut ctx.camera.controls,
            now,
            self.page.as_mut(),
        );
        ctx.camera.write(&ctx.queue, &ctx.projection);
        ctx.light.write(&ctx.queue, &self.room.lights);
        self.resources
            .write_to_buffers(&ctx.queue, &self.room.scene, &self.room.materials);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let batches = self
            .resources
            .get_render(
                &self.room.scene,
                &self.room.materials,
                self.ctx.camera.camera.position,
            )
            .into_batches();

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.light.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            shadow_pass.set_pipeline(&self.ctx.pipelines.shadow);
            shadow_pass.set_bind_group(0, &self.ctx.light.shadow_bind_group, &[]);
            for caster in batches.shadow_casters() {
                caster.draw(&mut shadow_pass);
            }
        }
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(background) = self.resources.background() {
                render_pass.set_pipeline(&self.ctx.pipelines.background);
                render_pass.set_bind_group(0, background, &[]);
                render_pass.draw(0..3, 0..1);
            }

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.light.bind_group, &[]);
            for instanced in &batches.opaque {
                instanced.draw_textured(&mut render_pass);
            }

            render_pass.set_pipeline(&self.ctx.pipelines.transparent);
            render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.light.bind_group, &[]);
            for instanced in &batches.transparent {
                instanced.draw_textured(&mut render_pass);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: RoomConfig,
    state: Option<AppState>,
    started: bool,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: RoomConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            started: false,
        })
    }
}

pub enum FlowEvent {
    /// Startup finished on the web, carries the state built asynchronously.
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    /// The page's "Reset View" button was clicked.
    #[allow(dead_code)]
    ResetView,
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(state) => f.debug_tuple("Initialized").field(state).finish(),
            Self::ResetView => f.write_str("ResetView"),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Living Room");

        #[cfg(target_arch = "wasm32")]
        let mut page = match crate::page::DomPage::new(&self.config) {
            Ok(page) => page,
            Err(err) => {
                log::error!("{err:#}");
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(&self.config.canvas_id));
            let Some(canvas) = canvas else {
                crate::page::report_startup_error(&crate::page::canvas_missing(), &mut page);
                return;
            };
            window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Could not create a window: {err}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let page = Box::new(crate::page::WindowPage::new(window.clone()));
            let init = AppState::new(window, self.config.clone(), page);
            if let Some(mut state) = self.async_runtime.block_on(init) {
                state.resize();
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            if let Err(err) = page.inject_reset_button(&self.config.reset_button_id, self.proxy.clone()) {
                log::warn!("{err:#}");
            }
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(state) = AppState::new(window, config, Box::new(page)).await {
                    if proxy.send_event(FlowEvent::Initialized(Box::new(state))).is_err() {
                        log::error!("Event loop closed before the room was ready");
                    }
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                let mut state = *state;
                // Trigger a resize and redraw now that we are initialized
                state.resize();
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            FlowEvent::ResetView => {
                if let Some(state) = &mut self.state {
                    state.reset_view();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
            return;
        }
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => state.resize(),
            WindowEvent::CursorMoved { position, .. } => {
                state.ctx.mouse.coords = position;
                state.on_cursor_moved();
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => state.on_mouse_input(button, button_state.is_pressed()),
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                state.ctx.camera.controls.dolly(scroll_y);
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyR) => state.reset_view(),
                    #[cfg(not(target_arch = "wasm32"))]
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    _ => (),
                }
            }
            WindowEvent::RedrawRequested => {
                state.update(Instant::now());
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.resize(),
                    Err(e) => log::error!("Unable to render {e}"),
                }
            }
            _ => {}
        }
    }
}

/// Open the room and block until its window closes.
pub fn run(config: RoomConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {e}");
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| anyhow::anyhow!("could not initialize logger: {e}"))?;
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
