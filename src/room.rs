//! The living room as one unit: scene, materials, lights and the behaviour
//! attached to them.
//!
//! [`Room`] owns no GPU state. The flow feeds it input and the frame clock;
//! it answers with updated transforms, materials and lights that the render
//! side uploads afterwards.

use std::time::Duration;

use instant::Instant;

use crate::{
    animation::{CameraAnimator, LampBob, LightPulse, ScreenCycler},
    camera::{Camera, OrbitControls},
    config::RoomConfig,
    content::{RoomHandles, add_ground, build_living_room},
    data_structures::{
        material::MaterialLibrary,
        scene_graph::{NodeId, SceneGraph},
    },
    interaction::InteractionController,
    lighting::{LightRig, add_lighting},
    page::HostPage,
    pick::Ray,
};

pub struct Room {
    pub scene: SceneGraph,
    pub materials: MaterialLibrary,
    pub handles: RoomHandles,
    pub ground: NodeId,
    pub lights: LightRig,
    pub interaction: InteractionController,
    pub animator: CameraAnimator,
    lamp_bob: LampBob,
    screen: ScreenCycler,
    lamp_pulse: LightPulse,
    start: Instant,
}

impl Room {
    pub fn new(config: &RoomConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    /// Build the room with its clocks starting at `start`.
    pub fn starting_at(config: &RoomConfig, start: Instant) -> Self {
        let mut scene = SceneGraph::new();
        let mut materials = MaterialLibrary::new();
        let handles = build_living_room(&mut scene, &mut materials, config);
        let ground = add_ground(&mut scene, &mut materials);
        let lights = add_lighting(config);
        scene.update_world_transforms();

        let lamp_bob = LampBob::new(handles.lamp_bulb, handles.lamp_base_y, config);
        let screen = ScreenCycler::new(handles.tv_screen_material, config);
        log::info!(
            "Scene initialized: {} nodes, {} materials",
            scene.len(),
            materials.len()
        );
        Self {
            scene,
            materials,
            handles,
            ground,
            lights,
            interaction: InteractionController::new(config),
            animator: CameraAnimator::new(config),
            lamp_bob,
            screen,
            lamp_pulse: LightPulse::new(config),
            start,
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// Index of the colour the TV screen shows.
    pub fn screen_index(&self) -> usize {
        self.screen.index()
    }

    pub fn on_pointer_move(&mut self, ray: &Ray) -> Option<NodeId> {
        self.interaction
            .on_pointer_move(ray, &mut self.scene, &mut self.materials)
    }

    pub fn on_click(&mut self, now: Instant, page: &mut dyn HostPage) {
        self.interaction.on_click(now, &self.scene, page);
    }

    pub fn on_drag_start(&mut self) {
        self.animator.on_drag_start();
    }

    pub fn on_drag_end(&mut self) {
        self.animator.on_drag_end();
    }

    /**
     * Advance everything time driven to `now`.
     *
     * Order per frame: camera orbit and controls, lamp bob, TV colour, lamp
     * light pulse, due info panel hides, and finally the world transforms.
     */
    pub fn on_update(
        &mut self,
        camera: &mut Camera,
        controls: &mut OrbitControls,
        now: Instant,
        page: &mut dyn HostPage,
    ) {
        let elapsed = if now > self.start {
            now - self.start
        } else {
            Duration::ZERO
        };
        self.animator
            .animate(camera, controls, elapsed.as_secs_f32());

        let ms = elapsed.as_secs_f64() * 1000.0;
        self.lamp_bob.apply(&mut self.scene, ms);
        if let Some(colour) = self.screen.apply(&mut self.materials, ms) {
            log::debug!("TV screen switched to #{:06x}", colour.to_hex());
        }
        self.lamp_pulse.apply(Some(&mut self.lights.lamp_spot), ms);
        self.interaction.tick(now, page);

        self.scene.update_world_transforms();
    }

    /// Put the camera back to its reset pose looking at the table.
    pub fn reset_view(&mut self, camera: &mut Camera, controls: &mut OrbitControls, config: &RoomConfig) {
        controls.reset(camera, config.reset_position, config.reset_target);
        log::info!("View reset");
    }
}
