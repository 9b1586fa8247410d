//! Time driven motion: the auto orbiting camera and the small per-frame
//! effects of the room (bobbing lamp bulb, colour cycling TV, pulsing lamp light).
//!
//! The camera animator runs on the elapsed seconds of the frame clock. The
//! room effects run on wall clock milliseconds since startup.

use cgmath::Point3;

use crate::{
    camera::{Camera, OrbitControls},
    config::RoomConfig,
    data_structures::{
        material::{Color, MaterialId, MaterialLibrary},
        scene_graph::{NodeId, SceneGraph},
    },
    lighting::SpotLight,
};

/// Circles the camera around the origin until the user grabs the controls.
#[derive(Clone, Debug)]
pub struct CameraAnimator {
    pub auto_rotate: bool,
    user_interacting: bool,
    radius: f32,
    speed: f32,
}

impl CameraAnimator {
    pub fn new(config: &RoomConfig) -> Self {
        Self {
            auto_rotate: true,
            user_interacting: false,
            radius: config.orbit_radius,
            speed: config.orbit_speed,
        }
    }

    pub fn on_drag_start(&mut self) {
        self.user_interacting = true;
    }

    pub fn on_drag_end(&mut self) {
        self.user_interacting = false;
    }

    pub fn is_user_interacting(&self) -> bool {
        self.user_interacting
    }

    /// Orbit position after `elapsed` seconds at height `y`.
    pub fn orbit_position(&self, elapsed: f32, y: f32) -> Point3<f32> {
        let angle = elapsed * self.speed;
        Point3::new(angle.sin() * self.radius, y, angle.cos() * self.radius)
    }

    /// Move the camera along the orbit unless the user is dragging, then let
    /// the controls apply their damped motion.
    pub fn animate(&self, camera: &mut Camera, controls: &mut OrbitControls, elapsed: f32) {
        if self.auto_rotate && !self.user_interacting {
            camera.position = self.orbit_position(elapsed, camera.position.y);
            camera.look_at(Point3::new(0.0, 0.0, 0.0));
        }
        controls.update(camera);
    }
}

/// Floats a node up and down around its resting height.
#[derive(Clone, Debug)]
pub struct LampBob {
    node: Option<NodeId>,
    base_y: f32,
    amplitude: f32,
    frequency: f32,
}

impl LampBob {
    pub fn new(node: Option<NodeId>, base_y: f32, config: &RoomConfig) -> Self {
        Self {
            node,
            base_y,
            amplitude: config.lamp_bob_amplitude,
            frequency: config.lamp_bob_frequency,
        }
    }

    pub fn height_at(&self, ms: f64) -> f32 {
        self.base_y + (ms * self.frequency as f64).sin() as f32 * self.amplitude
    }

    pub fn apply(&self, scene: &mut SceneGraph, ms: f64) {
        let Some(node) = self.node.and_then(|id| scene.node_mut(id)) else {
            return;
        };
        node.local.position.y = self.height_at(ms);
    }
}

/// Steps a material through a colour palette at a fixed interval.
///
/// The clock starts with the room, so the first switch comes one full
/// interval after startup rather than on the first frame of a page whose
/// clock started earlier.
#[derive(Clone, Debug)]
pub struct ScreenCycler {
    material: Option<MaterialId>,
    palette: Vec<Color>,
    interval_ms: f64,
    index: usize,
    last_change_ms: f64,
}

impl ScreenCycler {
    pub fn new(material: Option<MaterialId>, config: &RoomConfig) -> Self {
        Self {
            material,
            palette: config.tv_palette.clone(),
            interval_ms: config.tv_interval.as_secs_f64() * 1000.0,
            index: 0,
            last_change_ms: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance once the interval has strictly passed. Returns the new colour.
    pub fn apply(&mut self, materials: &mut MaterialLibrary, ms: f64) -> Option<Color> {
        let material = self.material.and_then(|id| materials.get_mut(id))?;
        if self.palette.is_empty() || ms - self.last_change_ms <= self.interval_ms {
            return None;
        }
        self.index = (self.index + 1) % self.palette.len();
        let colour = self.palette[self.index];
        material.color = colour;
        material.emissive = colour;
        self.last_change_ms = ms;
        Some(colour)
    }
}

/// Oscillates the intensity of a spot light.
#[derive(Clone, Debug)]
pub struct LightPulse {
    base: f32,
    amplitude: f32,
    frequency: f32,
}

impl LightPulse {
    pub fn new(config: &RoomConfig) -> Self {
        Self {
            base: config.lamp_pulse_base,
            amplitude: config.lamp_pulse_amplitude,
            frequency: config.lamp_pulse_frequency,
        }
    }

    pub fn intensity_at(&self, ms: f64) -> f32 {
        self.base + (ms * self.frequency as f64).sin() as f32 * self.amplitude
    }

    pub fn apply(&self, light: Option<&mut SpotLight>, ms: f64) {
        if let Some(light) = light {
            light.intensity = self.intensity_at(ms);
        }
    }
}
