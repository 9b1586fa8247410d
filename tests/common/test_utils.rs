use std::time::Duration;

use cgmath::{InnerSpace, Point3, Vector3};
use instant::Instant;
use living_room::{
    RoomConfig,
    camera::{Camera, OrbitControls},
    data_structures::{material::Color, scene_graph::NodeId},
    page::HostPage,
    pick::Ray,
    room::Room,
};

/// Remembers everything the room asked the page to show.
#[derive(Debug, Default)]
pub(crate) struct RecordingPage {
    pub errors: Vec<String>,
    pub infos: Vec<String>,
    hides: u32,
    info_visible: bool,
}

impl RecordingPage {
    pub fn hides(&self) -> u32 {
        self.hides
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub fn last_info(&self) -> Option<&str> {
        self.infos.last().map(String::as_str)
    }
}

impl HostPage for RecordingPage {
    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_info(&mut self, text: &str) {
        self.infos.push(text.to_string());
        self.info_visible = true;
    }

    fn hide_info(&mut self) {
        self.hides += 1;
        self.info_visible = false;
    }
}

/// A freshly built room plus the camera rig the flow would give it.
pub(crate) struct Fixture {
    pub config: RoomConfig,
    pub room: Room,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub page: RecordingPage,
}

impl Fixture {
    pub fn new() -> Self {
        let config = RoomConfig::default();
        let room = Room::starting_at(&config, Instant::now());
        let camera = Camera::new(config.camera_start);
        let controls = OrbitControls::new(&config);
        Self {
            config,
            room,
            camera,
            controls,
            page: RecordingPage::default(),
        }
    }

    pub fn at_ms(&self, ms: u64) -> Instant {
        self.room.start() + Duration::from_millis(ms)
    }

    /// Run one frame at `ms` milliseconds after startup.
    pub fn frame(&mut self, ms: u64) {
        let now = self.at_ms(ms);
        self.room
            .on_update(&mut self.camera, &mut self.controls, now, &mut self.page);
    }

    pub fn node(&self, name: &str) -> NodeId {
        self.room
            .scene
            .find_by_name(name)
            .unwrap_or_else(|| panic!("no node named {name}"))
    }

    pub fn colour_of(&self, name: &str) -> Color {
        let id = self.node(name);
        let material = self.room.scene.node(id).and_then(|n| n.material()).unwrap();
        self.room.materials.get(material).unwrap().color
    }
}

/// Straight at the TV screen from the middle of the room.
pub(crate) fn ray_at_tv() -> Ray {
    Ray::new(Point3::new(0.0, 1.45, 0.0), -Vector3::unit_z())
}

/// Down onto the table top, clear of the flower.
pub(crate) fn ray_at_table() -> Ray {
    Ray::new(Point3::new(0.5, 3.0, 0.9), -Vector3::unit_y())
}

/// Up into the empty space above the room.
pub(crate) fn ray_at_nothing() -> Ray {
    Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::unit_y())
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn assert_close_point(actual: Point3<f32>, expected: Point3<f32>) {
    assert!(
        (actual - expected).magnitude() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}
