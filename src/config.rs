//! Fixed parameters of the living room.
//!
//! Everything the scene reads at startup lives in [`RoomConfig`]. The defaults
//! reproduce the reference scene; callers can tweak single fields with struct
//! update syntax before handing the config to [`crate::flow::run`].

use std::time::Duration;

use cgmath::Point3;

use crate::data_structures::material::Color;

/// Startup configuration for the scene, its camera and the host page.
#[derive(Clone, Debug)]
pub struct RoomConfig {
    /// Id of the canvas element the renderer draws into (browser only).
    pub canvas_id: String,
    /// Id of the element receiving error messages.
    pub error_element_id: String,
    /// Id of the element showing the name of a clicked part.
    pub info_panel_id: String,
    /// Id given to the injected "Reset View" button.
    pub reset_button_id: String,

    pub background_texture_url: String,
    pub wood_texture_url: String,

    /// Colour used when no background texture is available.
    pub clear_colour: wgpu::Color,

    pub fov_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub camera_start: Point3<f32>,
    /// Upper bound for the device pixel ratio used to size the surface.
    pub max_pixel_ratio: f64,

    pub orbit_radius: f32,
    /// Angular speed of the auto orbit in radians per second.
    pub orbit_speed: f32,

    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub screen_space_panning: bool,

    pub reset_position: Point3<f32>,
    pub reset_target: Point3<f32>,

    pub highlight_colour: Color,
    pub highlight_scale: f32,
    pub info_panel_duration: Duration,

    pub tv_palette: Vec<Color>,
    pub tv_interval: Duration,

    pub lamp_bob_amplitude: f32,
    /// Bob frequency in radians per millisecond.
    pub lamp_bob_frequency: f32,

    pub lamp_pulse_base: f32,
    pub lamp_pulse_amplitude: f32,
    /// Pulse frequency in radians per millisecond.
    pub lamp_pulse_frequency: f32,

    pub shadow_map_size: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            canvas_id: "c".to_string(),
            error_element_id: "error-message".to_string(),
            info_panel_id: "info-panel".to_string(),
            reset_button_id: "reset-view".to_string(),
            background_texture_url: "https://threejs.org/examples/textures/gradient.jpg"
                .to_string(),
            wood_texture_url: "https://threejs.org/examples/textures/hardwood2_diffuse.jpg"
                .to_string(),
            clear_colour: wgpu::Color {
                r: 0.08,
                g: 0.08,
                b: 0.1,
                a: 1.0,
            },
            fov_deg: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            camera_start: Point3::new(0.0, 0.0, 5.0),
            max_pixel_ratio: 2.0,
            orbit_radius: 5.0,
            orbit_speed: 0.1,
            damping_factor: 0.05,
            min_distance: 2.0,
            max_distance: 10.0,
            screen_space_panning: false,
            reset_position: Point3::new(0.0, 2.0, 5.0),
            reset_target: Point3::new(0.0, 0.5, 0.0),
            highlight_colour: Color::from_hex(0xff0000),
            highlight_scale: 1.1,
            info_panel_duration: Duration::from_millis(2000),
            tv_palette: [0x1e90ff, 0x00ff99, 0xff69b4, 0xffff00, 0xffffff]
                .into_iter()
                .map(Color::from_hex)
                .collect(),
            tv_interval: Duration::from_millis(1000),
            lamp_bob_amplitude: 0.08,
            lamp_bob_frequency: 0.002,
            lamp_pulse_base: 1.2,
            lamp_pulse_amplitude: 0.5,
            lamp_pulse_frequency: 0.003,
            shadow_map_size: 1024,
        }
    }
}
