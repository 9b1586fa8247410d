//! The lighting rig of the room.
//!
//! [`add_lighting`] returns every light as a field of [`LightRig`], so frame
//! effects can reach a light directly instead of searching for it.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::{camera::OPENGL_TO_WGPU_MATRIX, config::RoomConfig, data_structures::material::Color};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Orthographic shadow camera of a directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// Half width and height of the orthographic frustum.
    pub extent: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub shadow: Option<ShadowSettings>,
}

impl DirectionalLight {
    fn new(hex: u32, intensity: f32, position: Point3<f32>) -> Self {
        Self {
            color: Color::from_hex(hex),
            intensity,
            position,
            target: Point3::new(0.0, 0.0, 0.0),
            shadow: None,
        }
    }

    /// Direction the light travels in.
    pub fn direction(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// View projection of the shadow camera, `None` without shadows.
    pub fn shadow_view_proj(&self) -> Option<Matrix4<f32>> {
        let shadow = self.shadow?;
        let view = Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y());
        let e = shadow.extent;
        let proj = cgmath::ortho(-e, e, -e, e, shadow.near, shadow.far);
        Some(OPENGL_TO_WGPU_MATRIX * proj * view)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Range after which the light has no effect, `0.0` for unlimited.
    pub distance: f32,
    /// Half angle of the outer cone.
    pub angle: Rad<f32>,
    /// Fraction of the cone that fades out towards the edge.
    pub penumbra: f32,
    pub decay: f32,
    pub cast_shadow: bool,
}

impl SpotLight {
    pub fn direction(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Cosines of the outer and inner cone angles.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.0;
        let inner = outer * (1.0 - self.penumbra);
        (outer.cos(), inner.cos())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    /// Main light, the only one rendering a shadow map.
    pub key: DirectionalLight,
    pub accent: SpotLight,
    pub rim: DirectionalLight,
    pub lamp_spot: SpotLight,
}

impl LightRig {
    pub fn directionals(&self) -> [&DirectionalLight; 2] {
        [&self.key, &self.rim]
    }

    pub fn spots(&self) -> [&SpotLight; 2] {
        [&self.accent, &self.lamp_spot]
    }
}

/// Build the warm ambient, key, accent, rim and lamp lights.
pub fn add_lighting(config: &RoomConfig) -> LightRig {
    let ambient = AmbientLight {
        color: Color::from_hex(0xffd1b3),
        intensity: 0.4,
    };

    let mut key = DirectionalLight::new(0xffffff, 0.7, Point3::new(5.0, 10.0, 7.5));
    key.shadow = Some(ShadowSettings {
        map_size: config.shadow_map_size,
        near: 0.5,
        far: 50.0,
        extent: 5.0,
    });

    let accent = SpotLight {
        color: Color::from_hex(0xff7f50),
        intensity: 0.5,
        position: Point3::new(-5.0, 8.0, 0.0),
        target: Point3::new(0.0, 0.0, 0.0),
        distance: 20.0,
        angle: Rad(std::f32::consts::PI / 6.0),
        penumbra: 0.3,
        decay: 1.5,
        cast_shadow: true,
    };

    let rim = DirectionalLight::new(0x4169e1, 0.3, Point3::new(-5.0, 2.0, -5.0));

    let lamp_spot = SpotLight {
        color: Color::from_hex(0xffffcc),
        intensity: config.lamp_pulse_base,
        position: Point3::new(0.0, 2.2, -2.5),
        target: Point3::new(0.0, 0.0, 0.0),
        distance: 10.0,
        angle: Rad(std::f32::consts::PI / 7.0),
        penumbra: 0.4,
        decay: 1.5,
        cast_shadow: true,
    };

    log::info!("Lighting added");
    LightRig {
        ambient,
        key,
        accent,
        rim,
        lamp_spot,
    }
}
