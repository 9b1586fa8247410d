//! Perspective camera, its GPU uniform and orbit style mouse controls.
//!
//! - [`Camera`] is a position looking at a point
//! - [`Projection`] holds the perspective parameters and follows the surface size
//! - [`OrbitControls`] turns drags and wheel input into damped orbit, pan and dolly moves
//! - [`CameraResources`] owns the uniform buffer and bind group shared by all pipelines

use std::f32::consts::PI;

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4};
use wgpu::util::DeviceExt;

use crate::{config::RoomConfig, pick::Ray};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Smallest polar angle the orbit may reach, keeps the view off the poles.
const EPS: f32 = 0.000001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            look_at: Point3::origin(),
            up: Vector3::unit_y(),
        }
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.look_at = target;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.look_at, self.up)
    }

    /// Unit vector pointing to the right of the view direction.
    pub fn right(&self) -> Vector3<f32> {
        let forward = self.look_at - self.position;
        let right = forward.cross(self.up);
        if right.magnitude2() > 0.0 {
            right.normalize()
        } else {
            Vector3::unit_x()
        }
    }

    /**
     * Build the ray leaving the camera through a cursor position.
     *
     * `cursor` and `size` are in the same (physical) pixel space; the top
     * left corner is the origin. `None` when the view projection can't be
     * inverted (zero sized surface).
     */
    pub fn cast_ray_from_cursor(
        &self,
        cursor: [f32; 2],
        size: [f32; 2],
        projection: &Projection,
    ) -> Option<Ray> {
        if size[0] <= 0.0 || size[1] <= 0.0 {
            return None;
        }
        let ndc_x = cursor[0] / size[0] * 2.0 - 1.0;
        let ndc_y = -(cursor[1] / size[1]) * 2.0 + 1.0;
        let inverse = (projection.calc_matrix() * self.calc_matrix()).invert()?;
        let far = inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let far = Point3::from_vec(far.truncate() / far.w);
        let direction = far - self.position;
        if direction.magnitude2() == 0.0 {
            return None;
        }
        Some(Ray::new(self.position, direction.normalize()))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// What a mouse drag currently does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Radius and angles of an offset around the orbit target.
///
/// `theta` is measured around +Y starting at +Z, `phi` is the angle from +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_vector(v: Vector3<f32>) -> Self {
        let radius = v.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_vector(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/**
 * Orbit the camera around a target with the mouse.
 *
 * Left drag rotates, right drag pans and the wheel dollies. Input only
 * accumulates deltas; [`OrbitControls::update`] applies them to the camera,
 * clamps the distance and decays them by the damping factor.
 */
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub screen_space_panning: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    spherical_delta: Spherical,
    pan_offset: Vector3<f32>,
    scale: f32,
    drag: Option<(DragMode, [f32; 2])>,
}

impl OrbitControls {
    pub fn new(config: &RoomConfig) -> Self {
        Self {
            target: Point3::origin(),
            damping_factor: config.damping_factor,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            screen_space_panning: config.screen_space_panning,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            spherical_delta: Spherical::default(),
            pan_offset: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            drag: None,
        }
    }

    /// Start a drag at `cursor`, replacing any running one.
    pub fn start_drag(&mut self, mode: DragMode, cursor: [f32; 2]) {
        self.drag = Some((mode, cursor));
    }

    /// End the running drag, `true` if there was one.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed a cursor move. `viewport_height` is in the cursor's pixel space.
    pub fn drag_to(
        &mut self,
        cursor: [f32; 2],
        viewport_height: f32,
        camera: &Camera,
        projection: &Projection,
    ) {
        let Some((mode, last)) = self.drag else {
            return;
        };
        let height = viewport_height.max(1.0);
        let dx = cursor[0] - last[0];
        let dy = cursor[1] - last[1];
        match mode {
            DragMode::Rotate => {
                self.rotate_left(2.0 * PI * dx * self.rotate_speed / height);
                self.rotate_up(2.0 * PI * dy * self.rotate_speed / height);
            }
            DragMode::Pan => {
                let offset = camera.position - self.target;
                let target_distance = offset.magnitude() * (projection.fovy().0 / 2.0).tan();
                let dx = dx * self.pan_speed;
                let dy = dy * self.pan_speed;
                self.pan_left(2.0 * dx * target_distance / height, camera);
                self.pan_up(2.0 * dy * target_distance / height, camera);
            }
        }
        self.drag = Some((mode, cursor));
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    fn pan_left(&mut self, distance: f32, camera: &Camera) {
        self.pan_offset += camera.right() * -distance;
    }

    fn pan_up(&mut self, distance: f32, camera: &Camera) {
        let direction = if self.screen_space_panning {
            camera.right().cross(camera.look_at - camera.position).normalize()
        } else {
            camera.up.cross(camera.right())
        };
        self.pan_offset += direction * distance;
    }

    /// Wheel input, positive `scroll_y` moves towards the target.
    pub fn dolly(&mut self, scroll_y: f32) {
        let zoom_scale = 0.95f32.powf(self.zoom_speed);
        if scroll_y > 0.0 {
            self.scale *= zoom_scale;
        } else if scroll_y < 0.0 {
            self.scale /= zoom_scale;
        }
    }

    /**
     * Apply the accumulated input to `camera` and aim it at the target.
     *
     * Returns whether the camera moved.
     */
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let before = camera.position;
        let mut spherical = Spherical::from_vector(camera.position - self.target);

        spherical.theta += self.spherical_delta.theta * self.damping_factor;
        spherical.phi += self.spherical_delta.phi * self.damping_factor;
        spherical.phi = spherical.phi.clamp(0.0, PI).clamp(EPS, PI - EPS);

        self.target += self.pan_offset * self.damping_factor;

        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target + spherical.to_vector();
        camera.look_at(self.target);

        let decay = 1.0 - self.damping_factor;
        self.spherical_delta.theta *= decay;
        self.spherical_delta.phi *= decay;
        self.pan_offset *= decay;
        self.scale = 1.0;

        (camera.position - before).magnitude2() > EPS
    }

    /// Place the camera and target, dropping pending motion.
    pub fn reset(&mut self, camera: &mut Camera, position: Point3<f32>, target: Point3<f32>) {
        self.spherical_delta = Spherical::default();
        self.pan_offset = Vector3::new(0.0, 0.0, 0.0);
        self.scale = 1.0;
        camera.position = position;
        self.target = target;
        self.update(camera);
    }
}

/// Camera state plus the GPU objects that carry it to the shaders.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: Camera,
        controls: OrbitControls,
        projection: &Projection,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controls,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
