//! Node transforms and the per-instance data uploaded to the GPU.
//!
//! Every mesh in the room is drawn as a single instance whose buffer carries
//! both the world matrix and the current material parameters. Materials are
//! mutated in place by hovering and animation, so packing them per instance
//! keeps one pipeline for all meshes.

use std::ops::Mul;

use cgmath::{One, SquareMatrix};

use crate::data_structures::material::Material;

/// Position, rotation (as quaternion) and scale of a node.
///
/// Composition with `*` applies the right-hand side inside the space of the
/// left-hand side, i.e. `parent * local` yields the child's world transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: cgmath::Vector3::new(x, y, z),
            ..Self::new()
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse of [`Transform::to_matrix`], `None` for degenerate (zero) scales.
    pub fn inverse_matrix(&self) -> Option<cgmath::Matrix4<f32>> {
        self.to_matrix().invert()
    }

    /// Normal matrix (inverse transpose of the upper 3x3), `R * S^-1` for our TRS layout.
    fn normal_matrix(&self) -> cgmath::Matrix3<f32> {
        let inv = |s: f32| if s.abs() > f32::EPSILON { 1.0 / s } else { 0.0 };
        cgmath::Matrix3::from(self.rotation)
            * cgmath::Matrix3::from_diagonal(cgmath::Vector3::new(
                inv(self.scale.x),
                inv(self.scale.y),
                inv(self.scale.z),
            ))
    }

    pub fn to_raw(&self, material: &Material, receive_shadow: bool) -> InstanceRaw {
        let colour = material.color.to_linear();
        let emissive = material.emissive.to_linear();
        let intensity = material.emissive_intensity;
        let repeat = material.map.as_ref().map_or([1.0, 1.0], |map| map.repeat);
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: self.normal_matrix().into(),
            colour: [colour[0], colour[1], colour[2], material.opacity],
            emissive: [
                emissive[0] * intensity,
                emissive[1] * intensity,
                emissive[2] * intensity,
                if receive_shadow { 1.0 } else { 0.0 },
            ],
            surface: [material.roughness, material.metalness, repeat[0], repeat[1]],
        }
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        let scaled_rhs_pos = cgmath::Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        Transform {
            position: self.position + (self.rotation * scaled_rhs_pos),
            rotation: self.rotation * rhs.rotation,
            scale: cgmath::Vector3::new(
                self.scale.x * rhs.scale.x,
                self.scale.y * rhs.scale.y,
                self.scale.z * rhs.scale.z,
            ),
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        &self * &rhs
    }
}

impl From<cgmath::Vector3<f32>> for Transform {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance is the actual data stored on the GPU: world matrix, normal
 * matrix and the material parameters of the mesh.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    /// Linear rgb plus opacity.
    colour: [f32; 4],
    /// Linear emissive rgb premultiplied by its intensity, `w` flags shadow receiving.
    emissive: [f32; 4],
    /// Roughness, metalness and the uv repeat of the colour map.
    surface: [f32; 4],
}

impl InstanceRaw {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ATTRIBUTES: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
            // model matrix, one vec4 per column
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            // normal matrix, one vec3 per column
            9 => Float32x3,
            10 => Float32x3,
            11 => Float32x3,
            12 => Float32x4,
            13 => Float32x4,
            14 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Only advance once per instance, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Rotation3, Vector3};

    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn parent_rotation_moves_child_offset() {
        let parent = Transform {
            position: Vector3::new(0.0, -0.5, 2.2),
            rotation: cgmath::Quaternion::from_angle_y(cgmath::Rad(std::f32::consts::PI)),
            ..Transform::new()
        };
        let child = Transform::at(1.21, 0.72, 0.0);
        let world = &parent * &child;
        assert!(close(world.position, Vector3::new(-1.21, 0.22, 2.2)));
    }

    #[test]
    fn matrix_matches_composed_position() {
        let parent = Transform {
            scale: Vector3::new(2.0, 2.0, 2.0),
            ..Transform::at(1.0, 0.0, 0.0)
        };
        let world = parent * Transform::at(0.0, 1.0, 0.0);
        let m = world.to_matrix();
        assert!(close(m.w.truncate(), Vector3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn inverse_undoes_matrix() {
        let t = Transform {
            scale: Vector3::new(1.0, 0.5, 1.2),
            rotation: cgmath::Quaternion::from_angle_z(cgmath::Rad(0.12)),
            ..Transform::at(-1.05, 0.75, 0.25)
        };
        let diff = t.to_matrix() * t.inverse_matrix().unwrap() - cgmath::Matrix4::identity();
        for column in [diff.x, diff.y, diff.z, diff.w] {
            assert!(column.magnitude() < 1e-5);
        }
    }
}
