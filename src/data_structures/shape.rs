//! Procedural primitives.
//!
//! All shapes are centred on their local origin and use counter-clockwise
//! front faces. Cylinders, cones and spheres follow the usual conventions:
//! the axis is +Y and the angle `theta` is measured from +Z towards +X.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl ModelVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A primitive mesh description, sizes in scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

impl Shape {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Box {
            width,
            height,
            depth,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Shape::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Shape::Cone {
            radius,
            height,
            radial_segments,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Shape::Plane { width, height }
    }

    /// Triangulate the shape.
    pub fn geometry(&self) -> Geometry {
        let mut geometry = Geometry::default();
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => {
                let half = Vector3::new(width, height, depth) / 2.0;
                let faces = [
                    (Vector3::unit_x(), Vector3::unit_y()),
                    (-Vector3::unit_x(), Vector3::unit_y()),
                    (Vector3::unit_y(), -Vector3::unit_z()),
                    (-Vector3::unit_y(), Vector3::unit_z()),
                    (Vector3::unit_z(), Vector3::unit_y()),
                    (-Vector3::unit_z(), Vector3::unit_y()),
                ];
                for (normal, up) in faces {
                    geometry.push_quad(normal, up, half);
                }
            }
            Shape::Plane { width, height } => {
                geometry.push_quad(
                    Vector3::unit_z(),
                    Vector3::unit_y(),
                    Vector3::new(width / 2.0, height / 2.0, 0.0),
                );
            }
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => geometry.push_cylinder(radius_top, radius_bottom, height, radial_segments.max(3)),
            Shape::Cone {
                radius,
                height,
                radial_segments,
            } => geometry.push_cylinder(0.0, radius, height, radial_segments.max(3)),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => geometry.push_sphere(radius, width_segments.max(3), height_segments.max(2)),
        }
        geometry
    }
}

/// Axis aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

/// Indexed triangle list of a shape.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn bounds(&self) -> Aabb {
        let mut min = Vector3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vector3::new(f32::MIN, f32::MIN, f32::MIN);
        for v in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v.position[axis]);
                max[axis] = max[axis].max(v.position[axis]);
            }
        }
        Aabb { min, max }
    }

    /// Iterate the triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [tri[0], tri[1], tri[2]].map(|idx| Vector3::from(self.vertices[idx as usize].position))
        })
    }

    fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn push_vertex(&mut self, position: Vector3<f32>, tex_coords: [f32; 2], normal: Vector3<f32>) {
        self.vertices.push(ModelVertex {
            position: position.into(),
            tex_coords,
            normal: normal.into(),
        });
    }

    /// A rectangle facing `normal`, offset by the half extent along it.
    fn push_quad(&mut self, normal: Vector3<f32>, up: Vector3<f32>, half: Vector3<f32>) {
        let right = up.cross(normal);
        let extent = |axis: Vector3<f32>| {
            (axis.x * half.x).abs() + (axis.y * half.y).abs() + (axis.z * half.z).abs()
        };
        let center = normal * extent(normal);
        let (u, v) = (right * extent(right), up * extent(up));
        let start = self.next_index();
        self.push_vertex(center - u - v, [0.0, 1.0], normal);
        self.push_vertex(center + u - v, [1.0, 1.0], normal);
        self.push_vertex(center + u + v, [1.0, 0.0], normal);
        self.push_vertex(center - u + v, [0.0, 0.0], normal);
        self.indices
            .extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
    }

    fn push_cylinder(&mut self, radius_top: f32, radius_bottom: f32, height: f32, segments: u32) {
        let half = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;
        let start = self.next_index();
        let row = segments + 1;

        for (y, radius, v) in [(half, radius_top, 0.0), (-half, radius_bottom, 1.0)] {
            for x in 0..=segments {
                let u = x as f32 / segments as f32;
                let theta = u * 2.0 * PI;
                let (sin, cos) = theta.sin_cos();
                let position = Vector3::new(radius * sin, y, radius * cos);
                let normal = Vector3::new(sin, slope, cos).normalize();
                self.push_vertex(position, [u, v], normal);
            }
        }
        for x in 0..segments {
            let a = start + x;
            let b = start + row + x;
            let c = start + row + x + 1;
            let d = start + x + 1;
            self.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            self.push_cap(radius_top, half, segments, true);
        }
        if radius_bottom > 0.0 {
            self.push_cap(radius_bottom, -half, segments, false);
        }
    }

    fn push_cap(&mut self, radius: f32, y: f32, segments: u32, top: bool) {
        let normal = if top {
            Vector3::unit_y()
        } else {
            -Vector3::unit_y()
        };
        let center = self.next_index();
        self.push_vertex(Vector3::new(0.0, y, 0.0), [0.5, 0.5], normal);
        let ring = self.next_index();
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            let position = Vector3::new(radius * sin, y, radius * cos);
            self.push_vertex(position, [0.5 + sin * 0.5, 0.5 + cos * 0.5], normal);
        }
        for x in 0..segments {
            let (i, j) = (ring + x, ring + x + 1);
            if top {
                self.indices.extend_from_slice(&[i, j, center]);
            } else {
                self.indices.extend_from_slice(&[j, i, center]);
            }
        }
    }

    fn push_sphere(&mut self, radius: f32, width_segments: u32, height_segments: u32) {
        let start = self.next_index();
        let row = width_segments + 1;
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (phi_sin, phi_cos) = (u * 2.0 * PI).sin_cos();
                let (theta_sin, theta_cos) = (v * PI).sin_cos();
                let normal = Vector3::new(-phi_cos * theta_sin, theta_cos, phi_sin * theta_sin);
                self.push_vertex(normal * radius, [u, v], normal);
            }
        }
        let at = |ix: u32, iy: u32| start + iy * row + ix;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = at(ix + 1, iy);
                let b = at(ix, iy);
                let c = at(ix, iy + 1);
                let d = at(ix + 1, iy + 1);
                if iy != 0 {
                    self.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    self.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every non-degenerate triangle of a convex shape centred on the origin faces away from it.
    fn assert_outward(geometry: &Geometry) {
        for [a, b, c] in geometry.triangles() {
            let face = (b - a).cross(c - a);
            if face.magnitude() < 1e-7 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0, "inward triangle {a:?} {b:?} {c:?}");
        }
    }

    #[test]
    fn box_has_four_vertices_per_face() {
        let geometry = Shape::cuboid(2.0, 0.1, 1.2).geometry();
        assert_eq!(geometry.vertices.len(), 24);
        assert_eq!(geometry.indices.len(), 36);
        let bounds = geometry.bounds();
        assert_eq!(bounds.min, Vector3::new(-1.0, -0.05, -0.6));
        assert_eq!(bounds.max, Vector3::new(1.0, 0.05, 0.6));
        assert_outward(&geometry);
    }

    #[test]
    fn cylinder_and_cone_face_outwards() {
        let leg = Shape::cylinder(0.05, 0.05, 0.5, 8).geometry();
        assert_outward(&leg);
        let bounds = leg.bounds();
        assert!((bounds.max.y - 0.25).abs() < 1e-6);
        assert!((bounds.min.y + 0.25).abs() < 1e-6);

        let vase = Shape::cylinder(0.07, 0.12, 0.18, 18).geometry();
        assert_outward(&vase);

        let shade = Shape::cone(0.25, 0.3, 16).geometry();
        assert_outward(&shade);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let geometry = Shape::sphere(0.15, 16, 16).geometry();
        assert_eq!(geometry.vertices.len(), 17 * 17);
        for v in &geometry.vertices {
            let length = Vector3::from(v.position).magnitude();
            assert!((length - 0.15).abs() < 1e-5);
        }
        assert_outward(&geometry);
    }

    #[test]
    fn plane_faces_positive_z() {
        let geometry = Shape::plane(20.0, 20.0).geometry();
        assert_eq!(geometry.indices.len(), 6);
        let [a, b, c] = geometry.triangles().next().unwrap();
        assert!((b - a).cross(c - a).z > 0.0);
    }
}
