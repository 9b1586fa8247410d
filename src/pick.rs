//! Ray picking of scene meshes.
//!
//! The cursor ray is tested against every mesh node on the CPU. Each mesh is
//! checked in its own local space: a slab test against the bounding box of its
//! geometry rejects most meshes early, the remaining ones are tested triangle
//! by triangle (Möller–Trumbore). Back faces never count as hits.

use std::cmp::Ordering;

use cgmath::{InnerSpace, Matrix4, Point3, Transform as _, Vector3};

use crate::data_structures::{
    scene_graph::{NodeId, SceneGraph},
    shape::Aabb,
};

const EPSILON: f32 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Move the ray into another space. The direction is not renormalized, so
    /// distances along the transformed ray match distances along this one.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Ray {
        Ray {
            origin: matrix.transform_point(self.origin),
            direction: matrix.transform_vector(self.direction),
        }
    }
}

/// A mesh the ray passed through and the distance to it along the ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Entry distance of `ray` into `aabb`, or the exit distance when the ray
/// starts inside. `None` on a miss or if the box lies behind the origin.
pub fn intersect_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        if direction.abs() < EPSILON {
            if origin < aabb.min[axis] || origin > aabb.max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / direction;
        let t0 = (aabb.min[axis] - origin) * inv;
        let t1 = (aabb.max[axis] - origin) * inv;
        t_near = t_near.max(t0.min(t1));
        t_far = t_far.min(t0.max(t1));
    }
    if t_near > t_far || t_far < 0.0 {
        return None;
    }
    Some(if t_near < 0.0 { t_far } else { t_near })
}

/**
 * Möller–Trumbore ray/triangle test.
 *
 * Only the front side (counter-clockwise winding as seen from the ray origin)
 * is hit. Returns the distance along the ray in units of its direction.
 */
pub fn intersect_triangle(ray: &Ray, [v0, v1, v2]: [Vector3<f32>; 3]) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    // parallel or seen from behind
    if det < EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin - Point3::new(v0.x, v0.y, v0.z);
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > 0.0).then_some(t)
}

impl SceneGraph {
    /// All meshes hit by `ray`, nearest first. Groups are never hit.
    pub fn raycast(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .meshes()
            .filter_map(|(id, node)| {
                let mesh = node.mesh.as_ref()?;
                let inverse = node.world().inverse_matrix()?;
                let local = ray.transformed(&inverse);
                intersect_aabb(&local, &mesh.bounds)?;
                let distance = mesh
                    .geometry
                    .triangles()
                    .filter_map(|triangle| intersect_triangle(&local, triangle))
                    .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))?;
                Some(Hit {
                    node: id,
                    distance,
                    point: ray.at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    /// Nearest mesh hit by `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<Hit> {
        self.raycast(ray).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb {
            min: Vector3::new(-1.0, -1.0, -1.0),
            max: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn aabb_hit_miss_and_inside() {
        let hit = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vector3::unit_z());
        assert_eq!(intersect_aabb(&hit, &unit_box()), Some(4.0));

        let miss = Ray::new(Point3::new(3.0, 0.0, 5.0), -Vector3::unit_z());
        assert_eq!(intersect_aabb(&miss, &unit_box()), None);

        let inside = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x());
        assert_eq!(intersect_aabb(&inside, &unit_box()), Some(1.0));

        let behind = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::unit_z());
        assert_eq!(intersect_aabb(&behind, &unit_box()), None);
    }

    #[test]
    fn triangle_front_side_only() {
        let triangle = [
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let front = Ray::new(Point3::new(0.0, 0.0, 2.0), -Vector3::unit_z());
        let t = intersect_triangle(&front, triangle).unwrap();
        assert!((t - 2.0).abs() < 1e-6);

        let back = Ray::new(Point3::new(0.0, 0.0, -2.0), Vector3::unit_z());
        assert_eq!(intersect_triangle(&back, triangle), None);

        let beside = Ray::new(Point3::new(2.0, 0.0, 2.0), -Vector3::unit_z());
        assert_eq!(intersect_triangle(&beside, triangle), None);
    }

    #[test]
    fn scaled_ray_keeps_world_distance() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 4.0), -Vector3::unit_z());
        let shrink = Matrix4::from_scale(0.5);
        let local = ray.transformed(&shrink);
        let aabb = Aabb {
            min: Vector3::new(-0.5, -0.5, -0.5),
            max: Vector3::new(0.5, 0.5, 0.5),
        };
        // the box is 2 units deep in world space, entered at z = 1
        let t = intersect_aabb(&local, &aabb).unwrap();
        assert!((t - 3.0).abs() < 1e-6);
    }
}
