//! Scene data: transforms, primitive shapes, materials, the scene graph and GPU textures.
//!
//! - `instance` holds the per-node transform and its packed GPU form
//! - `shape` describes the primitive meshes and generates their triangles
//! - `material` holds colours and the shared, mutable material library
//! - `scene_graph` is the hierarchical node arena the room is built in
//! - `texture` wraps GPU textures (depth, shadow map, images)

pub mod instance;
pub mod material;
pub mod scene_graph;
pub mod shape;
pub mod texture;
