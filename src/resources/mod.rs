//! GPU side of the scene and everything loaded from outside the binary.
//!
//! - `texture`: fetching images (URL or local asset) and their bind groups
//! - `mesh`: vertex, index and instance buffers of one mesh node
//! - `scene`: all GPU buffers of the room, kept in sync with the scene graph

pub mod mesh;
pub mod scene;
pub mod texture;
