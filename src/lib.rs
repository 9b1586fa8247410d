//! living-room
//!
//! An interactive living room built from primitive shapes and rendered with
//! wgpu, natively and in the browser. The camera slowly orbits the room until
//! the user takes over with the mouse; hovering a piece of furniture
//! highlights it and clicking it names it.
//!
//! High-level modules
//! - `config`: startup parameters of the scene, camera and page
//! - `data_structures`: transforms, shapes, materials, the scene graph and textures
//! - `content`: the furniture of the room
//! - `lighting`: the light rig
//! - `camera`: camera, projection and orbit controls
//! - `pick`: ray casting against scene meshes
//! - `interaction`: hover highlight and click info
//! - `animation`: camera orbit and the per-frame room effects
//! - `room`: the scene plus its behaviour, free of GPU state
//! - `page`: the page (or window) hosting the canvas
//! - `context`: window, GPU device and pipelines
//! - `pipelines`: render pipelines and light uniforms
//! - `resources`: GPU buffers of the scene and loaded textures
//! - `render`: batching meshes by pipeline
//! - `flow`: the event loop

pub mod animation;
pub mod camera;
pub mod config;
pub mod content;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod interaction;
pub mod lighting;
pub mod page;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod room;

pub use config::RoomConfig;
pub use flow::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point, runs the room in the canvas of the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    flow::run(RoomConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
