//! Hover highlighting and click info for scene meshes.
//!
//! The nearest mesh under the cursor turns red and grows to 110%. Moving off
//! restores the colour and scale it had the first time it was hovered; later
//! hovers never overwrite that record. Clicking a highlighted mesh shows its
//! name in the page's info panel for a short while.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use cgmath::Vector3;
use instant::Instant;

use crate::{
    config::RoomConfig,
    data_structures::{
        material::{Color, MaterialLibrary},
        scene_graph::{NodeId, SceneGraph},
    },
    page::HostPage,
    pick::Ray,
};

/// Pending hides of the info panel. Each click schedules its own hide.
#[derive(Debug)]
pub struct InfoPanel {
    duration: Duration,
    hides: VecDeque<Instant>,
    visible: bool,
}

impl InfoPanel {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            hides: VecDeque::new(),
            visible: false,
        }
    }

    pub fn show(&mut self, text: &str, now: Instant, page: &mut dyn HostPage) {
        page.show_info(text);
        self.visible = true;
        self.hides.push_back(now + self.duration);
    }

    /// Run every hide that is due by `now`.
    pub fn tick(&mut self, now: Instant, page: &mut dyn HostPage) {
        while self.hides.front().is_some_and(|due| *due <= now) {
            self.hides.pop_front();
            page.hide_info();
            self.visible = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pending_hides(&self) -> usize {
        self.hides.len()
    }
}

#[derive(Debug)]
pub struct InteractionController {
    hovered: Option<NodeId>,
    original_colors: HashMap<NodeId, Color>,
    original_scales: HashMap<NodeId, Vector3<f32>>,
    highlight_colour: Color,
    highlight_scale: f32,
    info: InfoPanel,
}

impl InteractionController {
    pub fn new(config: &RoomConfig) -> Self {
        Self {
            hovered: None,
            original_colors: HashMap::new(),
            original_scales: HashMap::new(),
            highlight_colour: config.highlight_colour,
            highlight_scale: config.highlight_scale,
            info: InfoPanel::new(config.info_panel_duration),
        }
    }

    /**
     * Update the highlight for a cursor ray.
     *
     * The previously highlighted mesh is restored first; then the nearest hit,
     * if any, becomes the highlighted mesh. Returns the highlighted node.
     */
    pub fn on_pointer_move(
        &mut self,
        ray: &Ray,
        scene: &mut SceneGraph,
        materials: &mut MaterialLibrary,
    ) -> Option<NodeId> {
        let nearest = scene.pick(ray).map(|hit| hit.node);

        if let Some(previous) = self.hovered.take() {
            self.restore(previous, scene, materials);
        }

        if let Some(id) = nearest {
            self.highlight(id, scene, materials);
        }
        self.hovered
    }

    fn restore(&self, id: NodeId, scene: &mut SceneGraph, materials: &mut MaterialLibrary) {
        let Some(node) = scene.node_mut(id) else {
            return;
        };
        if let (Some(material), Some(colour)) = (
            node.material().and_then(|m| materials.get_mut(m)),
            self.original_colors.get(&id),
        ) {
            material.color = *colour;
        }
        if let Some(scale) = self.original_scales.get(&id) {
            node.local.scale = *scale;
        }
    }

    fn highlight(&mut self, id: NodeId, scene: &mut SceneGraph, materials: &mut MaterialLibrary) {
        let Some(node) = scene.node_mut(id) else {
            return;
        };
        let Some(material) = node.material().and_then(|m| materials.get_mut(m)) else {
            return;
        };
        self.hovered = Some(id);
        self.original_colors.entry(id).or_insert(material.color);
        self.original_scales.entry(id).or_insert(node.local.scale);
        material.color = self.highlight_colour;
        let s = self.highlight_scale;
        node.local.scale = Vector3::new(s, s, s);
    }

    /// Show the name of the highlighted mesh, if any.
    pub fn on_click(&mut self, now: Instant, scene: &SceneGraph, page: &mut dyn HostPage) {
        let Some(node) = self.hovered.and_then(|id| scene.node(id)) else {
            return;
        };
        let text = format!("Part: {}", node.name);
        log::info!("{text}");
        self.info.show(&text, now, page);
    }

    pub fn tick(&mut self, now: Instant, page: &mut dyn HostPage) {
        self.info.tick(now, page);
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn original_colour(&self, id: NodeId) -> Option<Color> {
        self.original_colors.get(&id).copied()
    }

    pub fn original_scale(&self, id: NodeId) -> Option<Vector3<f32>> {
        self.original_scales.get(&id).copied()
    }

    pub fn info_panel(&self) -> &InfoPanel {
        &self.info
    }
}
