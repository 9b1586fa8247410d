//! Scene graph and hierarchical scene organization.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`] handles. A node is either a group (transform only) or a mesh
//! (transform, shape, material). World transforms are cached and refreshed by
//! [`SceneGraph::update_world_transforms`] once per frame.

use crate::data_structures::{
    instance::Transform,
    material::MaterialId,
    shape::{Aabb, Geometry, Shape},
};

/// Handle to a node of a [`SceneGraph`]. Nodes are never removed, so a handle
/// stays valid for the lifetime of its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Triangles and surface of a mesh node.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub shape: Shape,
    pub geometry: Geometry,
    pub bounds: Aabb,
    pub material: MaterialId,
}

impl Mesh {
    pub fn new(shape: Shape, material: MaterialId) -> Self {
        let geometry = shape.geometry();
        let bounds = geometry.bounds();
        Self {
            shape,
            geometry,
            bounds,
            material,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub local: Transform,
    world: Transform,
    pub mesh: Option<Mesh>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: &str, local: Transform, mesh: Option<Mesh>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            local,
            world: local,
            mesh,
            cast_shadow: false,
            receive_shadow: false,
            parent,
            children: Vec::new(),
        }
    }

    /// World transform as of the last [`SceneGraph::update_world_transforms`].
    pub fn world(&self) -> &Transform {
        &self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.mesh.as_ref().map(|mesh| mesh.material)
    }
}

pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// An empty graph holding only the root group called `Scene`.
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("Scene", Transform::new(), None, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_group(&mut self, parent: NodeId, name: &str, local: Transform) -> NodeId {
        self.insert(parent, SceneNode::new(name, local, None, Some(parent)))
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        shape: Shape,
        material: MaterialId,
        local: Transform,
    ) -> NodeId {
        let mesh = Mesh::new(shape, material);
        self.insert(parent, SceneNode::new(name, local, Some(mesh), Some(parent)))
    }

    fn insert(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        match self.nodes.get_mut(parent.0) {
            Some(parent) => parent.children.push(id),
            None => log::warn!("Parent {parent:?} does not exist, {id:?} stays detached."),
        }
        id
    }

    pub fn set_shadows(&mut self, id: NodeId, cast: bool, receive: bool) {
        if let Some(node) = self.node_mut(id) {
            node.cast_shadow = cast;
            node.receive_shadow = receive;
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], |node| node.children.as_slice())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node (in insertion order) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// All mesh nodes, groups are skipped.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_mesh())
            .map(|(idx, node)| (NodeId(idx), node))
    }

    /**
     * Recompute every cached world transform as `parent.world * local`.
     *
     * Parents are always inserted before their children, so a single pass in
     * arena order sees every parent's fresh world transform first.
     */
    pub fn update_world_transforms(&mut self) {
        for idx in 0..self.nodes.len() {
            let parent_world = self.nodes[idx]
                .parent
                .and_then(|parent| self.nodes.get(parent.0))
                .map(|parent| parent.world);
            let node = &mut self.nodes[idx];
            node.world = match parent_world {
                Some(parent) => parent * node.local,
                None => node.local,
            };
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;
    use crate::data_structures::material::{Material, MaterialLibrary};

    #[test]
    fn world_transforms_follow_parents() {
        let mut materials = MaterialLibrary::new();
        let wood = materials.add(Material::standard(0x8b4513));
        let mut scene = SceneGraph::new();
        let group = scene.add_group(scene.root(), "Group", Transform::at(0.0, -0.5, 2.0));
        let mesh = scene.add_mesh(
            group,
            "Box",
            Shape::cuboid(1.0, 1.0, 1.0),
            wood,
            Transform::at(1.0, 1.0, 0.0),
        );
        scene.update_world_transforms();

        let world = scene.node(mesh).unwrap().world().position;
        assert!((world - Vector3::new(1.0, 0.5, 2.0)).magnitude() < 1e-6);

        scene.node_mut(group).unwrap().local.position.y = 0.5;
        scene.update_world_transforms();
        let world = scene.node(mesh).unwrap().world().position;
        assert!((world.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn meshes_skip_groups_and_names_resolve() {
        let mut materials = MaterialLibrary::new();
        let white = materials.add(Material::default());
        let mut scene = SceneGraph::new();
        let group = scene.add_group(scene.root(), "Room", Transform::new());
        let wall = scene.add_mesh(group, "Wall", Shape::cuboid(10.0, 4.0, 0.1), white, Transform::new());

        let meshes: Vec<_> = scene.meshes().map(|(id, _)| id).collect();
        assert_eq!(meshes, vec![wall]);
        assert_eq!(scene.find_by_name("Wall"), Some(wall));
        assert_eq!(scene.find_by_name("Sofa"), None);
        assert_eq!(scene.children(group), &[wall]);
        assert_eq!(scene.node(wall).unwrap().parent(), Some(group));
    }
}
