use std::collections::{BTreeSet, HashMap};

use cgmath::{MetricSpace, Point3};

use crate::{
    data_structures::{material::MaterialLibrary, scene_graph::SceneGraph, texture::Texture},
    page::{HostPage, TEXTURE_ERROR_TEXT},
    render::{Instanced, Render},
    resources::{
        mesh::GpuMesh,
        texture::{load_texture, texture_bind_group},
    },
};

/**
 * Keep a loaded colour map or report why it is missing.
 *
 * On failure the error text goes to `page` and `None` comes back; materials
 * using the map then render untextured with their own colour.
 */
pub fn report_map<T>(source: &str, loaded: anyhow::Result<T>, page: &mut dyn HostPage) -> Option<T> {
    match loaded {
        Ok(map) => {
            log::info!("Loaded texture {source}");
            Some(map)
        }
        Err(err) => {
            log::error!("Texture failed to load: {err:#}");
            page.show_error(TEXTURE_ERROR_TEXT);
            None
        }
    }
}

/**
 * GPU copy of the room.
 *
 * Buffers are created once for every mesh node; afterwards only the instance
 * buffers change, rewritten each frame from the world transforms and the
 * (possibly animated or highlighted) materials.
 */
pub struct SceneResources {
    meshes: Vec<GpuMesh>,
    /// Colour maps by source, only those that loaded.
    maps: HashMap<String, wgpu::BindGroup>,
    /// 1x1 white map bound for untextured materials.
    plain: wgpu::BindGroup,
    background: Option<wgpu::BindGroup>,
}

impl SceneResources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_layout: &wgpu::BindGroupLayout,
        scene: &SceneGraph,
        materials: &MaterialLibrary,
    ) -> anyhow::Result<Self> {
        let white = Texture::create_solid(device, queue, [255, 255, 255, 255], "plain white");
        let plain = texture_bind_group(device, texture_layout, &white, "plain_bind_group")?;

        let meshes: Vec<GpuMesh> = scene
            .meshes()
            .filter_map(|(id, node)| {
                let mesh = node.mesh.as_ref()?;
                let material = materials.get(mesh.material)?;
                let instance = node.world().to_raw(material, node.receive_shadow);
                Some(GpuMesh::new(device, id, &node.name, mesh, instance))
            })
            .collect();
        log::info!("Uploaded {} meshes", meshes.len());

        Ok(Self {
            meshes,
            maps: HashMap::new(),
            plain,
            background: None,
        })
    }

    /**
     * Fetch every colour map referenced by `materials`, all at once.
     *
     * A map that fails leaves its materials untextured, the failure is logged
     * and reported on the page. Rendering goes on either way.
     */
    pub async fn load_maps(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_layout: &wgpu::BindGroupLayout,
        materials: &MaterialLibrary,
        page: &mut dyn HostPage,
    ) {
        let sources: BTreeSet<&str> = materials
            .iter()
            .filter_map(|(_, material)| material.map.as_ref())
            .map(|map| map.source.as_str())
            .collect();
        let loads = sources
            .iter()
            .map(|source| load_texture(source, device, queue));
        let textures = futures::future::join_all(loads).await;
        for (source, texture) in sources.into_iter().zip(textures) {
            let loaded = texture
                .and_then(|texture| texture_bind_group(device, texture_layout, &texture, source));
            if let Some(group) = report_map(source, loaded, page) {
                self.maps.insert(source.to_string(), group);
            }
        }
    }

    /// Load the background image. Without it the frame keeps the clear colour.
    pub async fn load_background(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_layout: &wgpu::BindGroupLayout,
        source: &str,
    ) {
        let loaded = load_texture(source, device, queue)
            .await
            .and_then(|texture| texture_bind_group(device, texture_layout, &texture, "background"));
        match loaded {
            Ok(group) => self.background = Some(group),
            Err(err) => log::warn!("Background texture unavailable, using the clear colour: {err:#}"),
        }
    }

    pub fn background(&self) -> Option<&wgpu::BindGroup> {
        self.background.as_ref()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Copy world transforms and materials into the instance buffers.
    pub fn write_to_buffers(
        &self,
        queue: &wgpu::Queue,
        scene: &SceneGraph,
        materials: &MaterialLibrary,
    ) {
        for mesh in &self.meshes {
            let (Some(node), Some(material)) = (scene.node(mesh.node), materials.get(mesh.material))
            else {
                continue;
            };
            mesh.write(queue, node.world().to_raw(material, node.receive_shadow));
        }
    }

    /// Opaque meshes in scene order, transparent ones back to front as seen from `eye`.
    pub fn get_render(
        &self,
        scene: &SceneGraph,
        materials: &MaterialLibrary,
        eye: Point3<f32>,
    ) -> Render<'_> {
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        for mesh in &self.meshes {
            let (Some(node), Some(material)) = (scene.node(mesh.node), materials.get(mesh.material))
            else {
                continue;
            };
            let group = material
                .map
                .as_ref()
                .and_then(|map| self.maps.get(&map.source))
                .unwrap_or(&self.plain);
            let instanced = Instanced {
                vertex: &mesh.vertex_buffer,
                index: &mesh.index_buffer,
                instance: &mesh.instance_buffer,
                group,
                amount: mesh.num_elements,
                cast_shadow: node.cast_shadow,
            };
            if material.transparent {
                let position = node.world().position;
                let distance = eye.distance2(Point3::new(position.x, position.y, position.z));
                transparent.push((distance, instanced));
            } else {
                opaque.push(instanced);
            }
        }
        transparent.sort_by(|a, b| b.0.total_cmp(&a.0));
        Render::Composed(vec![
            Render::Defaults(opaque),
            Render::Transparents(transparent.into_iter().map(|(_, instanced)| instanced).collect()),
        ])
    }
}
