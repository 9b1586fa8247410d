use wgpu::util::DeviceExt;

use crate::data_structures::{
    instance::InstanceRaw,
    material::MaterialId,
    scene_graph::{Mesh, NodeId},
};

/// Buffers of one mesh node. Every node is its own single instance.
#[derive(Debug)]
pub struct GpuMesh {
    pub node: NodeId,
    pub material: MaterialId,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub instance_buffer: wgpu::Buffer,
}

impl GpuMesh {
    pub fn new(
        device: &wgpu::Device,
        node: NodeId,
        name: &str,
        mesh: &Mesh,
        instance: InstanceRaw,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Instance Buffer")),
            contents: bytemuck::cast_slice(&[instance]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            node,
            material: mesh.material,
            vertex_buffer,
            index_buffer,
            num_elements: mesh.geometry.indices.len() as u32,
            instance_buffer,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, instance: InstanceRaw) {
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&[instance]));
    }
}
