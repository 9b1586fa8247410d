use cgmath::SquareMatrix;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    lighting::{DirectionalLight, LightRig, SpotLight},
};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
pub const MAX_SPOT_LIGHTS: usize = 2;

/// GPU objects of the light rig and the key light's shadow map.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub shadow_map: Texture,
    pub shadow_buffer: wgpu::Buffer,
    pub shadow_bind_group: wgpu::BindGroup,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    direction: [f32; 4],
    /// Linear rgb premultiplied by the intensity.
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw {
    /// `w` is the cut off distance.
    position: [f32; 4],
    /// `w` is the decay exponent.
    direction: [f32; 4],
    color: [f32; 4],
    /// Cosine of the outer and inner cone angles.
    cone: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 4],
    /// Number of directional and spot lights in use.
    counts: [u32; 4],
    directional: [DirectionalLightRaw; MAX_DIRECTIONAL_LIGHTS],
    spots: [SpotLightRaw; MAX_SPOT_LIGHTS],
    shadow_view_proj: [[f32; 4]; 4],
}

fn premultiplied(color: &crate::data_structures::material::Color, intensity: f32) -> [f32; 4] {
    let [r, g, b] = color.to_linear();
    [r * intensity, g * intensity, b * intensity, 1.0]
}

impl From<&DirectionalLight> for DirectionalLightRaw {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: light.direction().extend(0.0).into(),
            color: premultiplied(&light.color, light.intensity),
        }
    }
}

impl From<&SpotLight> for SpotLightRaw {
    fn from(light: &SpotLight) -> Self {
        let (outer, inner) = light.cone_cosines();
        Self {
            position: [
                light.position.x,
                light.position.y,
                light.position.z,
                light.distance,
            ],
            direction: light.direction().extend(light.decay).into(),
            color: premultiplied(&light.color, light.intensity),
            cone: [outer, inner, 0.0, 0.0],
        }
    }
}

impl LightUniform {
    pub fn from_rig(rig: &LightRig) -> Self {
        let mut directional = [DirectionalLightRaw::default(); MAX_DIRECTIONAL_LIGHTS];
        for (raw, light) in directional.iter_mut().zip(rig.directionals()) {
            *raw = light.into();
        }
        let mut spots = [SpotLightRaw::default(); MAX_SPOT_LIGHTS];
        for (raw, light) in spots.iter_mut().zip(rig.spots()) {
            *raw = light.into();
        }
        let shadow_view_proj = rig
            .key
            .shadow_view_proj()
            .unwrap_or_else(cgmath::Matrix4::identity);
        Self {
            ambient: premultiplied(&rig.ambient.color, rig.ambient.intensity),
            counts: [
                rig.directionals().len() as u32,
                rig.spots().len() as u32,
                rig.key.shadow.is_some() as u32,
                0,
            ],
            directional,
            spots,
            shadow_view_proj: shadow_view_proj.into(),
        }
    }

    pub fn shadow_view_proj(&self) -> [[f32; 4]; 4] {
        self.shadow_view_proj
    }

    pub fn spot_colour(&self, idx: usize) -> Option<[f32; 4]> {
        self.spots.get(idx).map(|spot| spot.color)
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Depth,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_shadow_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("shadow_bind_group_layout"),
    })
}

impl LightResources {
    pub fn new(device: &wgpu::Device, rig: &LightRig, shadow_map_size: u32) -> anyhow::Result<Self> {
        let uniform = LightUniform::from_rig(rig);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_map = Texture::create_shadow_map(device, shadow_map_size);
        let shadow_sampler = shadow_map
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("shadow map was created without a sampler"))?;

        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(shadow_sampler),
                },
            ],
            label: Some("light_bind_group"),
        });

        let shadow_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Buffer"),
            contents: bytemuck::cast_slice(&[uniform.shadow_view_proj]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_bind_group_layout = mk_shadow_bind_group_layout(device);
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: shadow_buffer.as_entire_binding(),
            }],
            label: Some("shadow_bind_group"),
        });

        Ok(Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
            shadow_map,
            shadow_buffer,
            shadow_bind_group,
            shadow_bind_group_layout,
        })
    }

    /// Upload the current state of the rig.
    pub fn write(&mut self, queue: &wgpu::Queue, rig: &LightRig) {
        self.uniform = LightUniform::from_rig(rig);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        queue.write_buffer(
            &self.shadow_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform.shadow_view_proj]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RoomConfig, lighting::add_lighting};

    #[test]
    fn uniform_matches_rig() {
        let mut rig = add_lighting(&RoomConfig::default());
        let uniform = LightUniform::from_rig(&rig);
        assert_eq!(uniform.counts, [2, 2, 1, 0]);
        assert_eq!(std::mem::size_of::<LightUniform>() % 16, 0);

        rig.lamp_spot.intensity = 2.0;
        let brighter = LightUniform::from_rig(&rig);
        let before = uniform.spot_colour(1).unwrap();
        let after = brighter.spot_colour(1).unwrap();
        assert!(after[0] > before[0]);
    }
}
