//! Render composition and pipeline batching.
//!
//! [`Render`] describes what the scene wants drawn. The frame splits it into
//! [`Batches`]: opaque meshes for the basic pipeline, transparent meshes for
//! the blending pipeline and the shadow casters for the shadow pass.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the enum the scene resources hand to the frame
//! - [`Instanced<'a>`] borrows the buffers of a single mesh instance

use wgpu::RenderPass;

/// Buffers and colour map of one drawable mesh.
pub struct Instanced<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub instance: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: u32,
    pub cast_shadow: bool,
}

impl Instanced<'_> {
    /// Draw with whatever pipeline and bind groups are set on `pass`.
    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex.slice(..));
        pass.set_vertex_buffer(1, self.instance.slice(..));
        pass.set_index_buffer(self.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.amount, 0, 0..1);
    }

    /// Draw with the colour map bound to group 0.
    pub fn draw_textured(&self, pass: &mut RenderPass<'_>) {
        pass.set_bind_group(0, self.group, &[]);
        self.draw(pass);
    }
}

/// Specifies how scene objects should be rendered.
///
/// # Variants
///
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque meshes
/// - `Transparents(Vec<Instanced>)` renders transparent meshes in the given order
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
pub enum Render<'a> {
    Defaults(Vec<Instanced<'a>>),
    Transparents(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

/// Meshes sorted by the pipeline that draws them.
#[derive(Default)]
pub struct Batches<'a> {
    pub opaque: Vec<Instanced<'a>>,
    pub transparent: Vec<Instanced<'a>>,
}

impl<'a> Batches<'a> {
    /// Everything that writes into the shadow map.
    pub fn shadow_casters(&self) -> impl Iterator<Item = &Instanced<'a>> {
        self.opaque
            .iter()
            .chain(self.transparent.iter())
            .filter(|instanced| instanced.cast_shadow)
    }
}

impl<'a> Render<'a> {
    pub fn into_batches(self) -> Batches<'a> {
        let mut batches = Batches::default();
        self.set_pipelines(&mut batches.opaque, &mut batches.transparent);
        batches
    }

    pub(crate) fn set_pipelines(
        self,
        basics: &mut Vec<Instanced<'a>>,
        trans: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Transparents(mut vec) => trans.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, trans)),
        }
    }
}
