//! Draw descriptions handed from a sample to the render loop.
//!
//! A sample never records into the render pass itself. Each frame it returns a
//! [`Render`] borrowing its pipelines and buffers, and the loop encodes it into
//! the pass it owns, after clearing colour and depth.

use std::ops::Range;

use wgpu::RenderPass;

/// One draw call with everything it binds.
///
/// Bind groups are set at the index of their position in `bind_groups`,
/// vertex buffers at the slot of their position in `vertex_buffers`.
pub struct Draw<'a> {
    pub pipeline: &'a wgpu::RenderPipeline,
    pub bind_groups: Vec<&'a wgpu::BindGroup>,
    pub vertex_buffers: Vec<&'a wgpu::Buffer>,
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
}

impl Draw<'_> {
    fn encode(self, render_pass: &mut RenderPass<'_>) {
        if self.instances.is_empty() || self.vertices.is_empty() {
            log::warn!("skipping a draw with zero vertices or instances");
            return;
        }
        render_pass.set_pipeline(self.pipeline);
        for (index, group) in self.bind_groups.into_iter().enumerate() {
            render_pass.set_bind_group(index as u32, group, &[]);
        }
        for (slot, buffer) in self.vertex_buffers.into_iter().enumerate() {
            render_pass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
        render_pass.draw(self.vertices, self.instances);
    }
}

/// What a sample wants drawn this frame.
///
/// - `None` draws nothing, leaving only the clear colour
/// - `Draw` is a single draw call
/// - `Draws` are several draw calls in order
pub enum Render<'a> {
    None,
    Draw(Draw<'a>),
    Draws(Vec<Draw<'a>>),
}

impl Render<'_> {
    pub(crate) fn encode(self, render_pass: &mut RenderPass<'_>) {
        match self {
            Render::None => (),
            Render::Draw(draw) => draw.encode(render_pass),
            Render::Draws(draws) => draws
                .into_iter()
                .for_each(|draw| draw.encode(render_pass)),
        }
    }
}
