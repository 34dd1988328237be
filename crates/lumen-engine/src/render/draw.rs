use crate::batch::{LayerAccumulator, ScissorRegion, Span};
use crate::paint::Color;

use super::common::clip_to_scissor;
use super::quad::QuadPipeline;
use super::text::TextPipeline;
use super::upload::UploadStage;
use super::RenderTarget;

/// One render-pass command, in issue order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum DrawStep {
    /// `(x, y, width, height)` in physical pixels.
    Scissor(u32, u32, u32, u32),
    /// Instance range in the quad buffer.
    Quads(Span),
    /// Index range in the text index buffer.
    Text(Span),
}

/// Load op for the pass of layer `index`: the first pass clears, the rest
/// composite on top.
pub(crate) fn load_op(index: usize, clear: Color) -> wgpu::LoadOp<wgpu::Color> {
    if index == 0 {
        wgpu::LoadOp::Clear(clear.to_wgpu())
    } else {
        wgpu::LoadOp::Load
    }
}

/// Commands for one layer's regions.
///
/// Per region: its scissor, then quads, then text, each only when
/// non-empty. Regions whose clip is zero-area on this surface emit nothing.
pub(crate) fn layer_steps(
    regions: &[ScissorRegion],
    surface_size: (u32, u32),
) -> impl Iterator<Item = DrawStep> + '_ {
    regions.iter().flat_map(move |region| {
        clip_to_scissor(region.clip, surface_size)
            .map(|(x, y, w, h)| {
                [
                    Some(DrawStep::Scissor(x, y, w, h)),
                    (!region.quads.is_empty()).then_some(DrawStep::Quads(region.quads)),
                    (!region.text_indices.is_empty()).then_some(DrawStep::Text(region.text_indices)),
                ]
            })
            .into_iter()
            .flatten()
            .flatten()
    })
}

/// Borrowed GPU state needed to replay one frame's layers.
pub(crate) struct DrawStage<'a> {
    pub quads: &'a QuadPipeline,
    pub text: &'a TextPipeline,
    pub buffers: &'a UploadStage,
    /// Size of the configured surface texture.
    pub surface_size: (u32, u32),
    pub clear_color: Color,
}

impl DrawStage<'_> {
    /// Records one render pass per layer and replays its [`layer_steps`].
    /// Returns the number of draw calls issued.
    pub(crate) fn draw(&self, target: &mut RenderTarget<'_>, layers: &LayerAccumulator) -> u32 {
        let mut draw_calls = 0;

        for (index, layer) in layers.layers().iter().enumerate() {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen layer pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: load_op(index, self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for step in layer_steps(layers.regions(layer), self.surface_size) {
                match step {
                    DrawStep::Scissor(x, y, w, h) => rpass.set_scissor_rect(x, y, w, h),
                    DrawStep::Quads(span) => {
                        let Some(instances) = self.buffers.quads.buffer() else { continue };
                        self.quads.draw(&mut rpass, instances, span);
                        draw_calls += 1;
                    }
                    DrawStep::Text(span) => {
                        let vertices = self.buffers.text_vertices.buffer();
                        let indices = self.buffers.text_indices.buffer();
                        let (Some(vertices), Some(indices)) = (vertices, indices) else { continue };
                        self.text.draw(&mut rpass, vertices, indices, span);
                        draw_calls += 1;
                    }
                }
            }
        }

        draw_calls
    }
}
