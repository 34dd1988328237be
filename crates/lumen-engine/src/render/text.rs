use crate::batch::{Span, TextVertex};
use crate::text::GlyphAtlas;

use super::common::{create_pipeline, create_viewport_ubo, viewport_ubo_entry, ViewportUniform};
use super::{RenderCtx, RenderError};

impl TextVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed glyph pipeline sampling an R8 coverage atlas.
///
/// The atlas texture mirrors the shaper's CPU [`GlyphAtlas`]; only rows
/// touched since the last upload are copied.
#[derive(Default)]
pub(crate) struct TextPipeline {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings (rebuilt when the atlas texture changes)
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    // atlas
    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    atlas_size: u32,
}

impl TextPipeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates or refreshes GPU state, uploads dirty atlas rows and writes
    /// the viewport.
    pub(crate) fn prepare(&mut self, ctx: &RenderCtx<'_>, atlas: &mut GlyphAtlas) -> Result<(), RenderError> {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx, atlas)?;
        self.ensure_sampler(ctx);
        self.ensure_bindings(ctx);
        self.upload_atlas(ctx, atlas);
        self.write_viewport_uniform(ctx);
        Ok(())
    }

    /// Draws `indices` of the frame's text index buffer with the currently
    /// set scissor. Indices are absolute, so the base vertex is zero.
    pub(crate) fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        vertices: &wgpu::Buffer,
        index_buffer: &wgpu::Buffer,
        indices: Span,
    ) {
        if indices.is_empty() {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(bind_group) = self.bind_group.as_ref() else { return; };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vertices.slice(..));
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(indices.range(), 0, 0..1);
    }

    // ── atlas ──────────────────────────────────────────────────────────────

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>, atlas: &mut GlyphAtlas) -> Result<(), RenderError> {
        if self.atlas_texture.is_some() && self.atlas_size == atlas.size() {
            return Ok(());
        }

        let size = atlas.size();
        let max = ctx.device.limits().max_texture_dimension_2d;
        if size > max {
            return Err(RenderError::AtlasTooLarge { size, max });
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen glyph atlas"),
            size: wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.atlas_size = size;
        self.bind_group = None;

        // Fresh texture: everything rasterized so far has to go up again.
        atlas.mark_all_dirty();
        Ok(())
    }

    fn upload_atlas(&self, ctx: &RenderCtx<'_>, atlas: &mut GlyphAtlas) {
        let Some(texture) = self.atlas_texture.as_ref() else { return; };
        let Some(rows) = atlas.take_dirty() else { return; };
        if rows.height == 0 {
            return;
        }

        let size = atlas.size();
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: 0, y: rows.y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            atlas.rows(rows),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size),
                rows_per_image: Some(rows.height),
            },
            wgpu::Extent3d { width: size, height: rows.height, depth_or_array_layers: 1 },
        );
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen text bgl"),
            entries: &[
                viewport_ubo_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = create_pipeline(ctx, "lumen text pipeline", &shader, &bgl, &[TextVertex::layout()]);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return; };
        let Some(sampler) = self.sampler.as_ref() else { return; };

        let viewport_ubo = create_viewport_ubo(ctx, "lumen text viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return; };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
    }
}
