//! Shared GPU types and utilities used by the quad and text pipelines.

use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;

use super::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

/// Physical surface size; shaders map physical pixels to NDC with it.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn from_ctx(ctx: &RenderCtx<'_>) -> Self {
        let (w, h) = ctx.surface_size;
        Self { viewport: [w as f32, h as f32], _pad: [0.0; 2] }
    }
}

/// Minimum binding size for the viewport uniform buffer.
pub(super) fn viewport_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
}

pub(super) fn viewport_ubo_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: viewport_ubo_min_binding_size(),
        },
        count: None,
    }
}

pub(super) fn create_viewport_ubo(ctx: &RenderCtx<'_>, label: &str) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<ViewportUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── pipeline ──────────────────────────────────────────────────────────────

/// Builds a triangle-list pipeline with premultiplied-alpha blending into
/// the surface format.
pub(super) fn create_pipeline(
    ctx: &RenderCtx<'_>,
    label: &str,
    shader: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a physical-pixel clip to wgpu scissor arguments, clamped to the
/// surface.
///
/// `clip = None` means the full surface. Returns `None` for a zero-area
/// result; the caller skips the region's draws.
pub fn clip_to_scissor(
    clip: Option<Rect>,
    (surface_w, surface_h): (u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    let (x, y, w, h) = match clip {
        None => (0, 0, surface_w, surface_h),
        Some(r) => {
            let r = r.normalized();
            let x = (r.origin.x.floor().max(0.0) as u32).min(surface_w);
            let y = (r.origin.y.floor().max(0.0) as u32).min(surface_h);
            let x2 = ((r.origin.x + r.size.x).ceil().max(0.0) as u32).min(surface_w);
            let y2 = ((r.origin.y + r.size.y).ceil().max(0.0) as u32).min(surface_h);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: (u32, u32) = (800, 600);

    #[test]
    fn no_clip_covers_surface() {
        assert_eq!(clip_to_scissor(None, SURFACE), Some((0, 0, 800, 600)));
    }

    #[test]
    fn clip_is_clamped_to_surface() {
        let clip = Rect::new(-10.0, 590.0, 50.0, 50.0);
        assert_eq!(clip_to_scissor(Some(clip), SURFACE), Some((0, 590, 40, 10)));
    }

    #[test]
    fn fractional_clip_rounds_outward() {
        let clip = Rect::new(1.5, 2.5, 3.0, 3.0);
        assert_eq!(clip_to_scissor(Some(clip), SURFACE), Some((1, 2, 4, 4)));
    }

    #[test]
    fn zero_area_clip_is_skipped() {
        assert_eq!(clip_to_scissor(Some(Rect::new(5.0, 5.0, 0.0, 0.0)), SURFACE), None);
        assert_eq!(clip_to_scissor(Some(Rect::new(900.0, 0.0, 10.0, 10.0)), SURFACE), None);
    }

    #[test]
    fn viewport_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
        assert!(viewport_ubo_min_binding_size().is_some());
    }
}
