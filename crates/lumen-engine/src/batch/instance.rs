use bytemuck::{Pod, Zeroable};

use crate::text::TextHandle;

use super::Span;

/// Per-quad instance data consumed by `render/shaders/quad.wgsl`.
///
/// Layout (80 bytes):
///
///  offset  0  rect          [f32; 4]   loc 1  (x, y, w, h; physical px)
///  offset 16  radii         [f32; 4]   loc 2  (tl, tr, br, bl)
///  offset 32  fill          [f32; 4]   loc 3  (premultiplied)
///  offset 48  stroke        [f32; 4]   loc 4  (premultiplied)
///  offset 64  stroke_width  f32        loc 5
///  offset 68  _pad          [f32; 3]
///
/// Borders are quads with a transparent `fill` and a non-zero `stroke_width`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub rect: [f32; 4],
    pub radii: [f32; 4],
    pub fill: [f32; 4],
    pub stroke: [f32; 4],
    pub stroke_width: f32,
    pub _pad: [f32; 3],
}

/// Assembled text vertex consumed by `render/shaders/text.wgsl` (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// One text element scheduled for this frame.
///
/// Refers to shaped geometry by handle; the vertex and index spans say where
/// the geometry lands once assembled into the frame's text buffers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextDrawRequest {
    pub handle: TextHandle,
    /// Physical-pixel origin added to every glyph vertex.
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub vertices: Span,
    pub indices: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_strides_match_shader_contract() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 80);
        assert_eq!(std::mem::size_of::<TextVertex>(), 32);
        assert_eq!(std::mem::size_of::<QuadInstance>() % 16, 0);
    }
}
