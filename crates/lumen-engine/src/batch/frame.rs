use crate::text::TextShaper;

use super::{QuadInstance, TextDrawRequest, TextVertex};

/// Per-frame primitive buffers.
///
/// Cleared (not reallocated) at the start of every translation pass, so a
/// warmed engine does not touch the allocator for primitives.
#[derive(Debug, Default)]
pub struct FrameBuffers {
    pub(crate) quads: Vec<QuadInstance>,
    pub(crate) texts: Vec<TextDrawRequest>,
    pub(crate) text_vertices: Vec<TextVertex>,
    pub(crate) text_indices: Vec<u32>,
}

impl FrameBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(quads: usize, text_vertices: usize) -> Self {
        Self {
            quads: Vec::with_capacity(quads),
            texts: Vec::new(),
            text_vertices: Vec::with_capacity(text_vertices),
            text_indices: Vec::with_capacity(text_vertices / 4 * 6),
        }
    }

    pub fn clear(&mut self) {
        self.quads.clear();
        self.texts.clear();
        self.text_vertices.clear();
        self.text_indices.clear();
    }

    #[inline]
    pub fn quads(&self) -> &[QuadInstance] {
        &self.quads
    }

    #[inline]
    pub fn texts(&self) -> &[TextDrawRequest] {
        &self.texts
    }

    #[inline]
    pub fn text_vertices(&self) -> &[TextVertex] {
        &self.text_vertices
    }

    #[inline]
    pub fn text_indices(&self) -> &[u32] {
        &self.text_indices
    }

    /// Copies each request's shaped geometry into the frame text buffers,
    /// offset by the request position and tinted with its color. Indices are
    /// rebased to absolute vertex offsets.
    ///
    /// Requests recorded counts when they were classified. Geometry that
    /// changed since (a vanished handle, or a glyph-atlas rebuild) is cut or
    /// padded with degenerate data to those counts, and indices past the
    /// request's vertices collapse onto its first vertex, so later spans stay
    /// valid.
    pub fn assemble_text<S: TextShaper + ?Sized>(&mut self, shaper: &S) {
        self.text_vertices.clear();
        self.text_indices.clear();

        for req in &self.texts {
            debug_assert_eq!(req.vertices.start as usize, self.text_vertices.len());
            debug_assert_eq!(req.indices.start as usize, self.text_indices.len());

            let base = req.vertices.start;
            let [ox, oy] = req.position;

            if let Some(geometry) = shaper.geometry(req.handle) {
                let vertices = geometry.vertices.iter().take(req.vertices.len as usize);
                self.text_vertices.extend(vertices.map(|v| TextVertex {
                    pos: [v.pos[0] + ox, v.pos[1] + oy],
                    uv: v.uv,
                    color: req.color,
                }));
                let indices = geometry.indices.iter().take(req.indices.len as usize);
                let vertex_count = req.vertices.len;
                self.text_indices.extend(indices.map(|&i| if i < vertex_count { base + i } else { base }));
            }

            self.text_vertices.resize(req.vertices.end() as usize, TextVertex::default());
            self.text_indices.resize(req.indices.end() as usize, base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::testing::RecordingShaper;
    use crate::batch::Span;
    use crate::text::{FontId, TextHandle};

    fn request(handle: TextHandle, pos: [f32; 2], v: Span, i: Span) -> TextDrawRequest {
        TextDrawRequest { handle, position: pos, color: [1.0; 4], vertices: v, indices: i }
    }

    #[test]
    fn assemble_offsets_positions_and_rebases_indices() {
        let mut shaper = RecordingShaper::default();
        let a = shaper.create(FontId(0), 10.0, "a").unwrap();
        let b = shaper.create(FontId(0), 10.0, "b").unwrap();

        let mut frame = FrameBuffers::new();
        frame.texts.push(request(a, [0.0, 0.0], Span::new(0, 4), Span::new(0, 6)));
        frame.texts.push(request(b, [100.0, 50.0], Span::new(4, 4), Span::new(6, 6)));
        frame.assemble_text(&shaper);

        assert_eq!(frame.text_vertices().len(), 8);
        assert_eq!(frame.text_indices().len(), 12);
        assert_eq!(frame.text_vertices()[4].pos, [100.0, 50.0]);
        assert_eq!(&frame.text_indices()[6..12], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn missing_geometry_is_padded_to_recorded_counts() {
        let shaper = RecordingShaper::default();
        let mut frame = FrameBuffers::new();
        frame.texts.push(request(TextHandle(9), [0.0, 0.0], Span::new(0, 4), Span::new(0, 6)));
        frame.assemble_text(&shaper);

        assert_eq!(frame.text_vertices().len(), 4);
        assert_eq!(frame.text_indices(), &[0; 6]);
    }

    #[test]
    fn geometry_grown_since_classification_stays_in_its_span() {
        let mut shaper = RecordingShaper::default();
        let a = shaper.create(FontId(0), 10.0, "a").unwrap();
        shaper.set_text(a, "ab").unwrap();

        let mut frame = FrameBuffers::new();
        frame.texts.push(request(a, [0.0, 0.0], Span::new(0, 4), Span::new(0, 12)));
        frame.assemble_text(&shaper);

        assert_eq!(frame.text_vertices().len(), 4);
        assert_eq!(&frame.text_indices()[..6], &[0, 1, 2, 0, 2, 3]);
        assert!(frame.text_indices()[6..].iter().all(|&i| i == 0));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut frame = FrameBuffers::with_capacity(128, 256);
        frame.quads.push(QuadInstance::default());
        frame.clear();
        assert!(frame.quads().is_empty());
        assert!(frame.quads.capacity() >= 128);
    }
}
