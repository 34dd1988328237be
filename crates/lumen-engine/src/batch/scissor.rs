use crate::coords::Rect;

use super::Span;

/// A clip-scoped slice of a layer's primitives.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScissorRegion {
    /// Clip in physical pixels. `None` = full surface.
    pub clip: Option<Rect>,
    pub quads: Span,
    /// Text draw requests.
    pub texts: Span,
    pub text_vertices: Span,
    pub text_indices: Span,
}

impl ScissorRegion {
    /// A region with no quads and no text is never recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty() && self.texts.is_empty()
    }

    /// Empty region with `clip` that continues where this one ends.
    #[inline]
    fn successor(&self, clip: Option<Rect>) -> Self {
        Self {
            clip,
            quads: self.quads.after(),
            texts: self.texts.after(),
            text_vertices: self.text_vertices.after(),
            text_indices: self.text_indices.after(),
        }
    }
}

/// Splits the primitive stream into [`ScissorRegion`]s.
///
/// Holds one open accumulator. Every scissor boundary closes it (returning it
/// to the caller unless empty) and opens a successor whose spans start where
/// the closed ones end, so recorded regions are contiguous and ordered even
/// though the commands carry no offsets.
///
/// Nested clips are intersected with their parent. An unmatched
/// `on_scissor_end` degrades to the full surface instead of failing.
#[derive(Debug, Default)]
pub struct ScissorTracker {
    current: ScissorRegion,
    stack: Vec<Rect>,
    unbalanced_ends: u32,
}

impl ScissorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame: no clip, all spans at zero. Keeps the stack allocation.
    pub fn reset(&mut self) {
        self.current = ScissorRegion::default();
        self.stack.clear();
        self.unbalanced_ends = 0;
    }

    /// The accumulator currently receiving primitives.
    #[inline]
    pub fn open_region(&self) -> &ScissorRegion {
        &self.current
    }

    /// Number of `on_scissor_end` calls this frame that had no open scissor.
    #[inline]
    pub fn unbalanced_ends(&self) -> u32 {
        self.unbalanced_ends
    }

    #[inline]
    pub fn add_quad(&mut self) {
        self.current.quads.grow(1);
    }

    #[inline]
    pub fn add_text(&mut self, vertex_count: u32, index_count: u32) {
        self.current.texts.grow(1);
        self.current.text_vertices.grow(vertex_count);
        self.current.text_indices.grow(index_count);
    }

    /// Opens a clip (physical pixels). Returns the region it closed, if any.
    pub fn on_scissor_start(&mut self, rect: Rect) -> Option<ScissorRegion> {
        let rect = rect.normalized();
        let effective = match self.stack.last() {
            None => rect,
            // Disjoint with the parent: keep a zero-area clip so the draw
            // stage skips everything inside.
            Some(&parent) => parent
                .intersect(rect)
                .unwrap_or(Rect::new(rect.origin.x, rect.origin.y, 0.0, 0.0)),
        };
        self.stack.push(effective);
        self.rotate(Some(effective))
    }

    /// Closes the innermost clip. Returns the region it closed, if any.
    pub fn on_scissor_end(&mut self) -> Option<ScissorRegion> {
        if self.stack.pop().is_none() {
            self.unbalanced_ends += 1;
            log::debug!("scissor end without matching start; using full-surface clip");
        }
        let parent = self.stack.last().copied();
        self.rotate(parent)
    }

    /// Closes the trailing accumulator at end of stream.
    pub fn finish(&mut self) -> Option<ScissorRegion> {
        if !self.stack.is_empty() {
            log::debug!("{} scissor region(s) left open at end of stream", self.stack.len());
        }
        let parent = self.stack.last().copied();
        self.rotate(parent)
    }

    fn rotate(&mut self, next_clip: Option<Rect>) -> Option<ScissorRegion> {
        let next = self.current.successor(next_clip);
        let closed = std::mem::replace(&mut self.current, next);
        (!closed.is_empty()).then_some(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn empty_stream_records_nothing() {
        let mut t = ScissorTracker::new();
        assert_eq!(t.finish(), None);
    }

    #[test]
    fn scissor_start_closes_previous_region() {
        let mut t = ScissorTracker::new();
        t.add_quad();

        let closed = t.on_scissor_start(clip(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert_eq!(closed.clip, None);
        assert_eq!(closed.quads, Span::new(0, 1));

        t.add_quad();
        let closed = t.on_scissor_end().unwrap();
        assert_eq!(closed.clip, Some(clip(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(closed.quads, Span::new(1, 1));
    }

    #[test]
    fn empty_regions_are_dropped_but_offsets_continue() {
        let mut t = ScissorTracker::new();
        t.add_quad();
        t.add_quad();
        assert!(t.on_scissor_start(clip(0.0, 0.0, 1.0, 1.0)).is_some());
        assert!(t.on_scissor_end().is_none());
        t.add_text(4, 6);
        let last = t.finish().unwrap();
        assert_eq!(last.quads, Span::empty_at(2));
        assert_eq!(last.texts, Span::new(0, 1));
        assert_eq!(last.text_indices, Span::new(0, 6));
    }

    #[test]
    fn nested_clips_intersect_and_restore_parent() {
        let mut t = ScissorTracker::new();
        t.on_scissor_start(clip(0.0, 0.0, 10.0, 10.0));
        t.on_scissor_start(clip(5.0, 5.0, 10.0, 10.0));
        assert_eq!(t.open_region().clip, Some(clip(5.0, 5.0, 5.0, 5.0)));

        t.on_scissor_end();
        assert_eq!(t.open_region().clip, Some(clip(0.0, 0.0, 10.0, 10.0)));
        t.on_scissor_end();
        assert_eq!(t.open_region().clip, None);
    }

    #[test]
    fn disjoint_nested_clip_is_zero_area() {
        let mut t = ScissorTracker::new();
        t.on_scissor_start(clip(0.0, 0.0, 10.0, 10.0));
        t.on_scissor_start(clip(20.0, 20.0, 5.0, 5.0));
        let c = t.open_region().clip.unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn unmatched_end_opens_full_surface_region() {
        let mut t = ScissorTracker::new();
        assert!(t.on_scissor_end().is_none());
        t.add_quad();
        let region = t.finish().unwrap();
        assert_eq!(region.clip, None);
        assert_eq!(region.quads, Span::new(0, 1));
        assert_eq!(t.unbalanced_ends(), 1);
    }

    #[test]
    fn finish_keeps_unclosed_clip() {
        let mut t = ScissorTracker::new();
        t.on_scissor_start(clip(1.0, 1.0, 2.0, 2.0));
        t.add_quad();
        let region = t.finish().unwrap();
        assert_eq!(region.clip, Some(clip(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn reset_rewinds_offsets() {
        let mut t = ScissorTracker::new();
        t.add_quad();
        t.on_scissor_start(clip(0.0, 0.0, 1.0, 1.0));
        t.reset();
        assert_eq!(*t.open_region(), ScissorRegion::default());
    }
}
