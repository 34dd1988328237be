use crate::scene::{BorderCmd, RectangleCmd, RenderCommand, TextCmd};
use crate::text::{TextCache, TextError, TextShaper};
use crate::paint::Color;

use super::{FrameBuffers, Layer, LayerAccumulator, QuadInstance, ScissorTracker, Span, TextDrawRequest};

/// Text collaborators borrowed for one translation pass.
pub struct TextContext<'a, S: TextShaper + ?Sized> {
    pub cache: &'a mut TextCache,
    pub shaper: &'a mut S,
    /// Frame counter used to mark cache entries as seen.
    pub frame: u64,
}

/// Walks a command stream once and classifies each command into quads, text
/// requests or scissor boundaries.
///
/// The classifier talks to the [`ScissorTracker`] and [`LayerAccumulator`]
/// only through their explicit calls; it never inspects region lists.
#[derive(Debug, Default)]
pub struct Classifier {
    tracker: ScissorTracker,
    layers: LayerAccumulator,
    skipped_quads: u32,
    dropped_texts: u32,
    warned_text_failure: bool,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates `commands` into `buffers` and returns the frame's layer.
    ///
    /// `scale` converts logical command bounds to physical pixels. Previous
    /// contents of `buffers` and of the layer list are discarded.
    pub fn translate<S: TextShaper + ?Sized>(
        &mut self,
        commands: &[RenderCommand],
        scale: f32,
        buffers: &mut FrameBuffers,
        mut text: TextContext<'_, S>,
    ) -> Layer {
        buffers.clear();
        self.tracker.reset();
        self.layers.reset();
        self.skipped_quads = 0;
        self.dropped_texts = 0;

        self.layers.begin_layer(self.tracker.open_region());

        for cmd in commands {
            match cmd {
                RenderCommand::Rectangle(rect) => self.push_rectangle(rect, scale, buffers),
                RenderCommand::Border(border) => self.push_border(border, scale, buffers),
                RenderCommand::Text(cmd) => self.push_text(cmd, scale, buffers, &mut text),
                RenderCommand::ScissorStart(s) => {
                    if let Some(region) = self.tracker.on_scissor_start(s.bounds.to_physical(scale)) {
                        self.layers.push_region(region);
                    }
                }
                RenderCommand::ScissorEnd => {
                    if let Some(region) = self.tracker.on_scissor_end() {
                        self.layers.push_region(region);
                    }
                }
                RenderCommand::Other => {}
            }
        }

        if let Some(region) = self.tracker.finish() {
            self.layers.push_region(region);
        }
        self.layers.finish()
    }

    /// Layers produced by the last [`translate`](Self::translate).
    #[inline]
    pub fn layers(&self) -> &LayerAccumulator {
        &self.layers
    }

    /// Rectangles/borders skipped last frame (empty or non-finite bounds).
    #[inline]
    pub fn skipped_quads(&self) -> u32 {
        self.skipped_quads
    }

    /// Text elements dropped last frame because shaping failed.
    #[inline]
    pub fn dropped_texts(&self) -> u32 {
        self.dropped_texts
    }

    // ── quads ──────────────────────────────────────────────────────────────

    fn push_rectangle(&mut self, cmd: &RectangleCmd, scale: f32, buffers: &mut FrameBuffers) {
        self.push_quad(cmd.bounds, cmd.radii, cmd.fill, Color::transparent(), 0.0, scale, buffers);
    }

    fn push_border(&mut self, cmd: &BorderCmd, scale: f32, buffers: &mut FrameBuffers) {
        if !(cmd.width.is_finite() && cmd.width > 0.0) {
            self.skipped_quads += 1;
            return;
        }
        self.push_quad(
            cmd.bounds,
            cmd.radii,
            Color::transparent(),
            cmd.stroke,
            cmd.width * scale,
            scale,
            buffers,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn push_quad(
        &mut self,
        bounds: crate::coords::Rect,
        radii: crate::coords::CornerRadii,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
        scale: f32,
        buffers: &mut FrameBuffers,
    ) {
        let r = bounds.normalized().to_physical(scale);
        if r.is_empty() || !r.is_finite() {
            log::debug!("skipping quad with bounds {bounds:?}");
            self.skipped_quads += 1;
            return;
        }

        buffers.quads.push(QuadInstance {
            rect: r.to_array(),
            radii: radii.to_physical(scale, r.size.x, r.size.y),
            fill: fill.to_array(),
            stroke: stroke.to_array(),
            stroke_width,
            _pad: [0.0; 3],
        });
        self.tracker.add_quad();
    }

    // ── text ───────────────────────────────────────────────────────────────

    fn push_text<S: TextShaper + ?Sized>(
        &mut self,
        cmd: &TextCmd,
        scale: f32,
        buffers: &mut FrameBuffers,
        text: &mut TextContext<'_, S>,
    ) {
        let size = cmd.size * scale;
        let cache = &mut *text.cache;
        let shaper = &mut *text.shaper;

        let handle = match cache.get_or_create(shaper, cmd.id, cmd.font, size, &cmd.text, text.frame) {
            Ok(handle) => handle,
            Err(err) => return self.drop_text(cmd, &err),
        };
        if let Err(err) = cache.update_if_changed(shaper, cmd.id, &cmd.text) {
            return self.drop_text(cmd, &err);
        }

        let Some(geometry) = shaper.geometry(handle) else {
            return self.drop_text(cmd, &TextError::UnknownHandle(handle));
        };
        let (vertex_count, index_count) = (geometry.vertex_count(), geometry.index_count());
        if index_count == 0 {
            // Whitespace or fully clipped glyphs: nothing to draw.
            return;
        }

        let open = self.tracker.open_region();
        let origin = cmd.bounds.origin * scale;
        buffers.texts.push(TextDrawRequest {
            handle,
            position: origin.to_array(),
            color: cmd.color.to_array(),
            vertices: Span::new(open.text_vertices.end(), vertex_count),
            indices: Span::new(open.text_indices.end(), index_count),
        });
        self.tracker.add_text(vertex_count, index_count);
    }

    fn drop_text(&mut self, cmd: &TextCmd, err: &TextError) {
        self.dropped_texts += 1;
        if !self.warned_text_failure {
            log::warn!("dropping text {:?} ({:?}): {err}", cmd.id, cmd.text);
            self.warned_text_failure = true;
        } else {
            log::debug!("dropping text {:?}: {err}", cmd.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::testing::RecordingShaper;
    use crate::batch::ScissorRegion;
    use crate::coords::{CornerRadii, Rect};
    use crate::scene::{CommandList, ElementId};
    use crate::text::FontId;

    struct Harness {
        classifier: Classifier,
        buffers: FrameBuffers,
        cache: TextCache,
        shaper: RecordingShaper,
        frame: u64,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_shaper(RecordingShaper::default())
        }

        fn with_shaper(shaper: RecordingShaper) -> Self {
            Self {
                classifier: Classifier::new(),
                buffers: FrameBuffers::new(),
                cache: TextCache::new(),
                shaper,
                frame: 0,
            }
        }

        fn run(&mut self, list: &CommandList, scale: f32) -> Layer {
            self.frame += 1;
            let text = TextContext { cache: &mut self.cache, shaper: &mut self.shaper, frame: self.frame };
            self.classifier.translate(list.commands(), scale, &mut self.buffers, text)
        }

        fn regions(&self, layer: &Layer) -> Vec<ScissorRegion> {
            self.classifier.layers().regions(layer).to_vec()
        }
    }

    fn white() -> Color {
        Color::white()
    }

    #[test]
    fn rectangle_becomes_opaque_quad() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_rect(Rect::new(1.0, 2.0, 3.0, 4.0), CornerRadii::all(1.0), white());

        let layer = h.run(&list, 1.0);
        let q = h.buffers.quads()[0];
        assert_eq!(layer.quads, Span::new(0, 1));
        assert_eq!(q.rect, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(q.fill, [1.0; 4]);
        assert_eq!(q.stroke_width, 0.0);
    }

    #[test]
    fn border_has_transparent_fill_and_scaled_stroke() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_border(Rect::new(0.0, 0.0, 10.0, 10.0), CornerRadii::zero(), white(), 2.0);

        h.run(&list, 2.0);
        let q = h.buffers.quads()[0];
        assert_eq!(q.fill, [0.0; 4]);
        assert_eq!(q.stroke, [1.0; 4]);
        assert_eq!(q.stroke_width, 4.0);
        assert_eq!(q.rect, [0.0, 0.0, 20.0, 20.0]);
    }

    #[test]
    fn degenerate_quads_are_skipped() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_solid_rect(Rect::new(0.0, 0.0, 0.0, 5.0), white());
        list.push_solid_rect(Rect::new(f32::NAN, 0.0, 5.0, 5.0), white());
        list.push_border(Rect::new(0.0, 0.0, 5.0, 5.0), CornerRadii::zero(), white(), 0.0);

        let layer = h.run(&list, 1.0);
        assert_eq!(layer.quads, Span::empty_at(0));
        assert_eq!(h.classifier.skipped_quads(), 3);
        assert!(h.regions(&layer).is_empty());
    }

    #[test]
    fn scissor_example_yields_two_regions() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_solid_rect(Rect::new(0.0, 0.0, 10.0, 10.0), white());
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        list.push_solid_rect(Rect::new(1.0, 1.0, 2.0, 2.0), white());
        list.pop_clip();

        let layer = h.run(&list, 1.0);
        let regions = h.regions(&layer);
        assert_eq!(layer.quads, Span::new(0, 2));
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].clip, None);
        assert_eq!(regions[0].quads, Span::new(0, 1));
        assert_eq!(regions[1].clip, Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
        assert_eq!(regions[1].quads, Span::new(1, 1));
    }

    #[test]
    fn clip_rects_are_scaled_to_physical_pixels() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_clip(Rect::new(1.0, 1.0, 5.0, 5.0));
        list.push_solid_rect(Rect::new(1.0, 1.0, 2.0, 2.0), white());
        list.pop_clip();

        let layer = h.run(&list, 2.0);
        assert_eq!(h.regions(&layer)[0].clip, Some(Rect::new(2.0, 2.0, 10.0, 10.0)));
    }

    #[test]
    fn empty_stream_yields_one_empty_layer() {
        let mut h = Harness::new();
        let layer = h.run(&CommandList::new(), 1.0);
        assert_eq!(layer, Layer::default());
        assert_eq!(h.classifier.layers().layers().len(), 1);
        assert!(h.regions(&layer).is_empty());
    }

    #[test]
    fn text_records_counts_and_spans() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_text(ElementId(1), Rect::new(5.0, 6.0, 50.0, 10.0), "ab", FontId(0), 10.0, white());
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        list.push_text(ElementId(2), Rect::new(0.0, 0.0, 50.0, 10.0), "xyz", FontId(0), 10.0, white());
        list.pop_clip();

        let layer = h.run(&list, 1.0);
        let texts = h.buffers.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].position, [5.0, 6.0]);
        assert_eq!(texts[0].vertices, Span::new(0, 8));
        assert_eq!(texts[1].indices, Span::new(12, 18));
        assert_eq!(layer.text_indices, Span::new(0, 30));

        let regions = h.regions(&layer);
        assert_eq!(regions[1].texts, Span::new(1, 1));
        assert_eq!(regions[1].text_indices, Span::new(12, 18));
    }

    #[test]
    fn failed_text_is_dropped_and_frame_continues() {
        let mut h = Harness::with_shaper(RecordingShaper::failing_on("bad"));
        let mut list = CommandList::new();
        list.push_text(ElementId(1), Rect::new(0.0, 0.0, 1.0, 1.0), "bad", FontId(0), 10.0, white());
        list.push_solid_rect(Rect::new(0.0, 0.0, 1.0, 1.0), white());

        let layer = h.run(&list, 1.0);
        assert_eq!(h.classifier.dropped_texts(), 1);
        assert!(h.buffers.texts().is_empty());
        assert_eq!(layer.quads, Span::new(0, 1));
    }

    #[test]
    fn whitespace_text_produces_no_request() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_text(ElementId(1), Rect::new(0.0, 0.0, 1.0, 1.0), "   ", FontId(0), 10.0, white());

        let layer = h.run(&list, 1.0);
        assert!(h.buffers.texts().is_empty());
        assert_eq!(layer.texts, Span::empty_at(0));
        assert_eq!(h.classifier.dropped_texts(), 0);
    }

    #[test]
    fn text_size_follows_display_scale() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push_text(ElementId(1), Rect::new(0.0, 0.0, 1.0, 1.0), "a", FontId(0), 10.0, white());

        h.run(&list, 1.0);
        h.run(&list, 2.0);
        // Size change forces a new handle; the old one is released.
        assert_eq!(h.shaper.creates, 2);
        assert_eq!(h.shaper.releases, 1);
    }

    #[test]
    fn other_commands_are_ignored() {
        let mut h = Harness::new();
        let mut list = CommandList::new();
        list.push(RenderCommand::Other);
        list.push_solid_rect(Rect::new(0.0, 0.0, 1.0, 1.0), white());
        list.push(RenderCommand::Other);

        let layer = h.run(&list, 1.0);
        assert_eq!(layer.quads, Span::new(0, 1));
        assert_eq!(h.regions(&layer).len(), 1);
    }
}
