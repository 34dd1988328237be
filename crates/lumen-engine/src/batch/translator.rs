use crate::scene::RenderCommand;
use crate::text::{TextCache, TextShaper};

use super::{Classifier, FrameBuffers, Layer, LayerAccumulator, TextContext};

/// Tunables for [`Translator`].
#[derive(Debug, Clone, Copy)]
pub struct TranslatorConfig {
    /// Frames a text element may go unseen before its handle is released.
    pub max_idle_frames: u64,
    pub initial_quad_capacity: usize,
    pub initial_text_vertex_capacity: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            max_idle_frames: 120,
            initial_quad_capacity: 256,
            initial_text_vertex_capacity: 4096,
        }
    }
}

/// Owns everything that turns a command slice into draw-ready buffers:
/// the shaper, the text cache, the per-frame buffers and the classifier.
///
/// Nothing here touches the GPU; [`crate::render::RenderEngine`] wraps a
/// translator and feeds its output to the upload and draw stages.
pub struct Translator<S: TextShaper> {
    shaper: S,
    cache: TextCache,
    buffers: FrameBuffers,
    classifier: Classifier,
    frame: u64,
    config: TranslatorConfig,
}

impl<S: TextShaper> Translator<S> {
    pub fn new(shaper: S, config: TranslatorConfig) -> Self {
        Self {
            shaper,
            cache: TextCache::new(),
            buffers: FrameBuffers::with_capacity(
                config.initial_quad_capacity,
                config.initial_text_vertex_capacity,
            ),
            classifier: Classifier::new(),
            frame: 0,
            config,
        }
    }

    /// Runs one translation pass.
    ///
    /// Classifies `commands`, evicts idle text entries and assembles the text
    /// vertex/index buffers. The returned layer (and [`layers`](Self::layers))
    /// stay valid until the next call.
    pub fn translate(&mut self, commands: &[RenderCommand], scale: f32) -> Layer {
        self.frame += 1;

        let text = TextContext {
            cache: &mut self.cache,
            shaper: &mut self.shaper,
            frame: self.frame,
        };
        let layer = self.classifier.translate(commands, scale, &mut self.buffers, text);

        let evicted = self.cache.sweep(&mut self.shaper, self.frame, self.config.max_idle_frames);
        if evicted > 0 {
            log::debug!("text cache: evicted {evicted} idle entries ({} live)", self.cache.len());
        }

        self.buffers.assemble_text(&self.shaper);
        layer
    }

    #[inline]
    pub fn layers(&self) -> &LayerAccumulator {
        self.classifier.layers()
    }

    #[inline]
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    #[inline]
    pub fn cache(&self) -> &TextCache {
        &self.cache
    }

    #[inline]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    #[inline]
    pub fn shaper(&self) -> &S {
        &self.shaper
    }

    /// Mutable access for upload bookkeeping (e.g. draining atlas dirty rows).
    #[inline]
    pub fn shaper_mut(&mut self) -> &mut S {
        &mut self.shaper
    }

    /// Number of completed translation passes.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Releases every cached text handle.
    pub fn shutdown(&mut self) {
        self.cache.clear(&mut self.shaper);
        self.buffers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::testing::RecordingShaper;
    use crate::batch::Span;
    use crate::coords::Rect;
    use crate::paint::Color;
    use crate::scene::{CommandList, ElementId};
    use crate::text::FontId;

    fn translator() -> Translator<RecordingShaper> {
        Translator::new(RecordingShaper::default(), TranslatorConfig::default())
    }

    fn label(list: &mut CommandList, id: u64, text: &str) {
        list.push_text(ElementId(id), Rect::new(0.0, 0.0, 100.0, 20.0), text, FontId(0), 14.0, Color::white());
    }

    #[test]
    fn unchanged_text_is_not_reshaped() {
        let mut t = translator();
        let mut list = CommandList::new();
        label(&mut list, 1, "hello");

        t.translate(list.commands(), 1.0);
        t.translate(list.commands(), 1.0);

        assert_eq!(t.shaper().creates, 1);
        assert_eq!(t.shaper().set_texts, 0);
    }

    #[test]
    fn repeated_id_in_one_frame_keeps_first_text_and_never_reshapes() {
        let mut t = translator();
        let mut list = CommandList::new();
        label(&mut list, 1, "ab");
        label(&mut list, 1, "wxyz");

        for _ in 0..3 {
            t.translate(list.commands(), 1.0);
        }

        assert_eq!(t.shaper().creates, 1);
        assert_eq!(t.shaper().set_texts, 0);
        assert_eq!(t.buffers().texts().len(), 1);
        // Only the two quads of "ab" are assembled.
        assert_eq!(t.buffers().text_vertices().len(), 8);
        assert!(t.buffers().text_vertices().iter().all(|v| v.pos[0] <= 2.0));
        assert_eq!(t.classifier().dropped_texts(), 1);
    }

    #[test]
    fn changed_text_is_reshaped_in_place() {
        let mut t = translator();
        let mut list = CommandList::new();
        label(&mut list, 1, "fps 60");
        t.translate(list.commands(), 1.0);

        list.clear();
        label(&mut list, 1, "fps 59");
        t.translate(list.commands(), 1.0);

        assert_eq!(t.shaper().creates, 1);
        assert_eq!(t.shaper().set_texts, 1);
        assert_eq!(t.cache().len(), 1);
    }

    #[test]
    fn new_id_creates_exactly_once() {
        let mut t = translator();
        let mut list = CommandList::new();
        label(&mut list, 1, "a");
        t.translate(list.commands(), 1.0);

        label(&mut list, 2, "b");
        t.translate(list.commands(), 1.0);

        assert_eq!(t.shaper().creates, 2);
        assert_eq!(t.cache().len(), 2);
    }

    #[test]
    fn idle_entries_are_evicted() {
        let config = TranslatorConfig { max_idle_frames: 2, ..TranslatorConfig::default() };
        let mut t = Translator::new(RecordingShaper::default(), config);
        let mut list = CommandList::new();
        label(&mut list, 1, "gone soon");
        t.translate(list.commands(), 1.0);

        let empty = CommandList::new();
        t.translate(&[], 1.0);
        t.translate(empty.commands(), 1.0);
        assert_eq!(t.cache().len(), 1);

        t.translate(empty.commands(), 1.0);
        assert!(t.cache().is_empty());
        assert_eq!(t.shaper().releases, 1);
    }

    #[test]
    fn text_buffers_are_assembled_after_translation() {
        let mut t = translator();
        let mut list = CommandList::new();
        label(&mut list, 1, "ab");
        label(&mut list, 2, "c");

        let layer = t.translate(list.commands(), 1.0);
        assert_eq!(layer.text_vertices, Span::new(0, 12));
        assert_eq!(t.buffers().text_vertices().len(), 12);
        assert_eq!(t.buffers().text_indices().len(), 18);
        // Second request's indices point at its own vertices.
        assert_eq!(t.buffers().text_indices()[12], 8);
    }

    #[test]
    fn buffers_are_reused_across_frames() {
        let mut t = translator();
        let mut list = CommandList::new();
        list.push_solid_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::white());

        t.translate(list.commands(), 1.0);
        t.translate(list.commands(), 1.0);
        assert_eq!(t.buffers().quads().len(), 1);
        assert_eq!(t.frame_index(), 2);
    }

    #[test]
    fn shutdown_releases_all_handles() {
        let mut t = translator();
        let mut list = CommandList::new();
        label(&mut list, 1, "a");
        label(&mut list, 2, "b");
        t.translate(list.commands(), 1.0);

        t.shutdown();
        assert!(t.cache().is_empty());
        assert_eq!(t.shaper().releases, 2);
    }
}
