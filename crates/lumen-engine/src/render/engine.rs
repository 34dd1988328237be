use crate::batch::{Translator, TranslatorConfig};
use crate::paint::Color;
use crate::scene::RenderCommand;
use crate::text::{FontSystem, FontdueShaper};

use super::draw::DrawStage;
use super::quad::QuadPipeline;
use super::text::TextPipeline;
use super::upload::UploadStage;
use super::{RenderCtx, RenderError, RenderTarget};

/// Engine tunables.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Clear color of the first layer pass.
    pub clear_color: Color,
    /// Frames a text element may go unseen before its shaped handle is freed.
    pub text_cache_max_idle_frames: u64,
    pub initial_quad_capacity: usize,
    pub initial_text_vertex_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let t = TranslatorConfig::default();
        Self {
            clear_color: Color::black(),
            text_cache_max_idle_frames: t.max_idle_frames,
            initial_quad_capacity: t.initial_quad_capacity,
            initial_text_vertex_capacity: t.initial_text_vertex_capacity,
        }
    }
}

impl EngineConfig {
    fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig {
            max_idle_frames: self.text_cache_max_idle_frames,
            initial_quad_capacity: self.initial_quad_capacity,
            initial_text_vertex_capacity: self.initial_text_vertex_capacity,
        }
    }
}

/// Per-frame counters, refreshed by `prepare` and `draw`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub quads: u32,
    pub texts: u32,
    pub regions: u32,
    pub layers: u32,
    pub draw_calls: u32,
    pub cached_texts: u32,
    pub skipped_quads: u32,
    pub dropped_texts: u32,
    /// Exponentially smoothed frames per second.
    pub fps: f32,
}

/// Turns per-frame command streams into GPU draw calls.
///
/// Owns the shaped-text cache and all per-frame buffers. Per frame the
/// caller runs [`prepare`](Self::prepare) (translate + upload) and then
/// [`draw`](Self::draw) into an encoder it owns.
pub struct RenderEngine {
    translator: Translator<FontdueShaper>,
    quads: QuadPipeline,
    text: TextPipeline,
    upload: UploadStage,
    config: EngineConfig,
    stats: FrameStats,
    prepared: bool,
}

impl RenderEngine {
    /// Creates pipelines for `ctx`'s device and surface format.
    pub fn new(ctx: &RenderCtx<'_>, fonts: FontSystem, config: EngineConfig) -> Result<Self, RenderError> {
        let mut engine = Self {
            translator: Translator::new(FontdueShaper::new(fonts), config.translator_config()),
            quads: QuadPipeline::new(),
            text: TextPipeline::new(),
            upload: UploadStage::new(),
            config,
            stats: FrameStats::default(),
            prepared: false,
        };

        engine.quads.prepare(ctx);
        engine.text.prepare(ctx, engine.translator.shaper_mut().atlas_mut())?;
        log::info!(
            "render engine ready ({:?}, {} font(s))",
            ctx.surface_format,
            engine.fonts().len()
        );
        Ok(engine)
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        self.translator.shaper().fonts()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn set_clear_color(&mut self, color: Color) {
        self.config.clear_color = color;
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Translation state from the last `prepare` (layers, buffers, cache).
    #[inline]
    pub fn translator(&self) -> &Translator<FontdueShaper> {
        &self.translator
    }

    /// Translates `commands` and uploads the result.
    ///
    /// `dt` is the seconds since the previous frame (stats only). Upload
    /// failures are fatal and returned; per-element problems are logged and
    /// the element omitted.
    pub fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        commands: &[RenderCommand],
        dt: f32,
    ) -> Result<(), RenderError> {
        self.prepared = false;

        let scale = if ctx.viewport.is_valid() { ctx.viewport.scale } else { 1.0 };
        self.translator.translate(commands, scale);

        self.quads.prepare(ctx);
        self.text.prepare(ctx, self.translator.shaper_mut().atlas_mut())?;
        self.upload.upload(ctx, self.translator.buffers())?;

        let layers = self.translator.layers();
        let classifier = self.translator.classifier();
        self.stats = FrameStats {
            quads: self.upload.quads.len(),
            texts: self.translator.buffers().texts().len() as u32,
            regions: layers.layers().iter().map(|l| l.regions.len).sum(),
            layers: layers.layers().len() as u32,
            draw_calls: 0,
            cached_texts: self.translator.cache().len() as u32,
            skipped_quads: classifier.skipped_quads(),
            dropped_texts: classifier.dropped_texts(),
            fps: smooth_fps(self.stats.fps, dt),
        };

        self.prepared = true;
        Ok(())
    }

    /// Records the prepared frame into `target`.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) -> Result<(), RenderError> {
        if !self.prepared {
            return Err(RenderError::NotPrepared);
        }

        let stage = DrawStage {
            quads: &self.quads,
            text: &self.text,
            buffers: &self.upload,
            surface_size: ctx.surface_size,
            clear_color: self.config.clear_color,
        };
        self.stats.draw_calls = stage.draw(target, self.translator.layers());
        Ok(())
    }

    /// Releases all cached text handles. The engine stays usable.
    pub fn shutdown(&mut self) {
        log::debug!("render engine shutdown ({} cached text entries)", self.translator.cache().len());
        self.translator.shutdown();
        self.prepared = false;
    }
}

/// Exponential moving average of the instantaneous frame rate.
fn smooth_fps(previous: f32, dt: f32) -> f32 {
    if !(dt.is_finite() && dt > 0.0) {
        return previous;
    }
    let instant = 1.0 / dt;
    if previous <= 0.0 { instant } else { previous * 0.9 + instant * 0.1 }
}
