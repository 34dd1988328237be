use super::{ScissorRegion, Span};

/// An independently composited group of primitives.
///
/// `regions` is a span into the accumulator's region list; the union of the
/// regions' spans equals the layer's own spans.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Layer {
    pub quads: Span,
    pub texts: Span,
    pub text_vertices: Span,
    pub text_indices: Span,
    pub regions: Span,
}

/// Collects scissor regions into ordered layers for one frame.
///
/// Today the classifier opens exactly one layer per frame. A z-ordered
/// extension only needs to call [`begin_layer`](Self::begin_layer) again when
/// the key changes; regions already carry absolute offsets.
#[derive(Debug, Default)]
pub struct LayerAccumulator {
    layers: Vec<Layer>,
    regions: Vec<ScissorRegion>,
    open: Option<Layer>,
}

impl LayerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops last frame's layers and regions. Keeps capacity.
    pub fn reset(&mut self) {
        self.layers.clear();
        self.regions.clear();
        self.open = None;
    }

    /// Opens a layer whose spans start at `at`'s offsets. Closes the
    /// previously open layer, if any.
    pub fn begin_layer(&mut self, at: &ScissorRegion) {
        self.close();
        self.open = Some(Layer {
            quads: at.quads.after(),
            texts: at.texts.after(),
            text_vertices: at.text_vertices.after(),
            text_indices: at.text_indices.after(),
            regions: Span::empty_at(self.regions.len() as u32),
        });
    }

    /// Appends a closed, non-empty region to the open layer.
    pub fn push_region(&mut self, region: ScissorRegion) {
        debug_assert!(!region.is_empty(), "empty scissor regions are dropped by the tracker");

        let layer = self.open.get_or_insert_with(|| Layer {
            quads: Span::empty_at(region.quads.start),
            texts: Span::empty_at(region.texts.start),
            text_vertices: Span::empty_at(region.text_vertices.start),
            text_indices: Span::empty_at(region.text_indices.start),
            regions: Span::empty_at(self.regions.len() as u32),
        });
        debug_assert_eq!(layer.quads.end(), region.quads.start);
        debug_assert_eq!(layer.texts.end(), region.texts.start);

        layer.quads.grow(region.quads.len);
        layer.texts.grow(region.texts.len);
        layer.text_vertices.grow(region.text_vertices.len);
        layer.text_indices.grow(region.text_indices.len);
        layer.regions.grow(1);
        self.regions.push(region);
    }

    /// Closes the open layer and returns it.
    pub fn finish(&mut self) -> Layer {
        let layer = self.open.take().unwrap_or_else(|| Layer {
            regions: Span::empty_at(self.regions.len() as u32),
            ..Layer::default()
        });
        self.layers.push(layer);
        layer
    }

    /// Layers closed this frame, in draw order.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Regions of `layer`, in draw order.
    #[inline]
    pub fn regions(&self, layer: &Layer) -> &[ScissorRegion] {
        &self.regions[layer.regions.usize_range()]
    }

    fn close(&mut self) {
        if let Some(layer) = self.open.take() {
            self.layers.push(layer);
        }
    }
}
