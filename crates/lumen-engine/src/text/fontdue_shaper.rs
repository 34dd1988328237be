use std::collections::HashMap;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use super::atlas::{AtlasSlot, GlyphAtlas, ATLAS_SIZE};
use super::shaper::{GlyphVertex, TextError, TextGeometry, TextHandle, TextShaper};
use super::{FontId, FontSystem};

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

struct ShapedText {
    font: FontId,
    size: f32,
    text: String,
    vertices: Vec<GlyphVertex>,
    indices: Vec<u32>,
}

/// [`TextShaper`] backed by fontdue.
///
/// Each handle stores one quad (4 vertices, 6 indices) per visible glyph,
/// positioned relative to the text origin with `+Y` down. Glyph bitmaps are
/// rasterized once per `GlyphRasterConfig` (font, glyph, pixel size) and
/// packed into a shared [`GlyphAtlas`].
///
/// When the atlas fills up it is cleared and every live handle is reshaped,
/// so glyphs of evicted text stop taking space. If the live glyphs alone do
/// not fit, the overflow is dropped (warned once) and no further rebuild is
/// tried until a handle is released.
///
/// Handle slots are recycled through a free list, so handle values stay small
/// and `geometry` is an index lookup.
pub struct FontdueShaper {
    fonts: FontSystem,
    atlas: GlyphAtlas,
    glyphs: HashMap<GlyphRasterConfig, AtlasSlot>,
    slots: Vec<Option<ShapedText>>,
    free: Vec<u32>,
    // reusable fontdue layout
    layout: Layout<()>,
    saturated: bool,
    warned_saturated: bool,
}

impl FontdueShaper {
    pub fn new(fonts: FontSystem) -> Self {
        Self::with_atlas_size(fonts, ATLAS_SIZE)
    }

    pub fn with_atlas_size(fonts: FontSystem, atlas_size: u32) -> Self {
        Self {
            fonts,
            atlas: GlyphAtlas::new(atlas_size),
            glyphs: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            saturated: false,
            warned_saturated: false,
        }
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    #[inline]
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    #[inline]
    pub fn atlas_mut(&mut self) -> &mut GlyphAtlas {
        &mut self.atlas
    }

    /// Number of live handles.
    pub fn live_handles(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Clears a full atlas and reshapes every live handle into it.
    fn recover_atlas(&mut self) {
        if !self.atlas.is_full() || self.saturated {
            return;
        }
        log::debug!("glyph atlas full; rebuilding for {} live handles", self.live_handles());

        self.atlas.clear();
        self.glyphs.clear();
        for i in 0..self.slots.len() {
            let Some(mut shaped) = self.slots[i].take() else {
                continue;
            };
            let ShapedText { font, size, ref text, ref mut vertices, ref mut indices } = shaped;
            if self.shape_into(font, size, text, vertices, indices).is_err() {
                vertices.clear();
                indices.clear();
            }
            self.slots[i] = Some(shaped);
        }

        if self.atlas.is_full() {
            self.saturated = true;
            if !self.warned_saturated {
                log::warn!(
                    "glyph atlas ({0}×{0}) cannot hold every on-screen glyph; some will not be rendered",
                    self.atlas.size()
                );
                self.warned_saturated = true;
            }
        }
    }

    fn shape_into(
        &mut self,
        font_id: FontId,
        size: f32,
        text: &str,
        vertices: &mut Vec<GlyphVertex>,
        indices: &mut Vec<u32>,
    ) -> Result<(), TextError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(TextError::InvalidSize(size));
        }
        let font = self.fonts.get(font_id).ok_or(TextError::UnknownFont(font_id))?;

        self.layout.reset(&LayoutSettings::default());
        self.layout.append(&[font], &TextStyle::new(text, size, 0));

        vertices.clear();
        indices.clear();

        for g in self.layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }

            // Rasterize + pack on first encounter.
            let slot = match self.glyphs.get(&g.key) {
                Some(slot) => *slot,
                None => {
                    let (metrics, bitmap) = font.rasterize_config(g.key);
                    let Some(slot) = self.atlas.allocate(
                        metrics.width as u32,
                        metrics.height as u32,
                        &bitmap,
                    ) else {
                        continue;
                    };
                    self.glyphs.insert(g.key, slot);
                    slot
                }
            };

            let (x0, y0) = (g.x, g.y);
            let (x1, y1) = (g.x + g.width as f32, g.y + g.height as f32);
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&[
                GlyphVertex { pos: [x0, y0], uv: slot.uv_min },
                GlyphVertex { pos: [x1, y0], uv: [slot.uv_max[0], slot.uv_min[1]] },
                GlyphVertex { pos: [x1, y1], uv: slot.uv_max },
                GlyphVertex { pos: [x0, y1], uv: [slot.uv_min[0], slot.uv_max[1]] },
            ]);
            indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        }

        Ok(())
    }
}

impl TextShaper for FontdueShaper {
    fn create(&mut self, font: FontId, size: f32, text: &str) -> Result<TextHandle, TextError> {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        self.shape_into(font, size, text, &mut vertices, &mut indices)?;

        let shaped = ShapedText { font, size, text: text.to_owned(), vertices, indices };
        let handle = match self.free.pop() {
            Some(i) => {
                self.slots[i as usize] = Some(shaped);
                TextHandle(i)
            }
            None => {
                self.slots.push(Some(shaped));
                TextHandle(self.slots.len() as u32 - 1)
            }
        };
        self.recover_atlas();
        Ok(handle)
    }

    fn set_text(&mut self, handle: TextHandle, text: &str) -> Result<(), TextError> {
        let Some(shaped) = self.slots.get_mut(handle.0 as usize).and_then(Option::take) else {
            return Err(TextError::UnknownHandle(handle));
        };
        let ShapedText { font, size, text: mut stored, mut vertices, mut indices } = shaped;

        // Reuse the handle's buffers; on failure the handle keeps empty geometry.
        let result = self.shape_into(font, size, text, &mut vertices, &mut indices);
        if result.is_err() {
            vertices.clear();
            indices.clear();
        }
        stored.clear();
        stored.push_str(text);
        self.slots[handle.0 as usize] = Some(ShapedText { font, size, text: stored, vertices, indices });
        self.recover_atlas();
        result
    }

    fn geometry(&self, handle: TextHandle) -> Option<TextGeometry<'_>> {
        let shaped = self.slots.get(handle.0 as usize)?.as_ref()?;
        Some(TextGeometry { vertices: &shaped.vertices, indices: &shaped.indices })
    }

    fn release(&mut self, handle: TextHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
            if slot.take().is_some() {
                self.free.push(handle.0);
                self.saturated = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shaping proper needs a real font file; these cover the failure paths
    // and handle bookkeeping that do not.

    #[test]
    fn unknown_font_fails_to_create() {
        let mut shaper = FontdueShaper::with_atlas_size(FontSystem::new(), 64);
        let err = shaper.create(FontId(0), 12.0, "hi").unwrap_err();
        assert_eq!(err, TextError::UnknownFont(FontId(0)));
        assert_eq!(shaper.live_handles(), 0);
    }

    #[test]
    fn invalid_size_is_rejected_before_font_lookup() {
        let mut shaper = FontdueShaper::with_atlas_size(FontSystem::new(), 64);
        assert_eq!(
            shaper.create(FontId(0), 0.0, "hi").unwrap_err(),
            TextError::InvalidSize(0.0)
        );
    }

    #[test]
    fn set_text_on_unknown_handle_fails() {
        let mut shaper = FontdueShaper::with_atlas_size(FontSystem::new(), 64);
        assert_eq!(
            shaper.set_text(TextHandle(7), "x").unwrap_err(),
            TextError::UnknownHandle(TextHandle(7))
        );
        assert!(shaper.geometry(TextHandle(7)).is_none());
    }

    fn fill(atlas: &mut GlyphAtlas) {
        while atlas.allocate(8, 8, &[1; 64]).is_some() {}
    }

    #[test]
    fn full_atlas_is_rebuilt_from_live_handles() {
        let mut shaper = FontdueShaper::with_atlas_size(FontSystem::new(), 64);
        // A live handle whose font has gone away reshapes to nothing.
        shaper.slots.push(Some(ShapedText {
            font: FontId(4),
            size: 12.0,
            text: "stale".to_owned(),
            vertices: vec![GlyphVertex::default(); 4],
            indices: QUAD_INDICES.to_vec(),
        }));
        fill(shaper.atlas_mut());
        shaper.atlas_mut().take_dirty();

        shaper.recover_atlas();

        assert!(!shaper.atlas().is_full());
        assert!(shaper.glyphs.is_empty());
        assert_eq!(shaper.atlas_mut().take_dirty().map(|d| d.height), Some(64));
        let geometry = shaper.geometry(TextHandle(0)).unwrap();
        assert_eq!(geometry.vertex_count(), 0);
        assert_eq!(geometry.index_count(), 0);
    }

    #[test]
    fn saturated_atlas_waits_for_a_release() {
        let mut shaper = FontdueShaper::with_atlas_size(FontSystem::new(), 64);
        shaper.slots.push(Some(ShapedText {
            font: FontId(4),
            size: 12.0,
            text: "x".to_owned(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }));
        shaper.saturated = true;
        fill(shaper.atlas_mut());

        shaper.recover_atlas();
        assert!(shaper.atlas().is_full());

        shaper.release(TextHandle(0));
        shaper.recover_atlas();
        assert!(!shaper.atlas().is_full());
    }

    #[test]
    fn release_of_unknown_handle_is_ignored() {
        let mut shaper = FontdueShaper::with_atlas_size(FontSystem::new(), 64);
        shaper.release(TextHandle(3));
        assert_eq!(shaper.live_handles(), 0);
    }
}
