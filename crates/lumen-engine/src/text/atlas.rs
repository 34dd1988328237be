// ── atlas constants ────────────────────────────────────────────────────────

/// Default atlas edge length in texels (R8, single channel).
pub const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // texels between glyphs

/// Normalized atlas coordinates of one rasterized glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasSlot {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Band of atlas rows modified since the last upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DirtyRows {
    pub y: u32,
    pub height: u32,
}

/// CPU-side glyph atlas with shelf packing.
///
/// Glyph bitmaps are written into `pixels` as they are rasterized; the
/// renderer uploads only the rows touched since the previous
/// [`take_dirty`](Self::take_dirty). Once full, further glyphs are refused
/// until [`clear`](Self::clear).
pub struct GlyphAtlas {
    size: u32,
    pixels: Vec<u8>,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
    dirty: Option<(u32, u32)>, // [y0, y1)
}

impl GlyphAtlas {
    pub fn new(size: u32) -> Self {
        let size = size.max(1);
        Self {
            size,
            pixels: vec![0; (size * size) as usize],
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
            dirty: None,
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Copies a `w × h` coverage bitmap into the atlas.
    ///
    /// Returns `None` when the bitmap does not fit.
    pub fn allocate(&mut self, w: u32, h: u32, bitmap: &[u8]) -> Option<AtlasSlot> {
        if self.full || w == 0 || h == 0 || bitmap.len() < (w * h) as usize {
            return None;
        }
        if w + 2 * GLYPH_PADDING > self.size {
            log::warn!("glyph {w}×{h} is wider than the {0}×{0} atlas", self.size);
            return None;
        }

        // Advance to a new shelf when the glyph doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size {
            log::debug!("glyph atlas full ({0}×{0})", self.size);
            self.full = true;
            return None;
        }

        let (gx, gy) = (self.cursor_x, self.cursor_y);
        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((gy + row) * self.size + gx) as usize;
            self.pixels[dst..dst + w as usize].copy_from_slice(&bitmap[src..src + w as usize]);
        }

        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        self.dirty = Some(match self.dirty {
            Some((y0, y1)) => (y0.min(gy), y1.max(gy + h)),
            None => (gy, gy + h),
        });

        let s = self.size as f32;
        Some(AtlasSlot {
            uv_min: [gx as f32 / s, gy as f32 / s],
            uv_max: [(gx + w) as f32 / s, (gy + h) as f32 / s],
        })
    }

    /// Drops every glyph and starts packing from the top again. The whole
    /// texture is marked dirty so stale texels are overwritten on upload.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.cursor_x = GLYPH_PADDING;
        self.cursor_y = GLYPH_PADDING;
        self.row_height = 0;
        self.full = false;
        self.mark_all_dirty();
    }

    /// Returns and clears the rows modified since the last call.
    #[inline]
    pub fn take_dirty(&mut self) -> Option<DirtyRows> {
        self.dirty
            .take()
            .map(|(y0, y1)| DirtyRows { y: y0, height: y1 - y0 })
    }

    /// Marks the whole atlas dirty (e.g. after the GPU texture was recreated).
    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.dirty = Some((0, self.size));
    }

    /// Full-width texel rows `[y, y + height)`.
    #[inline]
    pub fn rows(&self, rows: DirtyRows) -> &[u8] {
        let start = (rows.y * self.size) as usize;
        let end = ((rows.y + rows.height) * self.size) as usize;
        &self.pixels[start..end]
    }
}
