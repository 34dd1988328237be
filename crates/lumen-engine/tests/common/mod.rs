use lumen_engine::text::{FontId, GlyphVertex, TextError, TextGeometry, TextHandle, TextShaper};

/// Shaper double: one unit quad per non-whitespace char, with call counters.
#[derive(Default)]
pub struct CountingShaper {
    slots: Vec<Option<(Vec<GlyphVertex>, Vec<u32>)>>,
    pub creates: usize,
    pub set_texts: usize,
    pub releases: usize,
}

fn shape(text: &str) -> (Vec<GlyphVertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for (i, _) in text.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let x = i as f32;
        let base = vertices.len() as u32;
        for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            vertices.push(GlyphVertex { pos: [x + dx, dy], uv: [dx, dy] });
        }
        indices.extend([0, 1, 2, 0, 2, 3].map(|k| base + k));
    }
    (vertices, indices)
}

impl TextShaper for CountingShaper {
    fn create(&mut self, font: FontId, size: f32, text: &str) -> Result<TextHandle, TextError> {
        self.creates += 1;
        if font.index() != 0 {
            return Err(TextError::UnknownFont(font));
        }
        if !(size > 0.0) {
            return Err(TextError::InvalidSize(size));
        }
        self.slots.push(Some(shape(text)));
        Ok(TextHandle(self.slots.len() as u32 - 1))
    }

    fn set_text(&mut self, handle: TextHandle, text: &str) -> Result<(), TextError> {
        self.set_texts += 1;
        match self.slots.get_mut(handle.0 as usize) {
            Some(slot) if slot.is_some() => {
                *slot = Some(shape(text));
                Ok(())
            }
            _ => Err(TextError::UnknownHandle(handle)),
        }
    }

    fn geometry(&self, handle: TextHandle) -> Option<TextGeometry<'_>> {
        let (vertices, indices) = self.slots.get(handle.0 as usize)?.as_ref()?;
        Some(TextGeometry { vertices, indices })
    }

    fn release(&mut self, handle: TextHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
            if slot.take().is_some() {
                self.releases += 1;
            }
        }
    }
}
