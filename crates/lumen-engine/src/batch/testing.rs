//! Test double for [`TextShaper`].

use crate::text::{FontId, GlyphVertex, TextError, TextGeometry, TextHandle, TextShaper};

struct Shaped {
    vertices: Vec<GlyphVertex>,
    indices: Vec<u32>,
}

/// Shaper that emits one unit quad per non-space char and counts calls.
#[derive(Default)]
pub(crate) struct RecordingShaper {
    slots: Vec<Option<Shaped>>,
    fail_on: Option<String>,
    pub creates: usize,
    pub set_texts: usize,
    pub releases: usize,
}

impl RecordingShaper {
    /// Any `create`/`set_text` whose text equals `text` fails.
    pub fn failing_on(text: &str) -> Self {
        Self { fail_on: Some(text.to_owned()), ..Self::default() }
    }

    fn shape(&self, text: &str) -> Result<Shaped, TextError> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(TextError::Shaping(format!("refusing {text:?}")));
        }
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for (i, _) in text.chars().filter(|c| !c.is_whitespace()).enumerate() {
            let x = i as f32;
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&[
                GlyphVertex { pos: [x, 0.0], uv: [0.0, 0.0] },
                GlyphVertex { pos: [x + 1.0, 0.0], uv: [1.0, 0.0] },
                GlyphVertex { pos: [x + 1.0, 1.0], uv: [1.0, 1.0] },
                GlyphVertex { pos: [x, 1.0], uv: [0.0, 1.0] },
            ]);
            indices.extend([0, 1, 2, 0, 2, 3].map(|k| base + k));
        }
        Ok(Shaped { vertices, indices })
    }
}

impl TextShaper for RecordingShaper {
    fn create(&mut self, _font: FontId, _size: f32, text: &str) -> Result<TextHandle, TextError> {
        self.creates += 1;
        let shaped = self.shape(text)?;
        self.slots.push(Some(shaped));
        Ok(TextHandle(self.slots.len() as u32 - 1))
    }

    fn set_text(&mut self, handle: TextHandle, text: &str) -> Result<(), TextError> {
        self.set_texts += 1;
        let shaped = self.shape(text)?;
        let Some(slot) = self.slots.get_mut(handle.0 as usize).filter(|s| s.is_some()) else {
            return Err(TextError::UnknownHandle(handle));
        };
        *slot = Some(shaped);
        Ok(())
    }

    fn geometry(&self, handle: TextHandle) -> Option<TextGeometry<'_>> {
        let shaped = self.slots.get(handle.0 as usize)?.as_ref()?;
        Some(TextGeometry { vertices: &shaped.vertices, indices: &shaped.indices })
    }

    fn release(&mut self, handle: TextHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
            if slot.take().is_some() {
                self.releases += 1;
            }
        }
    }
}
