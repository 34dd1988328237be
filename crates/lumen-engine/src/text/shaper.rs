use bytemuck::{Pod, Zeroable};

use crate::scene::ElementId;

use super::FontId;

/// Persistent shaped-text object owned by a [`TextShaper`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextHandle(pub u32);

/// Failure of a shaping request. Never fatal: the affected text element is
/// skipped for the frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TextError {
    #[error("unknown font {0:?}")]
    UnknownFont(FontId),
    #[error("invalid font size {0}")]
    InvalidSize(f32),
    #[error("unknown text handle {0:?}")]
    UnknownHandle(TextHandle),
    #[error("shaping failed: {0}")]
    Shaping(String),
    #[error("text id {0:?} already drawn this frame")]
    DuplicateId(ElementId),
}

/// One glyph-quad corner, relative to the text origin (physical pixels).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Geometry of one handle. Indices are local to `vertices`.
#[derive(Debug, Copy, Clone)]
pub struct TextGeometry<'a> {
    pub vertices: &'a [GlyphVertex],
    pub indices: &'a [u32],
}

impl TextGeometry<'_> {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Text-shaping collaborator.
///
/// Handles are long-lived: `create` shapes once, `set_text` reshapes in place,
/// and `geometry` is a cheap read of the last result.
pub trait TextShaper {
    fn create(&mut self, font: FontId, size: f32, text: &str) -> Result<TextHandle, TextError>;

    fn set_text(&mut self, handle: TextHandle, text: &str) -> Result<(), TextError>;

    fn geometry(&self, handle: TextHandle) -> Option<TextGeometry<'_>>;

    /// Frees a handle. Unknown handles are ignored.
    fn release(&mut self, handle: TextHandle);
}
