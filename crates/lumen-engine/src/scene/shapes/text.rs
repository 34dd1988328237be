use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{CommandList, ElementId, RenderCommand};
use crate::text::FontId;

/// Text run payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    /// Bounds in logical pixels; glyphs are laid out from the top-left corner.
    pub bounds: Rect,
    pub text: String,
    pub font: FontId,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Stable element id; keys the shaped-text cache.
    pub id: ElementId,
}

impl CommandList {
    /// Records a text run.
    pub fn push_text(
        &mut self,
        id: ElementId,
        bounds: Rect,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
    ) {
        self.push(RenderCommand::Text(TextCmd {
            bounds,
            text: text.into(),
            font,
            size,
            color,
            id,
        }));
    }
}
