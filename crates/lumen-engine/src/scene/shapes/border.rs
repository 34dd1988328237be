use crate::coords::{CornerRadii, Rect};
use crate::paint::Color;
use crate::scene::{CommandList, RenderCommand};

/// Stroke drawn along the inner edge of `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderCmd {
    /// Bounds in logical pixels.
    pub bounds: Rect,
    pub radii: CornerRadii,
    pub stroke: Color,
    /// Stroke width in logical pixels.
    pub width: f32,
}

impl BorderCmd {
    #[inline]
    pub fn new(bounds: Rect, radii: CornerRadii, stroke: Color, width: f32) -> Self {
        Self { bounds, radii, stroke, width }
    }
}

impl CommandList {
    /// Records a border.
    #[inline]
    pub fn push_border(&mut self, bounds: Rect, radii: CornerRadii, stroke: Color, width: f32) {
        self.push(RenderCommand::Border(BorderCmd::new(bounds, radii, stroke, width)));
    }
}
