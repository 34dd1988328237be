use crate::coords::{CornerRadii, Rect};
use crate::paint::Color;
use crate::scene::{CommandList, RenderCommand};

/// Filled rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleCmd {
    /// Bounds in logical pixels.
    pub bounds: Rect,
    pub radii: CornerRadii,
    pub fill: Color,
}

impl RectangleCmd {
    #[inline]
    pub fn new(bounds: Rect, radii: CornerRadii, fill: Color) -> Self {
        Self { bounds, radii, fill }
    }
}

impl CommandList {
    /// Records a filled rectangle.
    #[inline]
    pub fn push_rect(&mut self, bounds: Rect, radii: CornerRadii, fill: Color) {
        self.push(RenderCommand::Rectangle(RectangleCmd::new(bounds, radii, fill)));
    }

    /// Records a filled rectangle with square corners.
    #[inline]
    pub fn push_solid_rect(&mut self, bounds: Rect, fill: Color) {
        self.push_rect(bounds, CornerRadii::zero(), fill);
    }
}
