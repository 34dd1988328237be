use crate::coords::Rect;

/// Opens a clip region; matched by a later `RenderCommand::ScissorEnd`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScissorCmd {
    /// Clip bounds in logical pixels.
    pub bounds: Rect,
}

impl ScissorCmd {
    #[inline]
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }
}
