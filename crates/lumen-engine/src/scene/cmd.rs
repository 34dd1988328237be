use crate::scene::shapes::border::BorderCmd;
use crate::scene::shapes::rect::RectangleCmd;
use crate::scene::shapes::scissor::ScissorCmd;
use crate::scene::shapes::text::TextCmd;

/// One entry of the per-frame command stream.
///
/// Extending the stream:
/// - add a payload module under `scene::shapes::*`
/// - add a new variant here
/// - handle it in `batch::Classifier`; until then it falls into the no-op arm
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Rectangle(RectangleCmd),
    Border(BorderCmd),
    Text(TextCmd),
    ScissorStart(ScissorCmd),
    ScissorEnd,
    /// Command kinds this renderer does not draw (images, custom elements).
    Other,
}
