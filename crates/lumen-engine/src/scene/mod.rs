//! Command stream types.
//!
//! Responsibilities:
//! - define the renderer-agnostic commands a layout pass emits each frame
//! - provide a frame-scoped recorder ([`CommandList`]) that reuses its storage
//! - keep per-command payloads and push helpers isolated under `scene::shapes`
//!
//! Commands are consumed strictly in recording order; there is no sorting.

mod cmd;
mod id;
mod list;

pub mod shapes;

pub use cmd::RenderCommand;
pub use id::ElementId;
pub use list::CommandList;
pub use shapes::border::BorderCmd;
pub use shapes::rect::RectangleCmd;
pub use shapes::scissor::ScissorCmd;
pub use shapes::text::TextCmd;
