//! Command-to-batch translation.
//!
//! One pass over the frame's [`RenderCommand`](crate::scene::RenderCommand)
//! stream produces:
//! - contiguous instance buffers ([`FrameBuffers`]): quads, text requests and
//!   the assembled text vertices/indices
//! - [`Layer`]s whose [`ScissorRegion`]s are offset/length [`Span`]s into
//!   those buffers, in command order
//!
//! No primitive data is copied per region; the draw stage issues one draw
//! call per primitive type per region straight out of the shared buffers.
//!
//! Everything here is CPU-only and independent of wgpu device state.

mod classify;
mod frame;
mod instance;
mod layer;
mod scissor;
mod span;
mod translator;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{Classifier, TextContext};
pub use frame::FrameBuffers;
pub use instance::{QuadInstance, TextDrawRequest, TextVertex};
pub use layer::{Layer, LayerAccumulator};
pub use scissor::{ScissorRegion, ScissorTracker};
pub use span::Span;
pub use translator::{Translator, TranslatorConfig};
