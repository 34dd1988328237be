//! GPU rendering subsystem.
//!
//! [`RenderEngine`] consumes the batches produced by [`crate::batch`] and
//! issues GPU commands via wgpu:
//! - `upload`: grow-only instance/vertex/index buffers, written once per frame
//! - `quad` / `text`: pipelines (lazy, rebuilt on surface format change)
//! - `draw`: one pass per layer, one draw per primitive type per region
//!
//! Convention:
//! - batch data is in physical pixels (top-left origin, +Y down).
//! - vertex shaders convert to NDC using a viewport uniform holding the
//!   physical surface size.

mod common;
mod ctx;
mod draw;
mod engine;
mod error;
mod quad;
mod text;
mod upload;

pub use common::clip_to_scissor;
pub use ctx::{RenderCtx, RenderTarget};
pub use engine::{EngineConfig, FrameStats, RenderEngine};
pub use error::RenderError;
