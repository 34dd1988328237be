//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and applications
//! that feed the render engine.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
