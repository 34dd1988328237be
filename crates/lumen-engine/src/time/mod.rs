//! Frame timing.
//!
//! One [`FrameClock`] per window; call `tick()` once per presented frame and
//! pass `FrameTime::dt` to `RenderEngine::prepare`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
