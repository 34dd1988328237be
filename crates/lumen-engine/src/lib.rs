//! Lumen engine crate.
//!
//! Turns a per-frame stream of UI draw commands into ordered,
//! scissor-correct wgpu draw calls, reusing shaped text across frames.
//!
//! - [`scene`]: the command stream a layout pass records
//! - [`batch`]: CPU-side translation into spans, regions and layers
//! - [`text`]: fonts, the shaper seam and the shaped-text cache
//! - [`render`]: upload and draw on the GPU
//! - [`device`], [`window`], [`core`]: platform + GPU runtime

pub mod batch;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod window;
