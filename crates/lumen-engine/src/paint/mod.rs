//! Paint model shared between the command stream and renderers.
//!
//! Only solid colors exist today: every quad and text vertex carries one
//! premultiplied RGBA color.

pub mod color;

pub use color::Color;
