//! Coordinate and geometry types shared by the command stream and renderers.
//!
//! Two spaces are in play:
//! - logical pixels (DPI-independent), used by commands coming from layout
//! - physical pixels, used by batches, scissor rects and shaders
//!
//! Both use a top-left origin with +X right and +Y down. Conversion happens
//! once, in the classifier, via [`Rect::to_physical`].

mod corner_radii;
mod rect;
mod vec2;
mod viewport;

pub use corner_radii::CornerRadii;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
