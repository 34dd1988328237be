//! Text subsystem.
//!
//! - [`FontSystem`] owns parsed fonts.
//! - [`TextShaper`] is the seam between the batch engine and glyph shaping:
//!   it hands out persistent [`TextHandle`]s whose geometry is regenerated only
//!   when their string changes.
//! - [`FontdueShaper`] is the production shaper (fontdue layout + a CPU glyph
//!   atlas uploaded by the renderer).
//! - [`TextCache`] maps stable element ids to handles across frames.

mod atlas;
mod cache;
mod font_system;
mod fontdue_shaper;
mod shaper;

pub use atlas::{AtlasSlot, DirtyRows, GlyphAtlas, ATLAS_SIZE};
pub use cache::TextCache;
pub use font_system::{FontId, FontLoadError, FontSystem};
pub use fontdue_shaper::FontdueShaper;
pub use shaper::{GlyphVertex, TextError, TextGeometry, TextHandle, TextShaper};
