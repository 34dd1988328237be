/// Per-corner radii for rounded quads.
///
/// Corners follow CSS order: top-left, top-right, bottom-right, bottom-left.
/// This order is also the packing order of `QuadInstance::radii` and must match
/// the quad shader.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self::new(r, r, r, r)
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    /// Radii in physical pixels, clamped to `[0, min(w, h) / 2]` so opposite
    /// corners never overlap.
    pub fn to_physical(self, scale: f32, width: f32, height: f32) -> [f32; 4] {
        let limit = (width.min(height) * 0.5).max(0.0);
        let fit = |r: f32| {
            let r = r * scale;
            if r.is_finite() { r.clamp(0.0, limit) } else { 0.0 }
        };
        [fit(self.top_left), fit(self.top_right), fit(self.bottom_right), fit(self.bottom_left)]
    }
}
