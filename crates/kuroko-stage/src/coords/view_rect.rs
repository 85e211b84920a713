/// Orthographic view bounds in world space: the logical rectangle the
/// drawable maps onto.
///
/// Invariant: `left < right` and `bottom < top`. Keeping the rectangle's
/// width/height ratio equal to the surface's pixel aspect is the caller's
/// responsibility; [`ViewRect::from_aspect`] is the canonical way to get
/// a matching rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewRect {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl ViewRect {
    /// The unit view: a square surface maps to (-1, 1, -1, 1).
    pub const UNIT: ViewRect = ViewRect::new(-1.0, 1.0, -1.0, 1.0);

    #[inline]
    pub const fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// View bounds for a surface with the given width/height ratio: the
    /// vertical half-extent is fixed at 1 and the horizontal half-extent
    /// scales with the aspect.
    #[inline]
    pub fn from_aspect(aspect: f32) -> Self {
        Self::new(-aspect, aspect, -1.0, 1.0)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.top - self.bottom
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width() / self.height()
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.left < self.right && self.bottom < self.top
    }
}

impl Default for ViewRect {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── from_aspect ───────────────────────────────────────────────────────

    #[test]
    fn from_aspect_square() {
        assert_eq!(ViewRect::from_aspect(1.0), ViewRect::UNIT);
    }

    #[test]
    fn from_aspect_wide_surface() {
        // 800x450 => aspect 16/9.
        let r = ViewRect::from_aspect(800.0 / 450.0);
        assert!((r.left - (-1.777_777_8)).abs() < 1e-5);
        assert!((r.right - 1.777_777_8).abs() < 1e-5);
        assert_eq!(r.bottom, -1.0);
        assert_eq!(r.top, 1.0);
    }

    #[test]
    fn from_aspect_tall_surface() {
        let r = ViewRect::from_aspect(0.5);
        assert_eq!(r.left, -0.5);
        assert_eq!(r.right, 0.5);
        assert_eq!(r.height(), 2.0);
    }

    // ── measurements ──────────────────────────────────────────────────────

    #[test]
    fn width_height_aspect() {
        let r = ViewRect::new(-2.0, 2.0, -1.0, 1.0);
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 2.0);
        assert_eq!(r.aspect(), 2.0);
    }

    // ── is_valid ──────────────────────────────────────────────────────────

    #[test]
    fn valid_when_ordered() {
        assert!(ViewRect::UNIT.is_valid());
    }

    #[test]
    fn invalid_when_degenerate_or_flipped() {
        assert!(!ViewRect::new(1.0, 1.0, -1.0, 1.0).is_valid());
        assert!(!ViewRect::new(1.0, -1.0, -1.0, 1.0).is_valid());
        assert!(!ViewRect::new(-1.0, 1.0, 1.0, -1.0).is_valid());
    }
}
