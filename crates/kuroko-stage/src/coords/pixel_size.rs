/// Surface dimensions in whole device pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height. Callers guarantee a non-empty size; hosts can
    /// report zero-sized drawables mid-minimize, so sizes are clamped to
    /// at least 1x1 before they reach aspect math.
    #[inline]
    pub fn aspect(self) -> f32 {
        debug_assert!(!self.is_empty());
        self.width as f32 / self.height as f32
    }

    /// Clamps both dimensions to at least one pixel.
    #[inline]
    pub fn clamped_to_min(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}
