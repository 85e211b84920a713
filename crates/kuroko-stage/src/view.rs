//! Projection state and device-to-view mapping for one surface.

use crate::coords::{PixelSize, ViewRect};
use crate::device::RenderContext;
use crate::model::ModelManager;

/// Owns one surface's view bounds and maps device pixels into them.
///
/// The active rectangle and the maximum rectangle (the bound a host
/// zoom/pan would clamp to) start out equal; [`StageView::initialize`]
/// keeps both in lockstep with the surface's pixel aspect. Callers using
/// the raw setters take over that consistency themselves.
pub struct StageView {
    rect: ViewRect,
    max_rect: ViewRect,
    surface: PixelSize,
}

impl StageView {
    pub fn new() -> Self {
        Self {
            rect: ViewRect::UNIT,
            max_rect: ViewRect::UNIT,
            surface: PixelSize::new(1, 1),
        }
    }

    /// Resets the projection from surface pixel dimensions. Idempotent:
    /// the same size always produces the same rectangles, with no state
    /// carried over from earlier calls.
    pub fn initialize(&mut self, surface: PixelSize) {
        let surface = surface.clamped_to_min();
        self.surface = surface;

        let rect = ViewRect::from_aspect(surface.aspect());
        self.rect = rect;
        self.max_rect = rect;
    }

    pub fn view_rect(&self) -> ViewRect {
        self.rect
    }

    pub fn max_view_rect(&self) -> ViewRect {
        self.max_rect
    }

    pub fn surface_size(&self) -> PixelSize {
        self.surface
    }

    pub fn set_view_rect(&mut self, rect: ViewRect) {
        debug_assert!(rect.is_valid());
        self.rect = rect;
    }

    pub fn set_max_view_rect(&mut self, rect: ViewRect) {
        debug_assert!(rect.is_valid());
        self.max_rect = rect;
    }

    /// Maps a device-pixel X coordinate into view space.
    pub fn transform_view_x(&self, px: f32) -> f32 {
        self.rect.left + (px / self.surface.width as f32) * self.rect.width()
    }

    /// Maps a device-pixel Y coordinate into view space. Device +Y runs
    /// down while view +Y runs up, so the axis flips here.
    pub fn transform_view_y(&self, py: f32) -> f32 {
        self.rect.top + (py / self.surface.height as f32) * (self.rect.bottom - self.rect.top)
    }

    /// Delegates the model draw. The view hands over no camera state;
    /// model renderers own their own uniforms.
    pub fn render<C, M>(&self, ctx: &mut C, models: &mut M)
    where
        C: RenderContext,
        M: ModelManager<C>,
    {
        models.render_models(ctx);
    }
}

impl Default for StageView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_for(width: u32, height: u32) -> StageView {
        let mut view = StageView::new();
        view.initialize(PixelSize::new(width, height));
        view
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn initialize_derives_bounds_from_aspect() {
        let view = view_for(800, 450);
        let rect = view.view_rect();
        assert!((rect.left - (-1.777_777_8)).abs() < 1e-5);
        assert!((rect.right - 1.777_777_8).abs() < 1e-5);
        assert_eq!(rect.bottom, -1.0);
        assert_eq!(rect.top, 1.0);
        assert_eq!(view.max_view_rect(), rect);
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut view = view_for(640, 480);
        let first = view.view_rect();
        view.initialize(PixelSize::new(640, 480));
        assert_eq!(view.view_rect(), first);
        assert_eq!(view.max_view_rect(), first);
    }

    #[test]
    fn initialize_resets_a_custom_rect() {
        let mut view = view_for(640, 480);
        view.set_view_rect(ViewRect::new(-0.5, 0.5, -0.5, 0.5));
        view.initialize(PixelSize::new(640, 480));
        assert_eq!(view.view_rect(), ViewRect::from_aspect(640.0 / 480.0));
    }

    #[test]
    fn initialize_clamps_empty_sizes() {
        let view = view_for(0, 0);
        assert_eq!(view.surface_size(), PixelSize::new(1, 1));
        assert_eq!(view.view_rect(), ViewRect::UNIT);
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn center_pixel_maps_to_world_origin() {
        let view = view_for(800, 450);
        assert!(view.transform_view_x(400.0).abs() < 1e-6);
        assert!(view.transform_view_y(225.0).abs() < 1e-6);
    }

    #[test]
    fn edges_map_to_rect_bounds() {
        let view = view_for(800, 450);
        let rect = view.view_rect();
        assert_eq!(view.transform_view_x(0.0), rect.left);
        assert_eq!(view.transform_view_x(800.0), rect.right);
        // Device row 0 is the top of the surface.
        assert_eq!(view.transform_view_y(0.0), rect.top);
        assert_eq!(view.transform_view_y(450.0), rect.bottom);
    }

    #[test]
    fn transforms_follow_a_custom_rect() {
        let mut view = view_for(200, 100);
        view.set_view_rect(ViewRect::new(0.0, 4.0, 0.0, 2.0));
        assert_eq!(view.transform_view_x(50.0), 1.0);
        assert_eq!(view.transform_view_y(50.0), 1.0);
        assert_eq!(view.transform_view_y(0.0), 2.0);
    }
}
