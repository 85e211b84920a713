//! Host-platform seams.
//!
//! Everything environment-specific (drawable discovery and geometry,
//! context acquisition, pointer-listener registration, frame scheduling)
//! reaches the stage through these traits. [`crate::window`] carries the
//! winit-backed production implementation; tests substitute fakes.

use std::sync::Arc;

use anyhow::Result;

use crate::coords::{PixelSize, Vec2};
use crate::device::{ContextError, RenderContext};

/// One rendering surface as the host sees it.
///
/// All sizes are device pixels. Geometry setters take `&self` because
/// drawables are shared (`Arc`) between the session that runs on them
/// and the platform that created them; implementations use interior
/// mutability or host handles that are `&self` anyway.
pub trait DrawableSurface {
    /// The layout box the host currently gives this drawable.
    fn layout_size(&self) -> PixelSize;

    /// Current size of the backing buffer.
    fn buffer_size(&self) -> PixelSize;

    /// Resizes the backing buffer.
    fn set_buffer_size(&self, size: PixelSize);

    /// Pins the displayed size so the host never upscales the buffer.
    fn set_display_size(&self, size: PixelSize);

    /// Top-left corner of the drawable in host coordinates.
    fn origin(&self) -> Vec2;

    /// Device pixels per host coordinate unit.
    fn scale_factor(&self) -> f32;
}

/// The host environment seen from the coordinator: yields drawables,
/// builds rendering contexts for them, and owns listener registration.
pub trait StagePlatform {
    type Drawable: DrawableSurface;
    type Context: RenderContext;

    /// The drawables to run sessions on, in order; index 0 becomes the
    /// primary interactive surface. Yielding none is a setup error.
    fn drawables(&mut self) -> Result<Vec<Arc<Self::Drawable>>>;

    /// Builds a rendering context for one drawable.
    fn acquire_context(
        &mut self,
        drawable: &Arc<Self::Drawable>,
    ) -> Result<Self::Context, ContextError>;

    /// Registers pointer listeners with the host. Hosts whose event
    /// delivery is inherent (an owned event loop) keep the default
    /// no-op.
    fn attach_input(&mut self) {}

    /// Removes whatever `attach_input` registered.
    fn detach_input(&mut self) {}
}

/// Animation-frame scheduling seam.
pub trait TickScheduler {
    /// Token identifying one scheduled tick.
    type Handle;

    /// Schedules one tick and returns its cancellation token.
    fn request(&mut self) -> Self::Handle;

    /// Retracts a scheduled tick. Schedulers that cannot retract ignore
    /// the token; the coordinator's running flag already gates the tick
    /// body.
    fn cancel(&mut self, handle: Self::Handle);
}
