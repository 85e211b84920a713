use crate::coords::PixelSize;

/// Depth comparison the next clear and the model draws run under.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DepthTest {
    #[default]
    Disabled,
    /// Pass fragments at or in front of the stored depth.
    LessEqual,
}

/// Color blending for model draws.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Opaque,
    /// Straight-alpha source-over: src factor `src.a`, dst factor
    /// `1 - src.a`. What layered character art expects.
    AlphaOver,
}

/// Per-frame command surface the stage drives.
///
/// The command set covers only what session orchestration needs: the
/// state re-asserted at the top of every frame, the clear, and the
/// present. Model draw commands go straight from the model manager to
/// the backend type.
pub trait RenderContext {
    /// Whether the context has been lost. Loss is asynchronous, so
    /// sessions re-check every frame; a lost context stays lost until
    /// the host rebuilds the session.
    fn is_lost(&self) -> bool;

    /// Matches the rasterized area to the drawable's buffer size.
    fn set_viewport(&mut self, size: PixelSize);

    fn set_depth_test(&mut self, depth: DepthTest);

    /// Clears color and depth together. `color` is straight RGBA;
    /// `depth` is the value the depth buffer resets to.
    fn clear(&mut self, color: [f32; 4], depth: f32);

    fn set_blend(&mut self, blend: BlendMode);

    /// Ends the frame: submit and present on backends with explicit
    /// presentation, no-op elsewhere. Safe to call when no frame was
    /// started.
    fn finish_frame(&mut self);
}

/// Owns at most one rendering context bound to one drawable.
///
/// One acquisition per manager: retrying a failed drawable means
/// building a fresh manager. A manager without a context reports lost,
/// which the session update path treats the same as real loss.
pub struct ContextManager<C> {
    context: Option<C>,
}

impl<C: RenderContext> ContextManager<C> {
    pub fn new() -> Self {
        Self { context: None }
    }

    /// Installs the context produced by `acquire`. On failure the
    /// manager stays empty and the error goes back to the caller.
    pub fn initialize<E>(&mut self, acquire: impl FnOnce() -> Result<C, E>) -> Result<(), E> {
        debug_assert!(self.context.is_none(), "context already acquired");
        self.context = Some(acquire()?);
        Ok(())
    }

    pub fn get(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    /// Missing or lost.
    pub fn is_lost(&self) -> bool {
        self.context.as_ref().map_or(true, C::is_lost)
    }

    /// Drops the owned context, if any.
    pub fn release(&mut self) {
        self.context = None;
    }
}

impl<C: RenderContext> Default for ContextManager<C> {
    fn default() -> Self {
        Self::new()
    }
}
