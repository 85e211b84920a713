use std::sync::Arc;

use crate::config::SizeMode;
use crate::coords::{PixelSize, ViewRect};
use crate::device::{BlendMode, ContextError, ContextManager, DepthTest, RenderContext};
use crate::model::ModelManager;
use crate::platform::{DrawableSurface, StagePlatform};
use crate::view::StageView;

use super::ResizeSignal;

/// Transparent black; the host composites whatever sits behind the
/// drawable.
const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
const CLEAR_DEPTH: f32 = 1.0;

/// Lifecycle of one surface session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Active,
    /// The context is gone; updates skip until the host rebuilds the
    /// session.
    ContextLost,
    Released,
}

/// Everything one drawable needs to render: the context bound to it, the
/// projection, and the pending-resize flag.
pub struct SurfaceSession<D, C> {
    drawable: Arc<D>,
    context: ContextManager<C>,
    view: StageView,
    resize: ResizeSignal,
    size: PixelSize,
    state: SessionState,
}

impl<D, C> SurfaceSession<D, C>
where
    D: DrawableSurface,
    C: RenderContext,
{
    pub fn new(drawable: Arc<D>) -> Self {
        Self {
            drawable,
            context: ContextManager::new(),
            view: StageView::new(),
            resize: ResizeSignal::new(),
            size: PixelSize::zero(),
            state: SessionState::Uninitialized,
        }
    }

    /// Brings the session up on its drawable: acquire the context, size
    /// the buffer per `mode`, enable alpha blending, bind the model
    /// manager's resources, and build the projection.
    ///
    /// On acquisition failure the session reverts to `Uninitialized` and
    /// the error goes to the caller; retrying requires a fresh session.
    pub fn initialize<P, M>(
        &mut self,
        platform: &mut P,
        models: &mut M,
        mode: SizeMode,
    ) -> Result<(), ContextError>
    where
        P: StagePlatform<Drawable = D, Context = C>,
        M: ModelManager<C>,
    {
        self.state = SessionState::Initializing;

        if let Err(err) = self
            .context
            .initialize(|| platform.acquire_context(&self.drawable))
        {
            self.state = SessionState::Uninitialized;
            return Err(err);
        }

        match mode {
            SizeMode::Auto => self.resize_to_fit(),
            SizeMode::Fixed { width, height } => {
                let size = PixelSize::new(width, height).clamped_to_min();
                self.size = size;
                self.drawable.set_buffer_size(size);
            }
        }

        if let Some(ctx) = self.context.get_mut() {
            ctx.set_blend(BlendMode::AlphaOver);
            models.attach_context(ctx);
        }

        self.view.initialize(self.size);
        self.state = SessionState::Active;
        log::info!(
            "surface session active at {}x{}",
            self.size.width,
            self.size.height
        );
        Ok(())
    }

    /// Re-reads the drawable's layout box and refits the buffer and view
    /// bounds to it. No-op when nothing changed, so repeated calls cause
    /// no buffer churn.
    pub fn resize_to_fit(&mut self) {
        let layout = self.drawable.layout_size().clamped_to_min();
        if layout == self.size {
            return;
        }

        self.size = layout;
        self.drawable.set_buffer_size(layout);

        let rect = ViewRect::from_aspect(layout.aspect());
        self.view.set_view_rect(rect);
        self.view.set_max_view_rect(rect);
    }

    /// Applies a pending resize: refit, rebuild the projection, match
    /// the context viewport. Only ever runs on the render turn.
    fn apply_resize(&mut self) {
        self.resize_to_fit();
        self.view.initialize(self.size);
        if let Some(ctx) = self.context.get_mut() {
            ctx.set_viewport(self.size);
        }
    }

    /// Renders one frame.
    ///
    /// A missing or lost context skips everything; loss is re-checked
    /// every frame because it can strike between any two of them. A
    /// raised resize flag applies before drawing. Blend state is
    /// re-asserted each frame because model draw paths may leave
    /// anything bound.
    pub fn update<M>(&mut self, models: &mut M)
    where
        M: ModelManager<C>,
    {
        if self.context.is_lost() {
            if self.state == SessionState::Active {
                self.state = SessionState::ContextLost;
                log::warn!("rendering context lost; suspending session updates");
            }
            return;
        }

        if self.resize.take() {
            self.apply_resize();
        }

        let Some(ctx) = self.context.get_mut() else {
            return;
        };

        ctx.set_depth_test(DepthTest::LessEqual);
        ctx.clear(CLEAR_COLOR, CLEAR_DEPTH);
        ctx.set_blend(BlendMode::AlphaOver);
        self.view.render(ctx, models);
        ctx.finish_frame();
    }

    /// Ends the session and drops its context. The drawable handle stays
    /// valid for the host.
    pub fn release(&mut self) {
        self.context.release();
        self.state = SessionState::Released;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pixel_size(&self) -> PixelSize {
        self.size
    }

    pub fn drawable(&self) -> &D {
        &self.drawable
    }

    pub fn view(&self) -> &StageView {
        &self.view
    }

    /// Clonable handle for the host callback that watches this session's
    /// drawable.
    pub fn resize_signal(&self) -> ResizeSignal {
        self.resize.clone()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.get()
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.get_mut()
    }
}
