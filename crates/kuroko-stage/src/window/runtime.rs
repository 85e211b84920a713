use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::StageConfig;
use crate::coords::{PixelSize, Vec2};
use crate::device::{ContextError, GpuInit, WgpuContext};
use crate::input::PointerInput;
use crate::model::ModelManager;
use crate::platform::{DrawableSurface, StagePlatform, TickScheduler};
use crate::session::{ResizeSignal, SessionCoordinator};

/// Window/runtime configuration. Sizes are logical pixels; plain floats
/// so dependents never import winit.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "kuroko".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// A winit window seen as a drawable surface.
///
/// All sizes are the window's physical inner size: a window has no
/// separate layout box, so layout and buffer coincide and the buffer
/// setters are no-ops (the real buffer is the wgpu surface
/// configuration, which follows the context viewport). Pointer events
/// arrive window-relative, so the origin is zero and the scale factor
/// maps logical host coordinates to device pixels.
pub struct WindowSurface {
    window: Arc<Window>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl DrawableSurface for WindowSurface {
    fn layout_size(&self) -> PixelSize {
        let size = self.window.inner_size();
        PixelSize::new(size.width, size.height)
    }

    fn buffer_size(&self) -> PixelSize {
        self.layout_size()
    }

    fn set_buffer_size(&self, _size: PixelSize) {}

    fn set_display_size(&self, _size: PixelSize) {}

    fn origin(&self) -> Vec2 {
        Vec2::zero()
    }

    fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Production platform: one wgpu context per window surface.
pub struct WinitPlatform {
    surfaces: Vec<Arc<WindowSurface>>,
    gpu_init: GpuInit,
}

impl WinitPlatform {
    pub fn new(surfaces: Vec<Arc<WindowSurface>>, gpu_init: GpuInit) -> Self {
        Self { surfaces, gpu_init }
    }
}

impl StagePlatform for WinitPlatform {
    type Drawable = WindowSurface;
    type Context = WgpuContext;

    fn drawables(&mut self) -> Result<Vec<Arc<WindowSurface>>> {
        Ok(self.surfaces.clone())
    }

    fn acquire_context(
        &mut self,
        drawable: &Arc<WindowSurface>,
    ) -> Result<WgpuContext, ContextError> {
        pollster::block_on(WgpuContext::new(
            drawable.window().clone(),
            self.gpu_init.clone(),
        ))
    }

    // Input attach/detach stay the default no-ops: the event loop owns
    // delivery, and the runtime stops forwarding once released.
}

/// Schedules ticks through the window's redraw mechanism.
///
/// A requested redraw cannot be retracted, so `cancel` is a no-op; the
/// coordinator's running flag already makes the stray tick empty.
pub struct RedrawScheduler {
    window: Arc<Window>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl TickScheduler for RedrawScheduler {
    type Handle = ();

    fn request(&mut self) {
        self.window.request_redraw();
    }

    fn cancel(&mut self, _handle: ()) {}
}

/// The coordinator type the windowed runtime drives.
pub type WindowedCoordinator<M> = SessionCoordinator<WinitPlatform, M, RedrawScheduler>;

/// Entry point for the windowed stage.
pub struct StageRuntime;

impl StageRuntime {
    /// Opens a window, brings the stage up on it, and runs the event
    /// loop until the window closes.
    ///
    /// `setup` runs once, right after the sessions initialized and
    /// before the first tick: subscribe to stage events and kick off the
    /// first model load there.
    pub fn run<M, F>(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        stage_config: StageConfig,
        models: M,
        setup: F,
    ) -> Result<()>
    where
        M: ModelManager<WgpuContext> + 'static,
        F: FnOnce(&mut WindowedCoordinator<M>) + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = RuntimeState {
            config,
            gpu_init,
            stage_config,
            boot: Some(Boot {
                models,
                setup: Box::new(setup),
            }),
            coordinator: None,
            window: None,
            window_id: None,
            resize_signals: Vec::new(),
            pointer_pos: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// Consumed at the first resume, when a window can finally exist.
struct Boot<M: ModelManager<WgpuContext>> {
    models: M,
    setup: Box<dyn FnOnce(&mut WindowedCoordinator<M>)>,
}

struct RuntimeState<M: ModelManager<WgpuContext> + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    stage_config: StageConfig,
    boot: Option<Boot<M>>,
    coordinator: Option<WindowedCoordinator<M>>,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    resize_signals: Vec<ResizeSignal>,
    pointer_pos: Option<(f32, f32)>,
}

impl<M: ModelManager<WgpuContext> + 'static> RuntimeState<M> {
    fn bring_up(&mut self, event_loop: &ActiveEventLoop, boot: Boot<M>) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window_id = Some(window.id());

        let surface = Arc::new(WindowSurface::new(window.clone()));
        let platform = WinitPlatform::new(vec![surface], self.gpu_init.clone());
        let scheduler = RedrawScheduler::new(window.clone());
        self.window = Some(window);

        let mut coordinator = SessionCoordinator::new(
            platform,
            boot.models,
            scheduler,
            self.stage_config.clone(),
        );
        coordinator.initialize_sessions()?;
        (boot.setup)(&mut coordinator);

        self.resize_signals = coordinator
            .sessions()
            .iter()
            .map(|session| session.resize_signal())
            .collect();

        coordinator.run();
        self.coordinator = Some(coordinator);
        Ok(())
    }

    fn forward_pointer(&mut self, input: PointerInput) {
        if let Some(coordinator) = &mut self.coordinator {
            coordinator.handle_pointer(input);
        }
    }
}

impl<M: ModelManager<WgpuContext> + 'static> ApplicationHandler for RuntimeState<M> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.coordinator.is_some() {
            return;
        }
        let Some(boot) = self.boot.take() else {
            return;
        };

        if let Err(err) = self.bring_up(event_loop, boot) {
            log::error!("stage startup failed: {err:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Ticks self-schedule through redraw requests; the loop itself
        // just waits for events.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if Some(window_id) != self.window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(coordinator) = &mut self.coordinator {
                    coordinator.release();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                // Observer turn: raise the flags only. Geometry work
                // happens at the top of the next tick.
                for signal in &self.resize_signals {
                    signal.raise();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let (x, y) = to_logical_f32(window, position);
                    self.pointer_pos = Some((x, y));
                    self.forward_pointer(PointerInput::Moved { x, y });
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.forward_pointer(PointerInput::Ended);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.pointer_pos.unwrap_or((0.0, 0.0));
                self.forward_pointer(PointerInput::Down { x, y });
            }

            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                self.forward_pointer(PointerInput::Ended);
            }

            WindowEvent::RedrawRequested => {
                if let Some(coordinator) = &mut self.coordinator {
                    coordinator.tick();
                }
            }

            _ => {}
        }
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}
