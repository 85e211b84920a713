use anyhow::Result;

use crate::config::StageConfig;
use crate::coords::Vec2;
use crate::event::{EventBus, StageEvent};
use crate::input::PointerInput;
use crate::model::{ModelDescriptor, ModelManager};
use crate::platform::{DrawableSurface, StagePlatform, TickScheduler};
use crate::time::FrameClock;

use super::SurfaceSession;

/// Owns every session plus the cross-cutting stage state: the frame
/// loop, the model manager, pointer routing, and event broadcast.
///
/// The coordinator is the single entry point hosts talk to. It is
/// strictly single-threaded; everything runs on the host's event-loop
/// thread, and a tick always completes before the next one is
/// scheduled.
pub struct SessionCoordinator<P, M, S>
where
    P: StagePlatform,
    M: ModelManager<P::Context>,
    S: TickScheduler,
{
    platform: P,
    models: M,
    scheduler: S,
    config: StageConfig,
    sessions: Vec<SurfaceSession<P::Drawable, P::Context>>,
    clock: FrameClock,
    pending_tick: Option<S::Handle>,
    running: bool,
    events: EventBus,
}

impl<P, M, S> SessionCoordinator<P, M, S>
where
    P: StagePlatform,
    M: ModelManager<P::Context>,
    S: TickScheduler,
{
    /// The model manager is injected, never global: whoever builds the
    /// coordinator decides where models live.
    pub fn new(platform: P, models: M, scheduler: S, config: StageConfig) -> Self {
        Self {
            platform,
            models,
            scheduler,
            config,
            sessions: Vec::new(),
            clock: FrameClock::new(),
            pending_tick: None,
            running: false,
            events: EventBus::new(),
        }
    }

    /// Discovers drawables and brings one session up on each, in order;
    /// index 0 becomes the primary interactive surface.
    ///
    /// Fail-fast: the first session failure logs, aborts the rest of the
    /// batch, and returns the error. Sessions that initialized before
    /// the failure stay registered. Input listeners attach only once the
    /// whole batch succeeded.
    pub fn initialize_sessions(&mut self) -> Result<()> {
        let drawables = self.platform.drawables()?;
        anyhow::ensure!(!drawables.is_empty(), "platform yielded no drawable surfaces");

        for drawable in drawables {
            let mut session = SurfaceSession::new(drawable);
            if let Err(err) =
                session.initialize(&mut self.platform, &mut self.models, self.config.size_mode)
            {
                log::error!("failed to initialize surface session: {err}");
                return Err(err.into());
            }
            session.drawable().set_display_size(session.pixel_size());
            self.sessions.push(session);
        }

        self.platform.attach_input();
        log::debug!("{} surface session(s) initialized", self.sessions.len());
        Ok(())
    }

    /// Starts the frame loop. No-op while already running.
    pub fn run(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.clock.reset();
        self.pending_tick = Some(self.scheduler.request());
    }

    /// One animation frame: advance time, feed dt to the model manager,
    /// update every session in insertion order, then schedule the next
    /// tick. Scheduling happens strictly after the full pass, so ticks
    /// never overlap.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.pending_tick = None;

        let frame = self.clock.tick();
        self.models.advance(frame.dt);

        for session in &mut self.sessions {
            session.update(&mut self.models);
        }

        self.pending_tick = Some(self.scheduler.request());
    }

    /// Cancels the next scheduled tick. Idempotent: a second call finds
    /// nothing to cancel. A tick already executing completes its pass.
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Stops the loop, detaches input listeners, and tears down every
    /// session. The coordinator stays usable: a fresh
    /// [`initialize_sessions`](Self::initialize_sessions) rebuilds it.
    pub fn release(&mut self) {
        self.stop();
        self.platform.detach_input();
        for session in &mut self.sessions {
            session.release();
        }
        self.sessions.clear();
    }

    /// Maps a host-coordinate pointer position into the primary
    /// session's view space: subtract the drawable origin, scale to
    /// device pixels, run the view transforms. Without any session the
    /// origin comes back, keeping pointer handlers total.
    pub fn transform_offset(&self, page: Vec2) -> Vec2 {
        let Some(session) = self.sessions.first() else {
            return Vec2::zero();
        };

        let drawable = session.drawable();
        let device = (page - drawable.origin()) * drawable.scale_factor();
        Vec2::new(
            session.view().transform_view_x(device.x),
            session.view().transform_view_y(device.y),
        )
    }

    /// Routes one host pointer message.
    pub fn handle_pointer(&mut self, input: PointerInput) {
        match input {
            PointerInput::Moved { x, y } => self.on_pointer_move(Vec2::new(x, y)),
            PointerInput::Down { x, y } => self.on_tap(Vec2::new(x, y)),
            PointerInput::Ended => self.on_pointer_end(),
        }
    }

    /// Pointer motion: feed the drag position to the models and probe
    /// the configured hit area. The probe is the hover hook point; today
    /// it only traces.
    pub fn on_pointer_move(&mut self, page: Vec2) {
        let p = self.transform_offset(page);
        self.models.on_drag(p.x, p.y);
        if self.hit_test_front_model(p) {
            log::trace!(
                "pointer over {} at ({:.3}, {:.3})",
                self.config.hit_area,
                p.x,
                p.y
            );
        }
    }

    /// End of a pointer interaction: the drag target resets to center.
    pub fn on_pointer_end(&mut self) {
        self.models.on_drag(0.0, 0.0);
    }

    /// A tap: forward it, then broadcast when it lands in the configured
    /// hit area of the front model.
    pub fn on_tap(&mut self, page: Vec2) {
        let p = self.transform_offset(page);
        self.models.on_tap(p.x, p.y);
        if self.hit_test_front_model(p) {
            let event = StageEvent::HitAreaTapped {
                area: self.config.hit_area.clone(),
                x: p.x,
                y: p.y,
            };
            self.events.emit(&event);
        }
    }

    fn hit_test_front_model(&self, p: Vec2) -> bool {
        let Some(model) = self.models.model(0) else {
            return false;
        };
        if !model.capabilities().hit_testing {
            return false;
        }
        model.hit_test(&self.config.hit_area, p.x, p.y)
    }

    /// Swaps the displayed model: everything loaded is released first,
    /// then the load of the new settings file starts. Fire-and-forget;
    /// load failures are the model manager's to report.
    pub fn change_model(&mut self, settings_path: &str) {
        let descriptor = ModelDescriptor::from_settings_path(settings_path);
        log::info!(
            "changing model to {}{}",
            descriptor.directory,
            descriptor.file_name
        );
        self.models.release_all_models();
        self.models.begin_model_load(descriptor);
    }

    /// Registers a stage-event subscriber. Subscribers run synchronously
    /// on the event-loop thread.
    pub fn subscribe(&mut self, handler: impl FnMut(&StageEvent) + 'static) {
        self.events.subscribe(handler);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sessions(&self) -> &[SurfaceSession<P::Drawable, P::Context>] {
        &self.sessions
    }

    pub fn models(&self) -> &M {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut M {
        &mut self.models
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }
}
