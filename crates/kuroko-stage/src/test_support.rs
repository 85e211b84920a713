//! Shared fakes for the in-crate unit tests.
//!
//! Everything records what was done to it; tests construct the fakes,
//! keep the `Rc` probe handles they need, and assert on the records
//! afterwards.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;

use crate::coords::{PixelSize, Vec2};
use crate::device::{BlendMode, ContextError, DepthTest, RenderContext};
use crate::model::{ModelCapabilities, ModelDescriptor, ModelManager, ModelSlot};
use crate::platform::{DrawableSurface, StagePlatform, TickScheduler};

// ── context ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ContextCommand {
    Viewport(PixelSize),
    DepthTest(DepthTest),
    Clear { color: [f32; 4], depth: f32 },
    Blend(BlendMode),
    ModelDraw,
    FinishFrame,
}

/// Records every command unconditionally, so a test can also catch
/// commands that should not have been issued.
#[derive(Debug, Default)]
pub struct FakeContext {
    pub lost: bool,
    pub commands: Vec<ContextCommand>,
}

impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderContext for FakeContext {
    fn is_lost(&self) -> bool {
        self.lost
    }

    fn set_viewport(&mut self, size: PixelSize) {
        self.commands.push(ContextCommand::Viewport(size));
    }

    fn set_depth_test(&mut self, depth: DepthTest) {
        self.commands.push(ContextCommand::DepthTest(depth));
    }

    fn clear(&mut self, color: [f32; 4], depth: f32) {
        self.commands.push(ContextCommand::Clear { color, depth });
    }

    fn set_blend(&mut self, blend: BlendMode) {
        self.commands.push(ContextCommand::Blend(blend));
    }

    fn finish_frame(&mut self) {
        self.commands.push(ContextCommand::FinishFrame);
    }
}

// ── drawable ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FakeDrawable {
    layout: Cell<PixelSize>,
    buffer: Cell<PixelSize>,
    display: Cell<Option<PixelSize>>,
    buffer_pushes: Cell<usize>,
    origin: Vec2,
    scale: f32,
}

impl FakeDrawable {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layout: Cell::new(PixelSize::new(width, height)),
            buffer: Cell::new(PixelSize::zero()),
            display: Cell::new(None),
            buffer_pushes: Cell::new(0),
            origin: Vec2::zero(),
            scale: 1.0,
        }
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vec2::new(x, y);
        self
    }

    pub fn with_scale_factor(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Simulates the host changing the layout box.
    pub fn set_layout_size(&self, size: PixelSize) {
        self.layout.set(size);
    }

    pub fn display_size(&self) -> Option<PixelSize> {
        self.display.get()
    }

    /// How many times the buffer was pushed to, regardless of value.
    pub fn buffer_pushes(&self) -> usize {
        self.buffer_pushes.get()
    }
}

impl DrawableSurface for FakeDrawable {
    fn layout_size(&self) -> PixelSize {
        self.layout.get()
    }

    fn buffer_size(&self) -> PixelSize {
        self.buffer.get()
    }

    fn set_buffer_size(&self, size: PixelSize) {
        self.buffer.set(size);
        self.buffer_pushes.set(self.buffer_pushes.get() + 1);
    }

    fn set_display_size(&self, size: PixelSize) {
        self.display.set(Some(size));
    }

    fn origin(&self) -> Vec2 {
        self.origin
    }

    fn scale_factor(&self) -> f32 {
        self.scale
    }
}

// ── platform ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PlatformProbe {
    pub attached: Rc<Cell<usize>>,
    pub detached: Rc<Cell<usize>>,
}

#[derive(Debug, Default)]
pub struct FakePlatform {
    drawables: Vec<Arc<FakeDrawable>>,
    pub fail_acquire: bool,
    fail_after: Option<usize>,
    acquisitions: usize,
    pub probe: PlatformProbe,
}

impl FakePlatform {
    pub fn with_drawables(drawables: Vec<FakeDrawable>) -> Self {
        Self {
            drawables: drawables.into_iter().map(Arc::new).collect(),
            ..Self::default()
        }
    }

    /// Lets `count` acquisitions succeed, then fails the rest.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    pub fn drawable(&self, index: usize) -> Arc<FakeDrawable> {
        Arc::clone(&self.drawables[index])
    }
}

impl StagePlatform for FakePlatform {
    type Drawable = FakeDrawable;
    type Context = FakeContext;

    fn drawables(&mut self) -> Result<Vec<Arc<FakeDrawable>>> {
        Ok(self.drawables.clone())
    }

    fn acquire_context(
        &mut self,
        _drawable: &Arc<FakeDrawable>,
    ) -> Result<FakeContext, ContextError> {
        let n = self.acquisitions;
        self.acquisitions += 1;

        if self.fail_acquire || self.fail_after.is_some_and(|count| n >= count) {
            return Err(ContextError::NoAdapter);
        }
        Ok(FakeContext::new())
    }

    fn attach_input(&mut self) {
        self.probe.attached.set(self.probe.attached.get() + 1);
    }

    fn detach_input(&mut self) {
        self.probe.detached.set(self.probe.detached.get() + 1);
    }
}

// ── scheduler ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SchedulerProbe {
    pub requests: Rc<Cell<usize>>,
    pub cancels: Rc<Cell<usize>>,
    pub last_cancelled: Rc<Cell<Option<usize>>>,
}

#[derive(Debug, Default)]
pub struct FakeScheduler {
    next_handle: usize,
    pub probe: SchedulerProbe,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickScheduler for FakeScheduler {
    type Handle = usize;

    fn request(&mut self) -> usize {
        self.probe.requests.set(self.probe.requests.get() + 1);
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn cancel(&mut self, handle: usize) {
        self.probe.cancels.set(self.probe.cancels.get() + 1);
        self.probe.last_cancelled.set(Some(handle));
    }
}

// ── models ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FakeSlot {
    capabilities: ModelCapabilities,
    hit: bool,
    probes: Cell<usize>,
}

impl ModelSlot for FakeSlot {
    fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    fn hit_test(&self, _area: &str, _x: f32, _y: f32) -> bool {
        self.probes.set(self.probes.get() + 1);
        self.hit
    }
}

#[derive(Debug, Default)]
pub struct FakeModels {
    pub drags: Vec<(f32, f32)>,
    pub taps: Vec<(f32, f32)>,
    pub advances: Vec<f32>,
    /// Order-sensitive call log for release/load sequencing.
    pub calls: Vec<String>,
    pub attached: usize,
    pub renders: usize,
    slots: Vec<FakeSlot>,
}

impl FakeModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, hit_testing: bool, hit_result: bool) {
        self.slots.push(FakeSlot {
            capabilities: ModelCapabilities { hit_testing },
            hit: hit_result,
            probes: Cell::new(0),
        });
    }

    /// Total hit-test probes across every slot.
    pub fn hit_tests(&self) -> usize {
        self.slots.iter().map(|slot| slot.probes.get()).sum()
    }
}

impl ModelManager<FakeContext> for FakeModels {
    fn attach_context(&mut self, _ctx: &mut FakeContext) {
        self.attached += 1;
    }

    fn advance(&mut self, dt: f32) {
        self.advances.push(dt);
    }

    fn on_drag(&mut self, x: f32, y: f32) {
        self.drags.push((x, y));
    }

    fn on_tap(&mut self, x: f32, y: f32) {
        self.taps.push((x, y));
    }

    fn release_all_models(&mut self) {
        self.calls.push("release_all_models".to_string());
        self.slots.clear();
    }

    fn begin_model_load(&mut self, descriptor: ModelDescriptor) {
        self.calls.push(format!(
            "begin_model_load {} {}",
            descriptor.directory, descriptor.file_name
        ));
    }

    fn model_count(&self) -> usize {
        self.slots.len()
    }

    fn model(&self, index: usize) -> Option<&dyn ModelSlot> {
        self.slots.get(index).map(|slot| slot as &dyn ModelSlot)
    }

    fn render_models(&mut self, ctx: &mut FakeContext) {
        ctx.commands.push(ContextCommand::ModelDraw);
        self.renders += 1;
    }
}
