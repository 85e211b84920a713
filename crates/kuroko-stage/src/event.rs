//! Stage events broadcast to host subscribers.

/// Something the stage noticed that hosts may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// A tap landed inside the named hit area of the front model.
    /// Coordinates are in view space.
    HitAreaTapped { area: String, x: f32, y: f32 },
}

/// Subscriber list for [`StageEvent`]s.
///
/// Handlers run synchronously, in subscription order, on the thread that
/// emitted the event. There is no unsubscribe; the bus lives as long as
/// its coordinator.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Box<dyn FnMut(&StageEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&StageEvent) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn emit(&mut self, event: &StageEvent) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
