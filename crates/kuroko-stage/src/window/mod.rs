//! winit-backed production platform.
//!
//! [`StageRuntime`] owns the event loop and glues winit to the
//! coordinator: window creation at resume, pointer translation into
//! [`crate::input::PointerInput`], resize events into raised
//! [`crate::session::ResizeSignal`]s, and redraw requests into ticks.

mod runtime;

pub use runtime::{
    RedrawScheduler, RuntimeConfig, StageRuntime, WindowSurface, WindowedCoordinator, WinitPlatform,
};
