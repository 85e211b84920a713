//! Surface sessions and their coordinator.
//!
//! A [`SurfaceSession`] runs one drawable: context, projection, pending
//! resize, per-frame update. The [`SessionCoordinator`] owns the ordered
//! session list plus everything cross-cutting: the frame loop, pointer
//! routing, model changes, and stage-event broadcast.

mod coordinator;
mod resize;
mod surface;

pub use coordinator::SessionCoordinator;
pub use resize::ResizeSignal;
pub use surface::{SessionState, SurfaceSession};
