//! Frame timing.
//!
//! One [`FrameClock`] lives in the coordinator; `tick()` runs once per
//! animation frame and the resulting [`FrameTime`] feeds the model
//! manager's animation advance.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
