//! Rendering-context management.
//!
//! This module is responsible for:
//! - the [`RenderContext`] contract sessions drive each frame
//! - [`ContextManager`]: one optional context per drawable, with a
//!   missing-counts-as-lost loss query
//! - the wgpu-backed production context ([`WgpuContext`])

mod context;
mod error;
mod gpu;

pub use context::{BlendMode, ContextManager, DepthTest, RenderContext};
pub use error::ContextError;
pub use gpu::{FrameState, GpuFrame, GpuInit, SurfaceErrorAction, WgpuContext};
