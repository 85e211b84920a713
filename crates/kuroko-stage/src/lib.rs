//! Kuroko stage crate.
//!
//! The lifecycle and event-orchestration layer between a host
//! environment and a 2D character ("puppet") rendering engine. The
//! stage owns rendering contexts, the frame loop, pointer-to-view
//! coordinate mapping, and model-change requests; the engine itself is
//! reached only through the [`model`] traits.

pub mod config;
pub mod coords;
pub mod device;
pub mod event;
pub mod input;
pub mod model;
pub mod platform;
pub mod session;
pub mod view;
pub mod window;

pub mod logging;
pub mod time;

#[cfg(test)]
pub(crate) mod test_support;
