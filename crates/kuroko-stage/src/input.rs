//! Platform-agnostic pointer messages.
//!
//! Platform runtimes translate their native pointer events into
//! [`PointerInput`] and feed it to
//! [`SessionCoordinator::handle_pointer`](crate::session::SessionCoordinator::handle_pointer).
//! Coordinates are host coordinates: origin at the host viewport's
//! top-left, unscaled by the device pixel ratio.

/// One pointer event as reported by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerInput {
    /// The pointer moved while over the host viewport.
    Moved { x: f32, y: f32 },
    /// The primary button was pressed (a tap).
    Down { x: f32, y: f32 },
    /// The pointer interaction ended: button release or pointer leaving
    /// the host viewport.
    Ended,
}
