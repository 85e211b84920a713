//! Coordinate types shared across the stage.
//!
//! Three spaces meet here:
//! - Host coordinates: where the host reports pointer events, origin at
//!   the host viewport's top-left, +X right, +Y down.
//! - Device pixels: the drawable's backing buffer, host coordinates
//!   multiplied by the drawable's scale factor.
//! - View space: the orthographic world the model renderer draws in,
//!   bounded by a [`ViewRect`], +Y up.

mod pixel_size;
mod vec2;
mod view_rect;

pub use pixel_size::PixelSize;
pub use vec2::Vec2;
pub use view_rect::ViewRect;
