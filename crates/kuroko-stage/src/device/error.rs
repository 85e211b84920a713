use std::fmt;

/// A failure while acquiring a rendering context for a drawable.
///
/// Acquisition failures are values, not panics: the session reports them
/// to the coordinator, which logs and aborts the remaining surface batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The native surface could not be created for the drawable.
    SurfaceCreation(String),
    /// No GPU adapter is compatible with the surface.
    NoAdapter,
    /// The adapter refused the requested device features or limits.
    DeviceRequest(String),
    /// The surface reports no usable texture formats.
    NoSurfaceFormat,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::SurfaceCreation(detail) => {
                write!(f, "failed to create rendering surface: {detail}")
            }
            ContextError::NoAdapter => write!(f, "no compatible GPU adapter found"),
            ContextError::DeviceRequest(detail) => {
                write!(f, "failed to acquire GPU device: {detail}")
            }
            ContextError::NoSurfaceFormat => write!(f, "surface reports no usable formats"),
        }
    }
}

impl std::error::Error for ContextError {}
