//! Host-facing stage settings.

/// How a session sizes its drawable's backing buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SizeMode {
    /// Follow the drawable's layout box (in device pixels).
    Auto,
    /// Fixed buffer size in device pixels, applied at session
    /// initialization. A later host resize event still refits the buffer
    /// to the layout box.
    Fixed { width: u32, height: u32 },
}

#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Buffer sizing policy applied to every session.
    pub size_mode: SizeMode,
    /// Named model region consulted for hover and tap hit-testing.
    pub hit_area: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            size_mode: SizeMode::Auto,
            hit_area: "Body".to_string(),
        }
    }
}
