//! Contract between the stage and the puppet rendering engine.
//!
//! The stage never parses, animates, or draws models itself. It owns one
//! [`ModelManager`] implementation and talks to it through this module:
//! per-frame time, pointer input in view space, load/release requests, and
//! the draw delegation.

use crate::device::RenderContext;

/// Where a model's settings live, split the way loaders consume it: the
/// asset directory (with trailing `/`) and the settings file name inside
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub directory: String,
    pub file_name: String,
}

impl ModelDescriptor {
    /// Splits a settings path at its last `/`. The directory keeps the
    /// trailing separator; a path without any separator is a bare file
    /// name with an empty directory.
    pub fn from_settings_path(path: &str) -> Self {
        match path.rsplit_once('/') {
            Some((dir, file)) => Self {
                directory: format!("{dir}/"),
                file_name: file.to_string(),
            },
            None => Self {
                directory: String::new(),
                file_name: path.to_string(),
            },
        }
    }
}

/// What a loaded model can do, declared up front instead of probed per
/// call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ModelCapabilities {
    /// The model carries named hit areas and answers [`ModelSlot::hit_test`].
    pub hit_testing: bool,
}

/// One loaded model in the manager's ordered collection.
pub trait ModelSlot {
    fn capabilities(&self) -> ModelCapabilities;

    /// Whether the view-space point lies inside the named hit area.
    /// Only called when [`ModelCapabilities::hit_testing`] is set.
    fn hit_test(&self, area: &str, x: f32, y: f32) -> bool;
}

/// The engine-side model manager the stage orchestrates.
///
/// Implementations own model loading and rendering wholesale; the stage
/// guarantees single-threaded access and calls `advance` exactly once per
/// tick before any session renders.
pub trait ModelManager<C: RenderContext> {
    /// Binds engine resources (textures, pipelines) to a freshly acquired
    /// rendering context. Called once per successful session
    /// initialization.
    fn attach_context(&mut self, ctx: &mut C) {
        let _ = ctx;
    }

    /// Advances animation time by `dt` seconds.
    fn advance(&mut self, dt: f32);

    /// Continuous pointer position in view space. `(0, 0)` means the
    /// interaction ended and any drag-follow should reset.
    fn on_drag(&mut self, x: f32, y: f32);

    /// A tap at the given view-space position.
    fn on_tap(&mut self, x: f32, y: f32);

    /// Releases every loaded model.
    fn release_all_models(&mut self);

    /// Starts loading the described model. Fire-and-forget: failures are
    /// the manager's to report.
    fn begin_model_load(&mut self, descriptor: ModelDescriptor);

    fn model_count(&self) -> usize;

    /// Indexed access in draw order; index 0 is the front model.
    fn model(&self, index: usize) -> Option<&dyn ModelSlot>;

    /// Draws every model into the given context.
    fn render_models(&mut self, ctx: &mut C);
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── from_settings_path ────────────────────────────────────────────────

    #[test]
    fn splits_directory_and_file() {
        let d = ModelDescriptor::from_settings_path("models/foo/foo.model3.json");
        assert_eq!(d.directory, "models/foo/");
        assert_eq!(d.file_name, "foo.model3.json");
    }

    #[test]
    fn bare_file_name_has_empty_directory() {
        let d = ModelDescriptor::from_settings_path("foo.model3.json");
        assert_eq!(d.directory, "");
        assert_eq!(d.file_name, "foo.model3.json");
    }

    #[test]
    fn root_relative_path_keeps_leading_slash() {
        let d = ModelDescriptor::from_settings_path("/foo.model3.json");
        assert_eq!(d.directory, "/");
        assert_eq!(d.file_name, "foo.model3.json");
    }

    #[test]
    fn trailing_slash_yields_empty_file_name() {
        let d = ModelDescriptor::from_settings_path("models/foo/");
        assert_eq!(d.directory, "models/foo/");
        assert_eq!(d.file_name, "");
    }
}
