use std::sync::Arc;

use wgpu::SurfaceError;
use winit::window::Window;

use crate::coords::PixelSize;

use super::context::{BlendMode, DepthTest, RenderContext};
use super::error::ContextError;

/// Initialization parameters for the wgpu-backed context.
///
/// Keep this structure stable and minimal. Add configuration flags only
/// when a concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is broadly supported.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported
    /// mode is selected instead.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features. Favor an empty set for portability.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint; support
    /// depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// A frame in flight: the acquired surface texture, its view, and the
/// encoder model renderers record into.
///
/// Short-lived; holding the surface texture past `finish_frame` blocks
/// acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Pipeline-facing state the stage re-asserts at the top of every frame.
///
/// wgpu has no global state machine, so "re-asserting" blend and depth
/// means republishing the requirements here; model renderers read this
/// when choosing pipelines for the current frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameState {
    pub depth_test: DepthTest,
    pub blend: BlendMode,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); the context is marked lost.
    Fatal,
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PixelSize,
}

/// wgpu-backed [`RenderContext`].
///
/// Owns Instance/Adapter/Device/Queue plus the surface configuration for
/// one window, the depth buffer that rides along with it, and the frame
/// currently being recorded.
pub struct WgpuContext {
    window: Arc<Window>,
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PixelSize,
    depth: Option<DepthBuffer>,
    frame: Option<GpuFrame>,
    state: FrameState,
    lost: bool,
}

impl WgpuContext {
    /// Creates a context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers
    /// block with `pollster` at the acquisition seam.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, ContextError> {
        let inner = window.inner_size();
        let size = PixelSize::new(inner.width, inner.height);
        if size.is_empty() {
            return Err(ContextError::SurfaceCreation(
                "drawable reports zero size".to_string(),
            ));
        }

        // All backends so wgpu selects the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The surface keeps its own Arc to the window, so it carries a
        // 'static lifetime.
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ContextError::SurfaceCreation(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| ContextError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("kuroko-stage device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| ContextError::DeviceRequest(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_caps, init.prefer_srgb)
            .ok_or(ContextError::NoSurfaceFormat)?;

        let alpha_mode = init
            .alpha_mode
            .filter(|m| surface_caps.alpha_modes.contains(m))
            .unwrap_or_else(|| {
                surface_caps
                    .alpha_modes
                    .first()
                    .copied()
                    .unwrap_or(wgpu::CompositeAlphaMode::Auto)
            });

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        Ok(WgpuContext {
            window,
            _instance: instance,
            surface,
            _adapter: adapter,
            device,
            queue,
            config,
            size,
            depth: None,
            frame: None,
            state: FrameState::default(),
            lost: false,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Blend/depth requirements for the frame being recorded.
    pub fn frame_state(&self) -> FrameState {
        self.state
    }

    /// The frame being recorded, if `clear` managed to acquire one this
    /// tick. Model renderers add their passes to its encoder.
    pub fn current_frame(&mut self) -> Option<&mut GpuFrame> {
        self.frame.as_mut()
    }

    /// Converts a `SurfaceError` into a higher-level action, applying the
    /// recovery (reconfigure or mark lost) as a side effect.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if !self.size.is_empty() {
                    self.surface.configure(&self.device, &self.config);
                }
                log::debug!("surface reconfigured after {err:?}");
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => {
                log::error!("surface out of memory; marking context lost");
                self.lost = true;
                SurfaceErrorAction::Fatal
            }
            SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }

    fn begin_frame(&mut self) -> Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("kuroko frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    fn ensure_depth_buffer(&mut self) {
        let current = self.depth.as_ref().map(|d| d.size);
        if current == Some(self.size) {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("kuroko depth buffer"),
            size: wgpu::Extent3d {
                width: self.config.width,
                height: self.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth24Plus,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.depth = Some(DepthBuffer {
            _texture: texture,
            view,
            size: self.size,
        });
    }
}

impl RenderContext for WgpuContext {
    fn is_lost(&self) -> bool {
        self.lost
    }

    /// wgpu does not support configuring a surface at 0x0; in that case
    /// only internal state is updated and configuration is deferred.
    fn set_viewport(&mut self, size: PixelSize) {
        self.size = size;
        if size.is_empty() {
            return;
        }

        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn set_depth_test(&mut self, depth: DepthTest) {
        self.state.depth_test = depth;
    }

    fn clear(&mut self, color: [f32; 4], depth: f32) {
        if self.lost {
            return;
        }

        if self.frame.is_none() {
            match self.begin_frame() {
                Ok(frame) => self.frame = Some(frame),
                // Reconfigured and SkipFrame both mean: no frame this
                // tick, try again next tick. Fatal marked the loss.
                Err(err) => {
                    self.handle_surface_error(err);
                    return;
                }
            }
        }

        self.ensure_depth_buffer();

        let depth_view = match self.state.depth_test {
            DepthTest::Disabled => None,
            DepthTest::LessEqual => self.depth.as_ref().map(|d| &d.view),
        };

        let Some(frame) = self.frame.as_mut() else {
            return;
        };

        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("kuroko clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color[0] as f64,
                        g: color[1] as f64,
                        b: color[2] as f64,
                        a: color[3] as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth_view.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn set_blend(&mut self, blend: BlendMode) {
        self.state.blend = blend;
    }

    fn finish_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            return;
        };

        self.queue.submit(std::iter::once(frame.encoder.finish()));
        self.window.pre_present_notify();
        frame.surface_texture.present();
    }
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}
