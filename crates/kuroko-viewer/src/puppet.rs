//! A stand-in puppet so the stage has something to orchestrate.
//!
//! One soft gradient card that sways in place, leans toward the
//! pointer while dragged, and puffs briefly when tapped. Its single
//! hit area is named "Body", covering the card footprint.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use kuroko_stage::device::WgpuContext;
use kuroko_stage::model::{ModelCapabilities, ModelDescriptor, ModelManager, ModelSlot};

/// Card half extents in view units.
const HALF_W: f32 = 0.35;
const HALF_H: f32 = 0.55;

/// Fraction of the drag position the card leans toward. Full-distance
/// following reads as teleporting; a lean keeps the card anchored.
const LEAN_FRACTION: f32 = 0.35;

const AREA_BODY: &str = "Body";

// ── manager ───────────────────────────────────────────────────────────────

/// Demo [`ModelManager`]: at most one card, loaded instantly.
#[derive(Default)]
pub struct PlaceholderPuppet {
    renderer: Option<CardRenderer>,
    slot: Option<CardSlot>,
    /// Settings path of the model this card stands in for.
    standing_in_for: Option<String>,
    time: f32,
    drag: [f32; 2],
    lean: [f32; 2],
    flash: f32,
}

impl PlaceholderPuppet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelManager<WgpuContext> for PlaceholderPuppet {
    fn attach_context(&mut self, ctx: &mut WgpuContext) {
        self.renderer = Some(CardRenderer::new(ctx));
    }

    fn advance(&mut self, dt: f32) {
        self.time += dt;

        // Ease the lean toward the drag target; a released pointer
        // reports (0, 0), so the card drifts back home on its own.
        let k = (dt * 6.0).min(1.0);
        self.lean[0] += (self.drag[0] * LEAN_FRACTION - self.lean[0]) * k;
        self.lean[1] += (self.drag[1] * LEAN_FRACTION - self.lean[1]) * k;
        self.flash = (self.flash - dt * 2.5).max(0.0);

        if let Some(slot) = &mut self.slot {
            slot.center = self.lean;
        }
    }

    fn on_drag(&mut self, x: f32, y: f32) {
        self.drag = [x, y];
    }

    fn on_tap(&mut self, x: f32, y: f32) {
        log::debug!("tap at view ({x:.2}, {y:.2})");
        self.flash = 1.0;
    }

    fn release_all_models(&mut self) {
        if let Some(path) = self.standing_in_for.take() {
            log::info!("releasing placeholder for {path}");
        }
        self.slot = None;
    }

    fn begin_model_load(&mut self, descriptor: ModelDescriptor) {
        let path = format!("{}{}", descriptor.directory, descriptor.file_name);
        log::info!("placeholder card standing in for {path}");
        self.standing_in_for = Some(path);
        self.slot = Some(CardSlot {
            center: [0.0, 0.0],
        });
    }

    fn model_count(&self) -> usize {
        if self.slot.is_some() { 1 } else { 0 }
    }

    fn model(&self, index: usize) -> Option<&dyn ModelSlot> {
        if index != 0 {
            return None;
        }
        self.slot.as_ref().map(|slot| slot as &dyn ModelSlot)
    }

    fn render_models(&mut self, ctx: &mut WgpuContext) {
        if self.slot.is_none() {
            return;
        }
        let Some(renderer) = self.renderer.as_ref() else { return };

        let size = ctx.size();
        let aspect = if size.is_empty() { 1.0 } else { size.aspect() };
        renderer.draw(
            ctx,
            CardParams {
                offset: self.lean,
                aspect,
                time: self.time,
                flash: self.flash,
                _pad: [0.0; 3],
            },
        );
    }
}

// ── slot ──────────────────────────────────────────────────────────────────

struct CardSlot {
    center: [f32; 2],
}

impl ModelSlot for CardSlot {
    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities { hit_testing: true }
    }

    fn hit_test(&self, area: &str, x: f32, y: f32) -> bool {
        area == AREA_BODY
            && (x - self.center[0]).abs() <= HALF_W
            && (y - self.center[1]).abs() <= HALF_H
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CardParams {
    offset: [f32; 2],
    aspect: f32,
    time: f32,
    flash: f32,
    _pad: [f32; 3], // 16-byte alignment
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CardVertex {
    pos: [f32; 2],
    tint: [f32; 4],
}

impl CardVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // tint
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CardVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// Dusk indigo at the feet, warm cream at the head.
const CARD_VERTICES: [CardVertex; 4] = [
    CardVertex { pos: [-HALF_W, -HALF_H], tint: [0.16, 0.13, 0.30, 0.92] },
    CardVertex { pos: [HALF_W, -HALF_H], tint: [0.16, 0.13, 0.30, 0.92] },
    CardVertex { pos: [HALF_W, HALF_H], tint: [0.96, 0.87, 0.78, 0.92] },
    CardVertex { pos: [-HALF_W, HALF_H], tint: [0.96, 0.87, 0.78, 0.92] },
];

const CARD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Straight-alpha over blending, matching the blend mode the stage
/// publishes before model draws.
fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Returns the `wgpu` minimum binding size for the card uniform buffer.
fn params_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<CardParams>() as u64)
        .expect("CardParams has non-zero size by construction")
}

/// GPU resources for the card. Rebuilt whenever the stage attaches a
/// fresh context, so the pipeline always targets the live surface
/// format.
struct CardRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    params_ubo: wgpu::Buffer,
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl CardRenderer {
    fn new(ctx: &WgpuContext) -> Self {
        let device = ctx.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("puppet card shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/card.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("puppet card bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(params_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("puppet card pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("puppet card pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[CardVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format(),
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let params_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("puppet card params ubo"),
            size: std::mem::size_of::<CardParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("puppet card bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_ubo.as_entire_binding(),
            }],
        });

        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("puppet card vbo"),
            contents: bytemuck::cast_slice(&CARD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("puppet card ibo"),
            contents: bytemuck::cast_slice(&CARD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            bind_group,
            params_ubo,
            vertices,
            indices,
        }
    }

    /// Records one card draw into the frame the stage already opened.
    /// Loads the existing color attachment; the stage cleared it.
    fn draw(&self, ctx: &mut WgpuContext, params: CardParams) {
        ctx.queue()
            .write_buffer(&self.params_ubo, 0, bytemuck::bytes_of(&params));

        let Some(frame) = ctx.current_frame() else { return };

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("puppet card pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..6, 0, 0..1);
    }
}
