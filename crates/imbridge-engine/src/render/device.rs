use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::coords::{ScissorOrigin, ScissorRect, Vec2, Viewport};
use crate::draw::{DeviceError, DrawIdx, DrawVert, Mat4, RenderDevice, TextureId};
use crate::font::{AtlasImage, PixelFormat};

use super::recorder::FrameRecorder;
use super::{RenderCtx, RenderTarget};

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    projection: Mat4,
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // pos
    1 => Float32x2, // uv
    2 => Unorm8x4   // col
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<DrawVert>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

// ── device ────────────────────────────────────────────────────────────────

/// [`RenderDevice`] over wgpu.
///
/// wgpu has no immediate mode, so the bridge's calls are recorded on the CPU:
/// every batch is appended to one frame-wide vertex/index stream and every
/// draw remembers its scissor and texture. [`encode`](Self::encode) uploads
/// the streams and replays the draws inside a single render pass.
///
/// Scissor rectangles use the top-left origin and are clamped to the render
/// target, since wgpu rejects rectangles that leave the attachment.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    max_texture_size: u32,

    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    uniform_bgl: wgpu::BindGroupLayout,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_ubo: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    // textures
    textures: HashMap<TextureId, GpuTexture>,
    white: GpuTexture,
    next_texture: u64,
    warned_unknown_texture: bool,

    // geometry
    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,

    recorder: FrameRecorder,
    warned_clamp: bool,
}

impl WgpuDevice {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("imbridge uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Uniforms>() as u64),
                },
                count: None,
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("imbridge texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("imbridge sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("imbridge uniform ubo"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("imbridge uniform bind group"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        let white = upload_rgba(
            &device,
            &queue,
            &texture_bgl,
            &sampler,
            &AtlasImage::filled(1, 1, PixelFormat::Rgba32, 255),
            "imbridge white texture",
        );

        let max_texture_size = device.limits().max_texture_dimension_2d;

        Self {
            device,
            queue,
            max_texture_size,
            pipeline_format: None,
            pipeline: None,
            uniform_bgl,
            texture_bgl,
            sampler,
            uniform_ubo,
            uniform_bind_group,
            textures: HashMap::new(),
            white,
            next_texture: 1,
            warned_unknown_texture: false,
            vbo: None,
            vbo_capacity: 0,
            ibo: None,
            ibo_capacity: 0,
            recorder: FrameRecorder::new(),
            warned_clamp: false,
        }
    }

    /// Drops a recorded frame that will not be encoded.
    pub fn discard_frame(&mut self) {
        self.recorder.discard();
    }

    /// Uploads the recorded geometry and replays every recorded draw into a
    /// render pass on `target`, loading its existing contents.
    pub fn encode(&mut self, surface_format: wgpu::TextureFormat, target: &mut RenderTarget<'_>) {
        if self.recorder.draws().is_empty() {
            self.recorder.discard();
            return;
        }

        self.ensure_pipeline(surface_format);
        self.upload_geometry();
        self.queue.write_buffer(
            &self.uniform_ubo,
            0,
            bytemuck::bytes_of(&Uniforms {
                projection: self.recorder.projection(),
            }),
        );

        let (tw, th) = target.size;
        let mut clamped = false;

        {
            let Some(pipeline) = self.pipeline.as_ref() else { return; };
            let Some(vbo) = self.vbo.as_ref() else { return; };
            let Some(ibo) = self.ibo.as_ref() else { return; };

            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("imbridge gui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
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

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);

            for draw in self.recorder.draws() {
                if !draw.scissor.fits_within(tw as i32, th as i32) {
                    clamped = true;
                }
                let Some((x, y, w, h)) = clamp_scissor(draw.scissor, tw, th) else {
                    continue;
                };
                rpass.set_scissor_rect(x, y, w, h);

                let bind_group = match self.textures.get(&draw.texture) {
                    Some(t) => &t.bind_group,
                    None => {
                        if !draw.texture.is_none() && !self.warned_unknown_texture {
                            log::warn!("unknown texture {:?}; drawing untextured", draw.texture);
                            self.warned_unknown_texture = true;
                        }
                        &self.white.bind_group
                    }
                };
                rpass.set_bind_group(1, bind_group, &[]);
                rpass.draw_indexed(
                    draw.first_index..draw.first_index + draw.count,
                    draw.base_vertex,
                    0..1,
                );
            }
        }

        if clamped && !self.warned_clamp {
            log::warn!("scissor rectangles clamped to the {tw}x{th} render target");
            self.warned_clamp = true;
        }

        self.recorder.discard();
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("imbridge gui shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gui.wgsl").into()),
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("imbridge gui pipeline layout"),
            bind_group_layouts: &[&self.uniform_bgl, &self.texture_bgl],
            immediate_size: 0,
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("imbridge gui pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
    }

    fn upload_geometry(&mut self) {
        self.recorder.align_indices();
        let (vertices, indices) = (self.recorder.vertices(), self.recorder.indices());

        if vertices.len() > self.vbo_capacity || self.vbo.is_none() {
            let cap = vertices.len().next_power_of_two().max(1024);
            self.vbo = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("imbridge gui vbo"),
                size: (cap * std::mem::size_of::<DrawVert>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }
        if indices.len() > self.ibo_capacity || self.ibo.is_none() {
            let cap = indices.len().next_power_of_two().max(2048);
            self.ibo = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("imbridge gui ibo"),
                size: (cap * std::mem::size_of::<DrawIdx>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }

        if let Some(vbo) = self.vbo.as_ref() {
            self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
        }
        if let Some(ibo) = self.ibo.as_ref() {
            self.queue.write_buffer(ibo, 0, bytemuck::cast_slice(indices));
        }
    }
}

impl RenderDevice for WgpuDevice {
    const SCISSOR_ORIGIN: ScissorOrigin = ScissorOrigin::TopLeft;

    fn create_texture(&mut self, image: &AtlasImage) -> Result<TextureId, DeviceError> {
        image.check()?;
        if image.width > self.max_texture_size || image.height > self.max_texture_size {
            return Err(DeviceError::TextureTooLarge {
                width: image.width,
                height: image.height,
                max: self.max_texture_size,
            });
        }

        // The shader modulates by a full RGBA sample; coverage becomes white.
        let rgba = image.to_rgba32();
        let texture = upload_rgba(
            &self.device,
            &self.queue,
            &self.texture_bgl,
            &self.sampler,
            &rgba,
            "imbridge texture",
        );

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, texture);
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if let Some(t) = self.textures.remove(&id) {
            t.texture.destroy();
        }
    }

    fn save_state(&mut self) {
        self.recorder.save();
    }

    fn restore_state(&mut self) {
        self.recorder.restore();
    }

    fn setup_render_state(&mut self, display: Viewport, framebuffer_scale: Vec2) {
        self.recorder.begin_frame(display, framebuffer_scale);
    }

    fn bind_vertex_data(&mut self, vertices: &[DrawVert], indices: &[DrawIdx]) {
        self.recorder.push_batch(vertices, indices);
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.recorder.set_scissor(rect);
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.recorder.bind_texture(id);
    }

    fn draw_indexed(&mut self, first_index: u32, count: u32) {
        self.recorder.draw(first_index, count);
    }
}

/// Uploads an RGBA8 image and binds it with `sampler`.
fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    bgl: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &AtlasImage,
    label: &str,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.bytes_per_row()),
            rows_per_image: Some(image.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture { texture, bind_group }
}

/// Intersects `rect` with a `width` × `height` target.
///
/// Returns `None` when nothing of the rectangle is visible.
pub(crate) fn clamp_scissor(rect: ScissorRect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (width as i64, height as i64);
    let x0 = (rect.x as i64).clamp(0, w);
    let y0 = (rect.y as i64).clamp(0, h);
    let x1 = (rect.x as i64 + rect.width as i64).clamp(0, w);
    let y1 = (rect.y as i64 + rect.height as i64).clamp(0, h);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}
