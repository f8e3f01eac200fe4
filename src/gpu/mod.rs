//! wgpu rendering backend.
//!
//! Draws the galaxy as instanced quads (one per particle) with additive
//! blending and no depth writes, then paints the egui overlay on top.

mod egui_integration;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

pub use egui_integration::{EguiFrameOutput, EguiIntegration};

use crate::error::GpuError;
use crate::generator::ParticleBuffers;
use crate::scene::{surface_size, FrameView, PointsMaterial, RenderBackend, SurfaceSize};
use crate::shader::{Uniforms, POINTS_SHADER};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const VERTEX_STRIDE: wgpu::BufferAddress = (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

/// GPU buffers for one uploaded point cloud.
///
/// An empty cloud owns no buffers.
#[derive(Debug)]
pub struct GpuPoints {
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    count: u32,
}

/// Surface, device and pipeline for drawing point clouds.
pub struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    egui: EguiIntegration,
    pending_overlay: Option<EguiFrameOutput>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let physical = window.inner_size();
        let size = surface_size(physical.width, physical.height, window.scale_factor());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniforms = Uniforms::zeroed_for(&config);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = create_points_pipeline(&device, &pipeline_layout, &shader, config.format);

        let egui = EguiIntegration::new(&device, config.format, &window);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_texture,
            egui,
            pending_overlay: None,
        })
    }

    /// Forward a window event to the overlay. Returns true if it was consumed.
    pub fn overlay_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.egui.on_window_event(&self.window, event)
    }

    /// Run one UI pass; the result is painted by the next draw.
    pub fn build_overlay<R>(&mut self, ui: impl FnOnce(&egui::Context) -> R) -> R {
        self.egui.begin_pass(&self.window);
        let result = ui(&self.egui.ctx);
        let mut output = self.egui.end_pass(&self.window);
        // An overlay that never got painted still carries texture uploads.
        if let Some(mut stale) = self.pending_overlay.take() {
            stale.textures_delta.append(output.textures_delta);
            output.textures_delta = stale.textures_delta;
        }
        self.pending_overlay = Some(output);
        result
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = create_depth_texture(&self.device, &self.config);
    }

    fn render(&mut self, frame: &FrameView, points: Option<&GpuPoints>) -> Result<(), wgpu::SurfaceError> {
        let point_size = frame.material.map_or(0.0, |m| m.size);
        let uniforms = Uniforms {
            view_proj: frame.view_proj.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            point_size,
            ..Uniforms::zeroed_for(&self.config)
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Points Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(GpuPoints {
                buffers: Some((positions, colors)),
                count,
                ..
            }) = points
            {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, positions.slice(..));
                render_pass.set_vertex_buffer(1, colors.slice(..));
                render_pass.draw(0..6, 0..*count);
            }
        }

        let mut command_buffers = Vec::new();
        let overlay = self.pending_overlay.take();
        if let Some(overlay) = &overlay {
            // egui lays out for the window's scale factor; the surface may be
            // smaller when the pixel ratio is capped.
            let window_width = self.window.inner_size().width.max(1) as f32;
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: overlay.pixels_per_point * self.config.width as f32 / window_width,
            };
            command_buffers =
                self.egui
                    .prepare(&self.device, &self.queue, &mut encoder, overlay, &screen_descriptor);

            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer().render(
                &mut render_pass.forget_lifetime(),
                &overlay.paint_jobs,
                &screen_descriptor,
            );
        }

        command_buffers.push(encoder.finish());
        self.queue.submit(command_buffers);
        output.present();

        if let Some(overlay) = &overlay {
            self.egui.cleanup(overlay);
        }
        Ok(())
    }
}

impl RenderBackend for GpuState {
    type Points = GpuPoints;
    type Error = wgpu::SurfaceError;

    fn upload(&mut self, buffers: &ParticleBuffers, _material: &PointsMaterial) -> GpuPoints {
        let count = buffers.len() as u32;
        // Zero-length vertex buffers can't be bound, so an empty cloud has none.
        let gpu_buffers = (!buffers.is_empty()).then(|| {
            let positions = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Galaxy Positions"),
                contents: bytemuck::cast_slice(&buffers.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let colors = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Galaxy Colors"),
                contents: bytemuck::cast_slice(&buffers.colors),
                usage: wgpu::BufferUsages::VERTEX,
            });
            (positions, colors)
        });

        GpuPoints {
            buffers: gpu_buffers,
            count,
        }
    }

    fn release(&mut self, points: GpuPoints) {
        if let Some((positions, colors)) = points.buffers {
            positions.destroy();
            colors.destroy();
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        if size.width > 0 && size.height > 0 {
            self.config.width = size.width;
            self.config.height = size.height;
            self.reconfigure();
        }
    }

    fn draw(&mut self, frame: &FrameView, points: Option<&GpuPoints>) -> Result<(), wgpu::SurfaceError> {
        self.render(frame, points)
    }
}

impl Uniforms {
    fn zeroed_for(config: &wgpu::SurfaceConfiguration) -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            viewport: [config.width as f32, config.height as f32],
            point_size: 0.0,
            _padding: 0.0,
        }
    }
}

/// Colors add onto what is already there, so overlapping points brighten.
const ADDITIVE_BLEND: wgpu::BlendState = {
    let add = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: add, alpha: add }
};

fn create_points_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Points Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: VERTEX_STRIDE,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3, // position
                    }],
                },
                wgpu::VertexBufferLayout {
                    array_stride: VERTEX_STRIDE,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32x3, // color
                    }],
                },
            ],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(ADDITIVE_BLEND),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
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
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            // Points read depth but never write it
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_blend_adds_onto_destination() {
        let state = ADDITIVE_BLEND;
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.operation, wgpu::BlendOperation::Add);
    }

    #[test]
    fn test_vertex_stride_is_three_floats() {
        assert_eq!(VERTEX_STRIDE, 12);
    }
}
