use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::compile::load_sources;
use crate::geometry::VertexData;
use crate::runtime::TimeSample;
use crate::types::{RendererConfig, TextureSettings};

use super::context::GpuContext;
use super::pipeline::{PipelineLayouts, ShaderProgram};
use super::texture;
use super::uniforms::ColorUniforms;

/// Owns every GPU object the triangle needs: one program, one vertex buffer,
/// one uniform buffer, and one texture.
pub(crate) struct GpuState {
    context: GpuContext,
    program: ShaderProgram,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    uniforms: ColorUniforms,
    clear: Option<wgpu::Color>,
    last_stats_update: Instant,
    frames_since_stats: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, config.backend)?;
        let layouts = PipelineLayouts::new(&context.device);

        let source = load_sources(&config.shaders)?;
        let vertex_data = VertexData::for_variant(config.variant);
        let program = ShaderProgram::new(
            &context.device,
            &layouts,
            context.surface_format,
            &source,
            vertex_data.layout(),
        )?;

        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("triangle vertices"),
                contents: vertex_data.bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let uniforms = ColorUniforms::new();
        let uniform_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform buffer"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &layouts.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let texture_settings = if config.variant.is_textured() {
            config.texture.clone()
        } else {
            TextureSettings {
                path: None,
                ..config.texture.clone()
            }
        };
        let texture = texture::create_resources(&context.device, &context.queue, &texture_settings);
        let texture_bind_group = layouts.texture_bind_group(&context.device, &texture);

        let clear = config.variant.clears_frame().then(|| {
            let [r, g, b, a] = config.clear_color;
            wgpu::Color { r, g, b, a }
        });

        debug!(
            variant = %config.variant,
            program = %program.label,
            backend = ?context.backend,
            vertices = vertex_data.count(),
            texture_width = texture.resolution.0,
            texture_height = texture.resolution.1,
            "GPU state ready"
        );

        Ok(Self {
            context,
            program,
            vertex_buffer,
            vertex_count: vertex_data.count(),
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            uniforms,
            clear,
            last_stats_update: Instant::now(),
            frames_since_stats: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Restores the surface after it was lost or became outdated.
    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    pub(crate) fn render(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.uniforms.update_time(sample);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });
        {
            let load = match self.clear {
                Some(color) => wgpu::LoadOp::Clear(color),
                None => wgpu::LoadOp::Load,
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.program.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.record_frame(sample);
        Ok(())
    }

    fn record_frame(&mut self, sample: TimeSample) {
        self.frames_since_stats += 1;
        let elapsed = self.last_stats_update.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_stats as f32 / elapsed.as_secs_f32();
            debug!(
                fps = fps.round(),
                frame = sample.frame_index,
                time = sample.seconds,
                green = self.uniforms.our_color[1],
                "render stats"
            );
            self.frames_since_stats = 0;
            self.last_stats_update = Instant::now();
        }
    }
}
