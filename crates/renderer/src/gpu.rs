use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use gradient::{normalize, GradientConfig};

use crate::shader::{compile_fragment_shader, compile_vertex_shader};
use crate::viewport::Viewport;

/// Live GPU resources behind a mounted surface: the drawing surface, the one
/// compiled pipeline, the uniform block, and the quad draw. Owned exclusively
/// by `SurfaceRenderer`; dropping it releases everything.
pub(crate) struct GpuState {
    _instance: wgpu::Instance,
    limits: wgpu::Limits,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: GradientUniforms,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        viewport: Viewport,
        gradient: &GradientConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let instance = wgpu::Instance::default();
        let window_handle = target
            .window_handle()
            .map_err(|err| anyhow!("failed to acquire window handle: {err}"))?;
        let display_handle = target
            .display_handle()
            .map_err(|err| anyhow!("failed to acquire display handle: {err}"))?;
        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: display_handle.as_raw(),
                raw_window_handle: window_handle.as_raw(),
            })
        }
        .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let limits = adapter.limits();
        let size = viewport.physical();
        let max_dimension = limits.max_texture_dimension_2d;
        if size.width > max_dimension || size.height > max_dimension {
            anyhow::bail!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}",
                width = size.width,
                height = size.height
            );
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("gradflow device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        // Gradients are opaque backgrounds; skip compositor blending where
        // the platform allows it.
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            surface_caps.alpha_modes[0]
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let uniforms = GradientUniforms::new(gradient, viewport.resolution());
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gradient uniform buffer"),
            size: std::mem::size_of::<GradientUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gradient uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradient uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gradient pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let vertex_module = compile_vertex_shader(&device)?;
        let fragment_module =
            compile_fragment_shader(&device).context("failed to compile gradient shader")?;

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gradient pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        tracing::info!(
            width = size.width,
            height = size.height,
            ?surface_format,
            kind = %gradient.kind,
            "gradient surface created"
        );

        Ok(Self {
            _instance: instance,
            limits,
            surface,
            device,
            queue,
            config,
            size,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
        })
    }

    /// Reconfigures the backing store and resolution uniform for a new
    /// layout box. Empty viewports are skipped; a later resize retries.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            tracing::trace!("skipping resize against zero-sized layout");
            return;
        }

        let new_size = viewport.physical();
        let max_dimension = self.limits.max_texture_dimension_2d;
        if new_size.width > max_dimension || new_size.height > max_dimension {
            tracing::warn!(
                new_width = new_size.width,
                new_height = new_size.height,
                max_dimension,
                "requested resize exceeds GPU limits; keeping previous size"
            );
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.uniforms.set_resolution(viewport.resolution());
    }

    /// Rewrites the gradient uniforms in place. No pipeline rebuild, no
    /// buffer reallocation; the next frame uploads the whole block at once so
    /// a draw never samples a half-applied configuration.
    pub(crate) fn apply_config(&mut self, gradient: &GradientConfig) {
        self.uniforms.set_gradient(gradient);
        tracing::debug!(kind = %gradient.kind, "gradient uniforms updated");
    }

    pub(crate) fn render(&mut self, elapsed_seconds: f32) -> Result<(), wgpu::SurfaceError> {
        self.uniforms.time = elapsed_seconds;
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gradient encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gradient pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..4, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            time = elapsed_seconds,
            "presented frame size={}x{}",
            self.size.width,
            self.size.height
        );
        Ok(())
    }
}

/// CPU mirror of the shader's `GradientParams` block, std140 layout.
///
/// Colors sit in the `xyz` of their vec4 slots; the `w` lanes are padding.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GradientUniforms {
    pub color1: [f32; 4],
    pub color2: [f32; 4],
    pub color3: [f32; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub speed: f32,
    pub scale: f32,
    pub noise: f32,
    pub kind: i32,
    _padding: f32,
}

unsafe impl Zeroable for GradientUniforms {}
unsafe impl Pod for GradientUniforms {}

impl GradientUniforms {
    pub(crate) fn new(gradient: &GradientConfig, resolution: [f32; 2]) -> Self {
        let mut uniforms = Self {
            color1: [0.0; 4],
            color2: [0.0; 4],
            color3: [0.0; 4],
            resolution,
            time: 0.0,
            speed: 0.0,
            scale: 0.0,
            noise: 0.0,
            kind: 0,
            _padding: 0.0,
        };
        uniforms.set_gradient(gradient);
        uniforms
    }

    pub(crate) fn set_gradient(&mut self, gradient: &GradientConfig) {
        self.color1 = pad(normalize(gradient.color1));
        self.color2 = pad(normalize(gradient.color2));
        self.color3 = pad(normalize(gradient.color3));
        self.speed = gradient.speed;
        self.scale = gradient.scale;
        self.noise = gradient.noise;
        self.kind = gradient.kind.selector();
    }

    pub(crate) fn set_resolution(&mut self, resolution: [f32; 2]) {
        self.resolution = resolution;
    }
}

fn pad(rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], 0.0]
}
