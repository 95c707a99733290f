use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Sender};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use winit::window::WindowBuilder;

use gradient::GradientConfig;

use crate::schedule::FrameScheduler;
use crate::surface::SurfaceRenderer;
use crate::viewport::Viewport;

/// Start-up parameters for the windowed renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub surface_size: (u32, u32),
    /// Gradient to draw until the host applies a new one.
    pub gradient: GradientConfig,
    /// Optional FPS cap; `None` renders on every wakeup.
    pub target_fps: Option<f32>,
    /// Window title.
    pub title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            gradient: GradientConfig::default(),
            target_fps: None,
            title: "GradFlow".to_string(),
        }
    }
}

/// Commands the host injects into a running event loop.
#[derive(Debug, Clone)]
pub enum SurfaceCommand {
    /// Resynchronize uniforms with a changed configuration before the next
    /// draw. The whole snapshot is replaced; no partial updates.
    ApplyConfig(GradientConfig),
    Shutdown,
}

/// Handle to a renderer running on its own thread.
///
/// The host keeps this as its side of the reactive-update contract: every
/// configuration change goes through [`apply_config`](Self::apply_config),
/// and dropping the runtime tears the window down.
pub struct WindowRuntime {
    proxy: EventLoopProxy<SurfaceCommand>,
    join_handle: Option<JoinHandle<Result<()>>>,
}

impl WindowRuntime {
    pub fn spawn(config: RendererConfig) -> Result<Self> {
        let (ready_tx, ready_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("gradflow-window".into())
            .spawn(move || run_window_thread(config, ready_tx))
            .map_err(|err| anyhow!("failed to spawn window thread: {err}"))?;

        let proxy = ready_rx
            .recv()
            .map_err(|err| anyhow!("window thread failed to initialise: {err}"))??;

        Ok(Self {
            proxy,
            join_handle: Some(handle),
        })
    }

    /// Fails once the event loop has exited, which doubles as the host's
    /// signal that the window was closed.
    pub fn apply_config(&self, config: GradientConfig) -> Result<()> {
        self.proxy
            .send_event(SurfaceCommand::ApplyConfig(config))
            .map_err(|err| anyhow!(err))
    }

    /// Blocks until the window is closed by the user.
    pub fn wait(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }

    pub fn shutdown(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(SurfaceCommand::Shutdown);
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }
}

impl Drop for WindowRuntime {
    fn drop(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(SurfaceCommand::Shutdown);
            let _ = handle.join();
        }
    }
}

/// Runs the renderer on the calling thread until the window closes.
pub fn run_windowed(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::<SurfaceCommand>::with_user_event()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    drive_event_loop(event_loop, config, None)
}

fn run_window_thread(
    config: RendererConfig,
    ready_tx: Sender<Result<EventLoopProxy<SurfaceCommand>>>,
) -> Result<()> {
    let mut builder = EventLoopBuilder::<SurfaceCommand>::with_user_event();
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }

    let event_loop = match builder.build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            let _ = ready_tx.send(Err(anyhow!("failed to create event loop: {err}")));
            return Err(anyhow!("failed to create event loop: {err}"));
        }
    };

    drive_event_loop(event_loop, config, Some(ready_tx))
}

fn drive_event_loop(
    event_loop: EventLoop<SurfaceCommand>,
    config: RendererConfig,
    ready_tx: Option<Sender<Result<EventLoopProxy<SurfaceCommand>>>>,
) -> Result<()> {
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.surface_size.0, config.surface_size.1))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
    let mut renderer = SurfaceRenderer::new();
    if let Err(err) = renderer.mount(window.as_ref(), viewport, &config.gradient) {
        // Surface acquisition failure is terminal for this instance: report
        // it, never start the loop.
        let wrapped = anyhow!("failed to initialise gradient surface: {err}");
        tracing::error!(error = %wrapped, "surface unavailable");
        if let Some(tx) = ready_tx {
            let _ = tx.send(Err(anyhow!(wrapped.to_string())));
        }
        return Err(wrapped);
    }

    let mut scheduler = FrameScheduler::new(config.target_fps);
    window.request_redraw();

    if let Some(tx) = ready_tx {
        let _ = tx.send(Ok(proxy.clone()));
    }

    event_loop.run(move |event, elwt| {
        match event {
            Event::UserEvent(command) => match command {
                SurfaceCommand::ApplyConfig(gradient) => {
                    renderer.apply_config(&gradient);
                }
                SurfaceCommand::Shutdown => {
                    renderer.destroy();
                    elwt.exit();
                }
            },
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    // Cancel the loop and release GPU resources before the
                    // window goes away.
                    renderer.destroy();
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    viewport = Viewport::from_physical(new_size, window.scale_factor());
                    renderer.resize(viewport);
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    viewport = Viewport::from_physical(window.inner_size(), scale_factor);
                    renderer.resize(viewport);
                }
                WindowEvent::RedrawRequested => match renderer.render_frame() {
                    Ok(()) => {
                        scheduler.mark_rendered(Instant::now());
                    }
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        renderer.resize(viewport);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("surface out of memory; shutting down");
                        renderer.destroy();
                        elwt.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("surface timeout; retrying next frame");
                    }
                    Err(other) => {
                        tracing::warn!(error = ?other, "surface error; retrying next frame");
                    }
                },
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                if scheduler.ready_for_frame(now) {
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = scheduler.next_deadline() {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        }
    })
    .map_err(|err| anyhow!("window event loop error: {err}"))
}
