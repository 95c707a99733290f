//! GPU renderer for GradFlow gradients.
//!
//! The crate glues a `winit` window, the `wgpu` rendering pipeline, and the
//! static gradient fragment shader together. The overall flow is:
//!
//! ```text
//!   CLI / host
//!        │ RendererConfig
//!        ▼
//!   WindowRuntime::spawn ──▶ winit event loop ──▶ SurfaceRenderer
//!        ▲                          │                  │
//!        │ apply_config             └─ RedrawRequested ┴─▶ render_frame() ─▶ GPU UBO + draw
//! ```
//!
//! [`SurfaceRenderer`] owns all GPU resources and walks the lifecycle
//! `Unmounted → Created → Running → Destroyed`; resizes and configuration
//! updates are in-place transitions that never recompile the shader. One
//! pipeline contains all seven gradient variants, selected per draw by an
//! integer uniform.

mod gpu;
mod schedule;
mod shader;
mod surface;
mod viewport;
mod window;

pub use schedule::FrameScheduler;
pub use surface::SurfaceRenderer;
pub use viewport::{Viewport, DEVICE_PIXEL_RATIO_CAP};
pub use window::{run_windowed, RendererConfig, SurfaceCommand, WindowRuntime};
