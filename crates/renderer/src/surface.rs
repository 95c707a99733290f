use std::time::Instant;

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use gradient::GradientConfig;

use crate::gpu::GpuState;
use crate::viewport::Viewport;

/// Lifecycle wrapper around the GPU state.
///
/// Walks `Unmounted → Created → Running → Destroyed`; `resize` and
/// `apply_config` are in-place transitions that never interrupt the running
/// loop. Everything here is driven from one thread (the window event loop),
/// so a frame always reads a fully-applied uniform set.
pub struct SurfaceRenderer {
    gpu: Option<GpuState>,
    clock: Option<Instant>,
}

impl SurfaceRenderer {
    /// An unmounted renderer. All operations except [`mount`](Self::mount)
    /// are no-ops in this state, including [`destroy`](Self::destroy).
    pub fn new() -> Self {
        Self {
            gpu: None,
            clock: None,
        }
    }

    /// Acquires the GPU surface and compiles the gradient pipeline.
    ///
    /// Failure here is terminal for this instance: the caller logs it and
    /// never starts the loop, and a later [`destroy`](Self::destroy) is still
    /// safe.
    pub fn mount<T>(
        &mut self,
        target: &T,
        viewport: Viewport,
        config: &GradientConfig,
    ) -> Result<()>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        self.destroy();
        self.gpu = Some(GpuState::new(target, viewport, config)?);
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.gpu.is_some()
    }

    /// Resizes the backing store to the viewport's capped physical size and
    /// updates the resolution uniform. Safe before a successful mount and
    /// against a zero-sized layout; both cases are skipped.
    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(viewport);
        }
    }

    /// Resynchronizes the gradient uniforms with a new configuration. Called
    /// by the host whenever its configuration changes, in full or in part.
    pub fn apply_config(&mut self, config: &GradientConfig) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.apply_config(config);
        }
    }

    /// Draws one frame. The elapsed-time anchor is the first call, so time
    /// starts at zero when the loop does; unmounted renderers no-op.
    pub fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        let start = *self.clock.get_or_insert_with(Instant::now);
        gpu.render(start.elapsed().as_secs_f32())
    }

    /// Releases all GPU resources and resets the animation clock. Idempotent
    /// and safe to call without a prior successful mount.
    pub fn destroy(&mut self) {
        if self.gpu.take().is_some() {
            tracing::debug!("gradient surface destroyed");
        }
        self.clock = None;
    }
}

impl Default for SurfaceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SurfaceRenderer {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    #[test]
    fn destroy_is_idempotent_without_a_mount() {
        let mut renderer = SurfaceRenderer::new();
        renderer.destroy();
        renderer.destroy();
        assert!(!renderer.is_mounted());
    }

    #[test]
    fn unmounted_operations_are_no_ops() {
        let mut renderer = SurfaceRenderer::new();
        renderer.resize(Viewport::new(100, 100, 1.0));
        renderer.apply_config(&GradientConfig::default());
        assert!(renderer.render_frame().is_ok());
        assert!(!renderer.is_mounted());
    }
}
