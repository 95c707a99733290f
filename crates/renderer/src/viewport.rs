use winit::dpi::PhysicalSize;

/// Backing stores never exceed twice the logical size; anything denser burns
/// fill rate without a visible payoff for a soft gradient.
pub const DEVICE_PIXEL_RATIO_CAP: f64 = 2.0;

/// A snapshot of the host container's layout box.
///
/// `logical` is the CSS-pixel-equivalent size the host lays the surface out
/// at; the physical backing store applies the capped device pixel ratio. The
/// resolution uniform is fed the logical size, so the shader's
/// scale-sensitive variants see the same field regardless of pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub logical: (u32, u32),
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(logical_width: u32, logical_height: u32, scale_factor: f64) -> Self {
        Self {
            logical: (logical_width, logical_height),
            scale_factor,
        }
    }

    /// Derives the viewport from a physical size as reported by the window
    /// system (e.g. winit resize events).
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            logical: (
                (size.width as f64 / factor).round() as u32,
                (size.height as f64 / factor).round() as u32,
            ),
            scale_factor: factor,
        }
    }

    /// True while layout has not settled on a drawable size. Resizes against
    /// an empty viewport are skipped; a later resize event retries.
    pub fn is_empty(&self) -> bool {
        self.logical.0 == 0 || self.logical.1 == 0
    }

    /// Backing-store size in device pixels, with the DPR capped at
    /// [`DEVICE_PIXEL_RATIO_CAP`]. Non-empty viewports never collapse below
    /// one pixel per axis.
    pub fn physical(&self) -> PhysicalSize<u32> {
        let dpr = self.scale_factor.clamp(0.0, DEVICE_PIXEL_RATIO_CAP);
        PhysicalSize::new(
            ((self.logical.0 as f64 * dpr).round() as u32).max(u32::from(self.logical.0 > 0)),
            ((self.logical.1 as f64 * dpr).round() as u32).max(u32::from(self.logical.1 > 0)),
        )
    }

    /// Value of the `resolution` uniform: the logical size.
    pub fn resolution(&self) -> [f32; 2] {
        [self.logical.0 as f32, self.logical.1 as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_store_scales_by_dpr() {
        let viewport = Viewport::new(100, 100, 1.5);
        assert_eq!(viewport.physical(), PhysicalSize::new(150, 150));
        assert_eq!(viewport.resolution(), [100.0, 100.0]);
    }

    #[test]
    fn dpr_is_capped_at_two() {
        let viewport = Viewport::new(100, 100, 3.0);
        assert_eq!(viewport.physical(), PhysicalSize::new(200, 200));
        // The uniform still reports the logical layout size.
        assert_eq!(viewport.resolution(), [100.0, 100.0]);
    }

    #[test]
    fn zero_sized_layout_is_reported_empty() {
        assert!(Viewport::new(0, 480, 1.0).is_empty());
        assert!(Viewport::new(640, 0, 1.0).is_empty());
        assert!(!Viewport::new(640, 480, 1.0).is_empty());
    }

    #[test]
    fn physical_round_trips_through_from_physical() {
        let viewport = Viewport::from_physical(PhysicalSize::new(1280, 720), 2.0);
        assert_eq!(viewport.logical, (640, 360));
        assert_eq!(viewport.physical(), PhysicalSize::new(1280, 720));
    }

    #[test]
    fn nonsense_scale_factor_falls_back_to_one() {
        let viewport = Viewport::from_physical(PhysicalSize::new(800, 600), 0.0);
        assert_eq!(viewport.logical, (800, 600));
    }
}
