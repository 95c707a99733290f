//! Core gradient library for GradFlow.
//!
//! Everything in this crate is pure data and pure math: the color model and
//! hex conversions, the `GradientConfig` consumed by the renderer, the seven
//! procedural gradient fields, preset palettes, and random palette
//! generation. The GPU fragment shader in the `renderer` crate carries the
//! same field math; the functions in [`field`] are the reference the shader
//! is held to, and the test suite exercises them directly.

pub mod color;
pub mod config;
pub mod field;
pub mod presets;
pub mod random;
pub mod snippet;

pub use color::{hex_to_rgb, normalize, rgb_to_hex, ColorError, ColorInput, Rgb, FALLBACK_RGB};
pub use config::{ConfigError, GradientConfig, GradientType, PartialConfig};
pub use field::{apply_grain, evaluate, shade, FieldParams};
pub use presets::{default_config, preset, preset_names};
pub use random::{random_config, random_kind, random_palette, random_rgb};
pub use snippet::config_snippet;
