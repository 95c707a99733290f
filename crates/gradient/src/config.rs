use serde::{Deserialize, Serialize};

use crate::color::{ColorInput, Rgb};
use crate::presets;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse gradient configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The seven gradient looks, in shader selector order.
///
/// Names parse case-insensitively and unknown names fall back to
/// [`GradientType::Animated`]; a stale config file degrades to the default
/// look instead of failing to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum GradientType {
    Linear,
    Conic,
    Animated,
    Wave,
    Silk,
    Smoke,
    Stripe,
}

impl GradientType {
    pub const ALL: [GradientType; 7] = [
        GradientType::Linear,
        GradientType::Conic,
        GradientType::Animated,
        GradientType::Wave,
        GradientType::Silk,
        GradientType::Smoke,
        GradientType::Stripe,
    ];

    /// Looks up a variant by name, falling back to `Animated`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linear" => GradientType::Linear,
            "conic" => GradientType::Conic,
            "animated" => GradientType::Animated,
            "wave" => GradientType::Wave,
            "silk" => GradientType::Silk,
            "smoke" => GradientType::Smoke,
            "stripe" => GradientType::Stripe,
            _ => GradientType::Animated,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GradientType::Linear => "linear",
            GradientType::Conic => "conic",
            GradientType::Animated => "animated",
            GradientType::Wave => "wave",
            GradientType::Silk => "silk",
            GradientType::Smoke => "smoke",
            GradientType::Stripe => "stripe",
        }
    }

    /// Integer value written to the shader's selector uniform.
    pub fn selector(self) -> i32 {
        match self {
            GradientType::Linear => 0,
            GradientType::Conic => 1,
            GradientType::Animated => 2,
            GradientType::Wave => 3,
            GradientType::Silk => 4,
            GradientType::Smoke => 5,
            GradientType::Stripe => 6,
        }
    }
}

impl Default for GradientType {
    fn default() -> Self {
        GradientType::Animated
    }
}

impl From<String> for GradientType {
    fn from(name: String) -> Self {
        GradientType::from_name(&name)
    }
}

impl From<GradientType> for String {
    fn from(kind: GradientType) -> Self {
        kind.name().to_string()
    }
}

impl std::fmt::Display for GradientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fully-resolved gradient parameters, the snapshot a frame is drawn from.
///
/// The renderer consumes one of these per frame and never mutates it; hosts
/// replace the whole value between frames to reconfigure.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "PartialConfig")]
pub struct GradientConfig {
    pub color1: Rgb,
    pub color2: Rgb,
    pub color3: Rgb,
    pub speed: f32,
    pub scale: f32,
    pub kind: GradientType,
    pub noise: f32,
}

impl GradientConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

impl Default for GradientConfig {
    fn default() -> Self {
        presets::default_config()
    }
}

/// User-facing configuration where every field is optional and colors may be
/// hex strings or `{ r, g, b }` tables. Missing fields take the defaults,
/// malformed colors the warm fallback.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PartialConfig {
    pub color1: Option<ColorInput>,
    pub color2: Option<ColorInput>,
    pub color3: Option<ColorInput>,
    pub speed: Option<f32>,
    pub scale: Option<f32>,
    pub kind: Option<GradientType>,
    pub noise: Option<f32>,
}

impl PartialConfig {
    /// Resolves against defaults. Noise is clamped to `[0, 1]`; the grain
    /// post-process is only specified over that range.
    pub fn resolve(&self) -> GradientConfig {
        let defaults = presets::default_config();
        GradientConfig {
            color1: self
                .color1
                .as_ref()
                .map(ColorInput::resolve)
                .unwrap_or(defaults.color1),
            color2: self
                .color2
                .as_ref()
                .map(ColorInput::resolve)
                .unwrap_or(defaults.color2),
            color3: self
                .color3
                .as_ref()
                .map(ColorInput::resolve)
                .unwrap_or(defaults.color3),
            speed: self.speed.unwrap_or(defaults.speed),
            scale: self.scale.unwrap_or(defaults.scale),
            kind: self.kind.unwrap_or(defaults.kind),
            noise: self.noise.unwrap_or(defaults.noise).clamp(0.0, 1.0),
        }
    }
}

impl From<PartialConfig> for GradientConfig {
    fn from(partial: PartialConfig) -> Self {
        partial.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::FALLBACK_RGB;

    #[test]
    fn unknown_kind_falls_back_to_animated() {
        assert_eq!(
            GradientType::from_name("unknown-value"),
            GradientType::Animated
        );
        assert_eq!(
            GradientType::from_name("unknown-value").selector(),
            GradientType::Animated.selector()
        );
    }

    #[test]
    fn selector_covers_all_seven_variants_in_order() {
        let selectors: Vec<i32> = GradientType::ALL.iter().map(|kind| kind.selector()).collect();
        assert_eq!(selectors, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in GradientType::ALL {
            assert_eq!(GradientType::from_name(kind.name()), kind);
        }
    }

    #[test]
    fn toml_with_hex_colors_and_defaults() {
        let config = GradientConfig::from_toml_str(
            r##"
            color1 = "#e2624b"
            color3 = { r = 30, g = 34, b = 159 }
            kind = "silk"
            noise = 2.0
            "##,
        )
        .unwrap();

        assert_eq!(config.color1, Rgb::new(226, 98, 75));
        assert_eq!(config.color2, Rgb::new(255, 255, 255));
        assert_eq!(config.color3, Rgb::new(30, 34, 159));
        assert_eq!(config.kind, GradientType::Silk);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.noise, 1.0);
    }

    #[test]
    fn toml_round_trips() {
        let original = GradientConfig {
            color1: Rgb::new(1, 2, 3),
            color2: Rgb::new(4, 5, 6),
            color3: Rgb::new(7, 8, 9),
            speed: 2.5,
            scale: 0.5,
            kind: GradientType::Stripe,
            noise: 0.25,
        };
        let encoded = toml::to_string(&original).unwrap();
        let decoded = GradientConfig::from_toml_str(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn malformed_color_resolves_to_fallback() {
        let config = GradientConfig::from_toml_str(r##"color1 = "#nothex""##).unwrap();
        assert_eq!(config.color1, FALLBACK_RGB);
    }
}
