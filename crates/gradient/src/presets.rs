//! Named palette presets and the stock default configuration.

use crate::color::Rgb;
use crate::config::{GradientConfig, GradientType};

/// The configuration used when the host supplies nothing: warm coral into
/// white into deep indigo, animated, grain off.
pub fn default_config() -> GradientConfig {
    GradientConfig {
        color1: Rgb::new(226, 98, 75),
        color2: Rgb::new(255, 255, 255),
        color3: Rgb::new(30, 34, 159),
        speed: 1.0,
        scale: 1.0,
        kind: GradientType::Animated,
        noise: 0.0,
    }
}

const PRESETS: &[(&str, GradientConfig)] = &[
    (
        "cosmic",
        GradientConfig {
            color1: Rgb::new(63, 33, 147),
            color2: Rgb::new(219, 39, 119),
            color3: Rgb::new(14, 165, 233),
            speed: 0.8,
            scale: 1.0,
            kind: GradientType::Animated,
            noise: 0.05,
        },
    ),
    (
        "matrix",
        GradientConfig {
            color1: Rgb::new(3, 24, 9),
            color2: Rgb::new(34, 197, 94),
            color3: Rgb::new(190, 242, 100),
            speed: 1.2,
            scale: 1.5,
            kind: GradientType::Smoke,
            noise: 0.15,
        },
    ),
    (
        "electric",
        GradientConfig {
            color1: Rgb::new(30, 64, 175),
            color2: Rgb::new(236, 72, 153),
            color3: Rgb::new(250, 204, 21),
            speed: 1.5,
            scale: 1.0,
            kind: GradientType::Conic,
            noise: 0.0,
        },
    ),
    (
        "inferno",
        GradientConfig {
            color1: Rgb::new(127, 29, 29),
            color2: Rgb::new(249, 115, 22),
            color3: Rgb::new(250, 250, 249),
            speed: 1.0,
            scale: 1.2,
            kind: GradientType::Smoke,
            noise: 0.1,
        },
    ),
    (
        "mystic",
        GradientConfig {
            color1: Rgb::new(49, 46, 129),
            color2: Rgb::new(139, 92, 246),
            color3: Rgb::new(240, 171, 252),
            speed: 0.6,
            scale: 1.0,
            kind: GradientType::Silk,
            noise: 0.0,
        },
    ),
    (
        "cyber",
        GradientConfig {
            color1: Rgb::new(8, 47, 73),
            color2: Rgb::new(6, 182, 212),
            color3: Rgb::new(217, 70, 239),
            speed: 1.0,
            scale: 1.0,
            kind: GradientType::Wave,
            noise: 0.0,
        },
    ),
    (
        "neon",
        GradientConfig {
            color1: Rgb::new(24, 24, 27),
            color2: Rgb::new(34, 211, 238),
            color3: Rgb::new(244, 114, 182),
            speed: 1.4,
            scale: 0.8,
            kind: GradientType::Stripe,
            noise: 0.0,
        },
    ),
    (
        "plasma",
        GradientConfig {
            color1: Rgb::new(76, 5, 25),
            color2: Rgb::new(225, 29, 72),
            color3: Rgb::new(253, 186, 116),
            speed: 1.0,
            scale: 1.0,
            kind: GradientType::Animated,
            noise: 0.1,
        },
    ),
];

/// Looks up a preset by name (case-insensitive).
pub fn preset(name: &str) -> Option<GradientConfig> {
    let needle = name.to_ascii_lowercase();
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == needle)
        .map(|(_, config)| *config)
}

/// Names of all bundled presets, in declaration order.
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_resolves_by_name() {
        for name in preset_names() {
            assert!(preset(name).is_some(), "missing preset {name}");
        }
        assert_eq!(preset_names().len(), 8);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(preset("COSMIC"), preset("cosmic"));
        assert!(preset("does-not-exist").is_none());
    }

    #[test]
    fn preset_noise_stays_in_grain_range() {
        for name in preset_names() {
            let config = preset(name).unwrap();
            assert!((0.0..=1.0).contains(&config.noise));
        }
    }
}
