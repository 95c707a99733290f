//! Serializes a configuration to an embeddable source literal.
//!
//! The output is the `config={{ ... }}` prop string a host front-end pastes
//! into its markup. Writing it to the OS clipboard is left to the caller.

use crate::config::GradientConfig;

pub fn config_snippet(config: &GradientConfig) -> String {
    format!(
        "config={{{{\n        color1: {{ r: {}, g: {}, b: {} }},\n        color2: {{ r: {}, g: {}, b: {} }},\n        color3: {{ r: {}, g: {}, b: {} }},\n        speed: {},\n        scale: {},\n        type: '{}',\n        noise: {}\n      }}}}",
        config.color1.r,
        config.color1.g,
        config.color1.b,
        config.color2.r,
        config.color2.g,
        config.color2.b,
        config.color3.r,
        config.color3.g,
        config.color3.b,
        format_number(config.speed),
        format_number(config.scale),
        config.kind,
        format_number(config.noise),
    )
}

/// Formats a float the way a hand-written literal would look: no trailing
/// `.0` for whole values.
fn format_number(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e6 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::config::GradientType;

    #[test]
    fn snippet_matches_the_embeddable_literal_shape() {
        let config = GradientConfig {
            color1: Rgb::new(226, 98, 75),
            color2: Rgb::new(255, 255, 255),
            color3: Rgb::new(30, 34, 159),
            speed: 1.0,
            scale: 1.5,
            kind: GradientType::Animated,
            noise: 0.0,
        };
        let snippet = config_snippet(&config);
        assert!(snippet.starts_with("config={{"));
        assert!(snippet.ends_with("}}"));
        assert!(snippet.contains("color1: { r: 226, g: 98, b: 75 }"));
        assert!(snippet.contains("speed: 1,"));
        assert!(snippet.contains("scale: 1.5,"));
        assert!(snippet.contains("type: 'animated',"));
        assert!(snippet.contains("noise: 0"));
    }

    #[test]
    fn whole_floats_lose_their_decimal_point() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.25), "0.25");
    }
}
