use serde::{Deserialize, Serialize};

/// Canonical fallback used whenever a color is missing or malformed.
///
/// The upstream design carried two different fallbacks (white in the
/// low-level normalizer, this warm tone in the high-level path); we settle on
/// the warm tone everywhere so a broken palette fails the same way no matter
/// which layer notices.
pub const FALLBACK_RGB: Rgb = Rgb {
    r: 226,
    g: 98,
    b: 75,
};

/// An sRGB color with 8-bit channels, the unit the public configuration
/// speaks in. Shader uniforms take the [`normalize`]d form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("hex color must have six digits, got {0:?}")]
    BadLength(String),
    #[error("hex color contains a non-hex digit: {0:?}")]
    BadDigit(String),
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(ColorError::BadLength(hex.to_string()));
    }
    if !digits.is_ascii() {
        return Err(ColorError::BadDigit(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::BadDigit(hex.to_string()))
    };
    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Formats a color as `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Maps 8-bit channels onto `[0.0, 1.0]` exactly as `channel / 255`.
pub fn normalize(rgb: Rgb) -> [f32; 3] {
    [
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
    ]
}

/// A color as it appears in user-facing configuration: either a hex string
/// or an `{ r, g, b }` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColorInput {
    Hex(String),
    Rgb(Rgb),
}

impl ColorInput {
    /// Resolves the input to a concrete color. Malformed hex strings fall
    /// back to [`FALLBACK_RGB`] rather than surfacing an error; a broken
    /// palette entry should never take the whole gradient down.
    pub fn resolve(&self) -> Rgb {
        match self {
            ColorInput::Hex(hex) => hex_to_rgb(hex).unwrap_or(FALLBACK_RGB),
            ColorInput::Rgb(rgb) => *rgb,
        }
    }
}

impl From<Rgb> for ColorInput {
    fn from(rgb: Rgb) -> Self {
        ColorInput::Rgb(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_rgb() {
        for hex in ["#000000", "#ffffff", "#e2624b", "#1e229f", "#0a0b0c"] {
            let rgb = hex_to_rgb(hex).unwrap();
            assert_eq!(rgb_to_hex(rgb), hex);
        }
    }

    #[test]
    fn hex_parses_without_hash_prefix() {
        assert_eq!(hex_to_rgb("e2624b").unwrap(), Rgb::new(226, 98, 75));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(
            hex_to_rgb("#fff"),
            Err(ColorError::BadLength("#fff".to_string()))
        );
        assert_eq!(
            hex_to_rgb("zzzzzz"),
            Err(ColorError::BadDigit("zzzzzz".to_string()))
        );
    }

    #[test]
    fn normalize_divides_each_channel_by_255() {
        let normalized = normalize(Rgb::new(0, 128, 255));
        assert_eq!(normalized, [0.0, 128.0 / 255.0, 1.0]);
        for channel in normalized {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn invalid_input_resolves_to_the_warm_fallback() {
        assert_eq!(ColorInput::Hex("nope".into()).resolve(), FALLBACK_RGB);
        let rgb = Rgb::new(1, 2, 3);
        assert_eq!(ColorInput::Rgb(rgb).resolve(), rgb);
    }
}
