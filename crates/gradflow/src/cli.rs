use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "gradflow",
    author,
    version,
    about = "Animated procedural gradient backgrounds",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Named preset to start from (see --list-presets).
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Load a gradient configuration from a TOML file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First palette color as `#rrggbb`.
    #[arg(long, value_name = "HEX")]
    pub color1: Option<String>,

    /// Second palette color as `#rrggbb`.
    #[arg(long, value_name = "HEX")]
    pub color2: Option<String>,

    /// Third palette color as `#rrggbb`.
    #[arg(long, value_name = "HEX")]
    pub color3: Option<String>,

    /// Animation speed multiplier.
    #[arg(long, value_name = "FACTOR")]
    pub speed: Option<f32>,

    /// Spatial frequency of the gradient field.
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f32>,

    /// Gradient variant: linear, conic, animated, wave, silk, smoke, stripe.
    /// Unknown names fall back to `animated`.
    #[arg(long, value_name = "NAME")]
    pub kind: Option<String>,

    /// Film grain amount in 0-1.
    #[arg(long, value_name = "AMOUNT")]
    pub noise: Option<f32>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Start from a random palette and variant.
    #[arg(long)]
    pub random: bool,

    /// Seed for --random, for reproducible palettes.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Apply a fresh random palette every N seconds while running.
    #[arg(long, value_name = "SECONDS")]
    pub cycle: Option<f32>,

    /// Print the embeddable config snippet for the resolved gradient, then exit.
    #[arg(long)]
    pub snippet: bool,

    /// List bundled presets and exit.
    #[arg(long)]
    pub list_presets: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got '{value}'"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_size_pairs() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("100X100"), Ok((100, 100)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x720").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn flags_parse_into_expected_fields() {
        let cli = Cli::parse_from([
            "gradflow",
            "--preset",
            "cosmic",
            "--kind",
            "silk",
            "--size",
            "640x480",
            "--noise",
            "0.2",
        ]);
        assert_eq!(cli.preset.as_deref(), Some("cosmic"));
        assert_eq!(cli.kind.as_deref(), Some("silk"));
        assert_eq!(cli.size, Some((640, 480)));
        assert_eq!(cli.noise, Some(0.2));
    }
}
