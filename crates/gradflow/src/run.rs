use std::fs;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use gradient::{
    config_snippet, preset, preset_names, random_config, ColorInput, GradientConfig, GradientType,
};
use renderer::{run_windowed, RendererConfig, WindowRuntime};

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.list_presets {
        for name in preset_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let gradient = resolve_gradient(&cli)?;

    if cli.snippet {
        println!("{}", config_snippet(&gradient));
        return Ok(());
    }

    let config = RendererConfig {
        surface_size: cli.size.unwrap_or((1280, 720)),
        gradient,
        target_fps: cli.fps.filter(|fps| *fps > 0.0),
        title: "GradFlow".to_string(),
    };

    match cli.cycle {
        Some(seconds) if seconds > 0.0 => run_cycling(config, seconds, cli.seed),
        _ => run_windowed(config),
    }
}

/// Resolves the gradient to render. Precedence: explicit flags override the
/// config file, which overrides the preset, which overrides `--random`, which
/// overrides the stock default.
fn resolve_gradient(cli: &Cli) -> Result<GradientConfig> {
    let mut gradient = if let Some(path) = &cli.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        GradientConfig::from_toml_str(&text)?
    } else if let Some(name) = &cli.preset {
        preset(name).ok_or_else(|| anyhow!("unknown preset '{name}' (try --list-presets)"))?
    } else if cli.random {
        random_config(cli.seed)
    } else {
        GradientConfig::default()
    };

    // Malformed hex flags degrade to the warm fallback rather than aborting.
    if let Some(hex) = &cli.color1 {
        gradient.color1 = ColorInput::Hex(hex.clone()).resolve();
    }
    if let Some(hex) = &cli.color2 {
        gradient.color2 = ColorInput::Hex(hex.clone()).resolve();
    }
    if let Some(hex) = &cli.color3 {
        gradient.color3 = ColorInput::Hex(hex.clone()).resolve();
    }
    if let Some(speed) = cli.speed {
        gradient.speed = speed;
    }
    if let Some(scale) = cli.scale {
        gradient.scale = scale;
    }
    if let Some(kind) = &cli.kind {
        gradient.kind = GradientType::from_name(kind);
    }
    if let Some(noise) = cli.noise {
        gradient.noise = noise.clamp(0.0, 1.0);
    }

    Ok(gradient)
}

/// Runs the window on its own thread and pushes a fresh random palette down
/// the command channel on a fixed interval until the window closes.
fn run_cycling(config: RendererConfig, seconds: f32, seed: Option<u64>) -> Result<()> {
    let runtime = WindowRuntime::spawn(config)?;
    let interval = Duration::from_secs_f32(seconds);

    let mut iteration: u64 = 0;
    loop {
        thread::sleep(interval);
        iteration += 1;
        let next = random_config(seed.map(|seed| seed.wrapping_add(iteration)));
        tracing::info!(kind = %next.kind, iteration, "cycling to a new palette");
        if runtime.apply_config(next).is_err() {
            // Event loop is gone; the user closed the window.
            break;
        }
    }

    runtime.wait()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gradient::Rgb;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("gradflow").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_apply_without_flags() {
        let gradient = resolve_gradient(&cli(&[])).unwrap();
        assert_eq!(gradient, GradientConfig::default());
    }

    #[test]
    fn flags_override_the_preset() {
        let gradient =
            resolve_gradient(&cli(&["--preset", "cosmic", "--kind", "wave", "--speed", "2.5"]))
                .unwrap();
        let base = preset("cosmic").unwrap();
        assert_eq!(gradient.kind, GradientType::Wave);
        assert_eq!(gradient.speed, 2.5);
        assert_eq!(gradient.color1, base.color1);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(resolve_gradient(&cli(&["--preset", "nope"])).is_err());
    }

    #[test]
    fn unknown_kind_falls_back_to_animated() {
        let gradient = resolve_gradient(&cli(&["--kind", "unknown-value"])).unwrap();
        assert_eq!(gradient.kind, GradientType::Animated);
    }

    #[test]
    fn color_flags_parse_hex() {
        let gradient = resolve_gradient(&cli(&["--color1", "#102030"])).unwrap();
        assert_eq!(gradient.color1, Rgb::new(16, 32, 48));
    }

    #[test]
    fn noise_flag_is_clamped() {
        let gradient = resolve_gradient(&cli(&["--noise", "7.0"])).unwrap();
        assert_eq!(gradient.noise, 1.0);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let first = resolve_gradient(&cli(&["--random", "--seed", "9"])).unwrap();
        let second = resolve_gradient(&cli(&["--random", "--seed", "9"])).unwrap();
        assert_eq!(first, second);
    }
}
