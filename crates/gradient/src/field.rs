//! CPU reference implementation of the seven gradient fields.
//!
//! The GPU fragment shader in the `renderer` crate evaluates exactly this
//! math per pixel; these functions define the contract it is held to. Every
//! function here is pure: same inputs, same output, no hidden clock or RNG.
//! Trigonometric inputs are radians throughout and color mixes are
//! per-channel linear interpolation, matching GLSL `mix`.

use glam::{Vec2, Vec3};

use crate::color::normalize;
use crate::config::{GradientConfig, GradientType};

const PI: f32 = std::f32::consts::PI;

/// Inputs shared by every variant for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub kind: GradientType,
    pub color1: Vec3,
    pub color2: Vec3,
    pub color3: Vec3,
    pub speed: f32,
    pub scale: f32,
    /// Logical surface size; only silk, smoke, stripe and animated read it.
    /// Both components must be positive.
    pub resolution: Vec2,
}

impl FieldParams {
    pub fn from_config(config: &GradientConfig, resolution: Vec2) -> Self {
        Self {
            kind: config.kind,
            color1: Vec3::from(normalize(config.color1)),
            color2: Vec3::from(normalize(config.color2)),
            color3: Vec3::from(normalize(config.color3)),
            speed: config.speed,
            scale: config.scale,
            resolution,
        }
    }
}

/// Evaluates the configured variant at `uv` for raw elapsed `time` seconds.
///
/// Time is scaled by `speed` once up front, mirroring the shader's `main`;
/// variants that animate secondary terms apply `speed` again themselves.
pub fn evaluate(uv: Vec2, time: f32, params: &FieldParams) -> Vec3 {
    let t = time * params.speed;
    match params.kind {
        GradientType::Linear => linear(uv, t, params),
        GradientType::Conic => conic(uv, t, params),
        GradientType::Animated => animated(uv, t, params),
        GradientType::Wave => wave(uv, t, params),
        GradientType::Silk => silk(uv, t, params),
        GradientType::Smoke => smoke(uv, t, params),
        GradientType::Stripe => stripe(uv, t, params),
    }
}

/// Full per-pixel composition: variant dispatch plus grain.
pub fn shade(uv: Vec2, time: f32, noise: f32, params: &FieldParams) -> Vec3 {
    let color = evaluate(uv, time, params);
    apply_grain(color, uv, time * params.speed, noise)
}

/// Multiplicative film grain. A no-op for `noise <= 0.001`; at `noise = 1`
/// a pixel may darken or brighten by up to 40% depending on the hash value.
pub fn apply_grain(color: Vec3, uv: Vec2, time: f32, noise: f32) -> Vec3 {
    if noise <= 0.001 {
        return color;
    }
    let grain = hash21(uv * 200.0 + Vec2::splat(time * 0.1));
    color * (1.0 - noise * 0.4 + noise * grain * 0.4)
}

fn linear(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let t = (uv.y * p.scale + (uv.x * PI + time).sin() * 0.1).clamp(0.0, 1.0);
    if t < 0.5 {
        p.color1.lerp(p.color2, t * 2.0)
    } else {
        p.color2.lerp(p.color3, (t - 0.5) * 2.0)
    }
}

fn conic(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let pos = uv - Vec2::splat(0.5);
    let angle = pos.y.atan2(pos.x);
    let normalized_angle = (angle + PI) / (2.0 * PI);

    let t = fract(normalized_angle * p.scale + time * 0.3);
    let mut color = if t < 0.33 {
        p.color1.lerp(p.color2, smoothstep(0.0, 0.33, t))
    } else if t < 0.66 {
        p.color2.lerp(p.color3, smoothstep(0.33, 0.66, t))
    } else {
        p.color3.lerp(p.color1, smoothstep(0.66, 1.0, t))
    };

    let dist = pos.length();
    color += Vec3::splat((dist * 8.0 + time * 1.5).sin() * 0.03);
    color
}

fn animated(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let ratio = p.resolution.x / p.resolution.y;
    let mut tuv = uv - Vec2::splat(0.5);

    let degree = value_noise(Vec2::new(time * 0.1 * p.speed, tuv.x * tuv.y));
    tuv.y *= 1.0 / ratio;
    tuv = rotate(tuv, ((degree - 0.5) * 720.0 * p.scale + 180.0).to_radians());
    tuv.y *= ratio;

    let frequency = 5.0 * p.scale;
    let amplitude = 30.0;
    let speed = time * 2.0 * p.speed;
    tuv.x += (tuv.y * frequency + speed).sin() / amplitude;
    tuv.y += (tuv.x * frequency * 1.5 + speed).sin() / (amplitude * 0.5);

    let tilt = rotate(tuv, (-5.0f32).to_radians()).x;
    let layer1 = p.color1.lerp(p.color2, smoothstep(-0.3, 0.2, tilt));
    let layer2 = p.color2.lerp(p.color3, smoothstep(-0.3, 0.2, tilt));

    layer1.lerp(layer2, smoothstep(0.05, -0.2, tuv.y))
}

fn wave(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let wave1 = (uv.x * PI * p.scale * 0.8 + time * p.speed * 0.5).sin() * 0.1;
    let wave2 = (uv.x * PI * p.scale * 0.5 + time * p.speed * 0.3).sin() * 0.15;
    let wave3 = (uv.x * PI * p.scale * 1.2 + time * p.speed * 0.8).sin() * 0.2;

    let flowing_y = uv.y + wave1 + wave2 + wave3;
    let pattern = smoothstep(0.0, 1.0, flowing_y.clamp(0.0, 1.0));

    let mut color = if pattern < 0.33 {
        p.color1.lerp(p.color2, smoothstep(0.0, 0.33, pattern))
    } else if pattern < 0.66 {
        p.color2.lerp(p.color3, smoothstep(0.33, 0.66, pattern))
    } else {
        p.color3.lerp(p.color1, smoothstep(0.66, 1.0, pattern))
    };

    let variation = (uv.x * PI * 2.0 + time * p.speed).sin()
        * (uv.y * PI * 1.5 + time * p.speed * 0.7).cos()
        * 0.02;
    color += Vec3::splat(variation);

    color.clamp(Vec3::ZERO, Vec3::ONE)
}

fn silk(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let frag_coord = uv * p.resolution;
    let mut centered = (frag_coord * 2.0 - p.resolution) / p.resolution;
    centered *= p.scale;

    let dampening = 1.0 / (1.0 + p.scale * 0.1);

    let mut d = -time * p.speed * 0.5;
    let mut a = 0.0f32;
    for i in 0..8 {
        let fi = i as f32;
        a += (fi - d - a * centered.x).cos() * dampening;
        d += (centered.y * fi + a).sin() * dampening;
    }
    d += time * p.speed * 0.5;

    let patterns = Vec3::new(
        (centered.x * d + a).cos() * 0.5 + 0.5,
        (centered.y * a + d).cos() * 0.5 + 0.5,
        ((centered.x + centered.y) * (d + a) * 0.5).cos() * 0.5 + 0.5,
    );

    let color1_mix = p.color1.lerp(p.color2, patterns.x);
    let color2_mix = p.color2.lerp(p.color3, patterns.y);
    let color3_mix = p.color3.lerp(p.color1, patterns.z);

    let mut final_color = color1_mix.lerp(color2_mix, patterns.z);
    final_color = final_color.lerp(color3_mix, patterns.x * 0.5);

    let interference = Vec3::new(
        (centered.x * d).cos() * 0.6 + 0.4,
        (centered.y * a).cos() * 0.6 + 0.4,
        (a + d).cos() * 0.5 + 0.5,
    );
    let interference = cos_v(interference * cos_v(Vec3::new(d, a, 2.5)) * 0.5 + Vec3::splat(0.5));

    final_color.lerp(interference * final_color, 0.3)
}

fn smoke(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let mr = p.resolution.x.min(p.resolution.y);
    let frag_coord = uv * p.resolution;
    let mut pos = (frag_coord * 2.0 - p.resolution) / mr;
    pos *= p.scale;

    let warp_time = time * p.speed;
    for i in 1..10 {
        let fi = i as f32;
        let warped = Vec2::new(
            pos.x + 0.6 / fi * (fi * pos.y + warp_time + 0.3 * fi).sin() + 1.0,
            pos.y + 0.6 / fi * (fi * pos.x + warp_time + 0.3 * (fi + 10.0)).sin() - 1.4,
        );
        pos = warped;
    }

    let green = (1.0 - pos.y.sin()).clamp(0.0, 1.0);
    let blue = (pos.x + pos.y).sin() * 0.5 + 0.5;

    let color12 = p.color1.lerp(p.color2, green);
    let color = color12.lerp(p.color3, blue);

    color.clamp(Vec3::ZERO, Vec3::ONE)
}

fn stripe(uv: Vec2, time: f32, p: &FieldParams) -> Vec3 {
    let pos = ((uv * p.resolution * 2.0 - p.resolution) / (p.resolution.x + p.resolution.y)
        * 2.0)
        * p.scale;
    let t = time * 0.7;
    let mut a = 4.0 * pos.y - (-pos.x * 3.0 + pos.y - t).sin();
    a = smoothstep(
        a.cos() * 0.7,
        a.sin() * 0.7 + 1.0,
        (a - 4.0 * pos.y).cos() - (a + 3.0 * pos.x).sin(),
    );

    let warped = (a.cos() * pos + a.sin() * Vec2::new(-pos.y, pos.x)) * 0.5 + Vec2::splat(0.5);
    let mut color = p.color1.lerp(p.color2, warped.x);
    color = color.lerp(p.color3, warped.y);

    // The warped mix parameters can leave [0,1] far from center, which would
    // feed sqrt a negative channel. Clamp first so output stays finite.
    color = color.clamp(Vec3::ZERO, Vec3::ONE);
    color *= color + 0.6 * sqrt_v(color);

    color.clamp(Vec3::ZERO, Vec3::ONE)
}

/// GLSL-style `fract`.
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `smoothstep`, including the extrapolated behaviour for reversed
/// edges that the animated and stripe variants rely on.
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Equivalent of GLSL `v * Rot(a)` with `Rot(a) = mat2(c, -s, s, c)`.
fn rotate(v: Vec2, a: f32) -> Vec2 {
    let (s, c) = a.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

fn cos_v(v: Vec3) -> Vec3 {
    Vec3::new(v.x.cos(), v.y.cos(), v.z.cos())
}

fn sqrt_v(v: Vec3) -> Vec3 {
    Vec3::new(v.x.sqrt(), v.y.sqrt(), v.z.sqrt())
}

/// One-dimensional hash of a 2D coordinate, the grain source.
fn hash21(st: Vec2) -> f32 {
    fract((st.dot(Vec2::new(12.9898, 78.233))).sin() * 43758.5453)
}

/// 2D hash feeding the gradient value noise.
fn hash22(p: Vec2) -> Vec2 {
    let hashed = Vec2::new(
        p.dot(Vec2::new(2127.1, 81.17)),
        p.dot(Vec2::new(1269.5, 283.37)),
    );
    Vec2::new(
        fract(hashed.x.sin() * 43758.5453),
        fract(hashed.y.sin() * 43758.5453),
    )
}

/// Gradient value noise over the unit lattice, remapped to `[0, 1]`.
fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;

    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let corner = |offset: Vec2| (hash22(i + offset) * 2.0 - Vec2::ONE).dot(f - offset);

    let n = lerp(
        lerp(corner(Vec2::new(0.0, 0.0)), corner(Vec2::new(1.0, 0.0)), u.x),
        lerp(corner(Vec2::new(0.0, 1.0)), corner(Vec2::new(1.0, 1.0)), u.x),
        u.y,
    );
    0.5 + 0.5 * n
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::config::GradientConfig;

    fn params(kind: GradientType) -> FieldParams {
        let config = GradientConfig {
            color1: Rgb::new(226, 98, 75),
            color2: Rgb::new(255, 255, 255),
            color3: Rgb::new(30, 34, 159),
            speed: 1.0,
            scale: 1.0,
            kind,
            noise: 0.0,
        };
        FieldParams::from_config(&config, Vec2::new(800.0, 600.0))
    }

    fn uv_time_grid() -> impl Iterator<Item = (Vec2, f32)> {
        let coords = [0.0f32, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        let times = [0.0f32, 0.5, 1.0, 10.0, 123.456];
        coords.into_iter().flat_map(move |x| {
            coords.into_iter().flat_map(move |y| {
                times.into_iter().map(move |t| (Vec2::new(x, y), t))
            })
        })
    }

    #[test]
    fn every_variant_is_finite_over_the_grid() {
        for kind in GradientType::ALL {
            let p = params(kind);
            for (uv, time) in uv_time_grid() {
                let color = evaluate(uv, time, &p);
                assert!(
                    color.is_finite(),
                    "{kind} produced non-finite output at uv={uv:?} t={time}"
                );
            }
        }
    }

    #[test]
    fn clamped_variants_stay_in_unit_range() {
        for kind in [GradientType::Wave, GradientType::Smoke, GradientType::Stripe] {
            let p = params(kind);
            for (uv, time) in uv_time_grid() {
                let color = evaluate(uv, time, &p);
                for channel in [color.x, color.y, color.z] {
                    assert!(
                        (0.0..=1.0).contains(&channel),
                        "{kind} escaped [0,1] at uv={uv:?} t={time}: {color:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        for kind in GradientType::ALL {
            let p = params(kind);
            let uv = Vec2::new(0.37, 0.81);
            let first = evaluate(uv, 4.2, &p);
            let second = evaluate(uv, 4.2, &p);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn zero_noise_grain_is_a_no_op() {
        let color = Vec3::new(0.25, 0.5, 0.75);
        assert_eq!(apply_grain(color, Vec2::new(0.3, 0.7), 12.0, 0.0), color);
        // Below the epsilon counts as off too.
        assert_eq!(apply_grain(color, Vec2::new(0.3, 0.7), 12.0, 0.001), color);
    }

    #[test]
    fn full_noise_grain_stays_within_forty_percent() {
        let color = Vec3::ONE;
        for (uv, time) in uv_time_grid() {
            let grained = apply_grain(color, uv, time, 1.0);
            for channel in [grained.x, grained.y, grained.z] {
                assert!((0.6..=1.0 + 1e-6).contains(&channel), "grain out of bounds: {channel}");
            }
        }
    }

    #[test]
    fn linear_interpolates_between_endpoint_colors() {
        let p = params(GradientType::Linear);
        // At uv.y = 0 with time 0 the sine perturbation vanishes at uv.x = 0,
        // so t = 0 and the output is exactly color1.
        let bottom = evaluate(Vec2::new(0.0, 0.0), 0.0, &p);
        assert!((bottom - p.color1).length() < 1e-6);
        let top = evaluate(Vec2::new(0.0, 1.0), 0.0, &p);
        assert!((top - p.color3).length() < 1e-6);
    }

    #[test]
    fn value_noise_is_bounded() {
        for (uv, time) in uv_time_grid() {
            let n = value_noise(uv * 7.3 + Vec2::splat(time));
            assert!((0.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn resolution_sensitive_variants_respond_to_aspect() {
        // silk reads resolution; a different aspect must change the field.
        let mut p = params(GradientType::Silk);
        let wide = evaluate(Vec2::new(0.3, 0.6), 2.0, &p);
        p.resolution = Vec2::new(600.0, 800.0);
        let tall = evaluate(Vec2::new(0.3, 0.6), 2.0, &p);
        assert_ne!(wide, tall);
    }
}
