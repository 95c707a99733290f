//! Static GLSL assets and shader module compilation.
//!
//! The fragment shader is the versioned asset of this crate: it carries all
//! seven gradient variants behind the `kind` selector uniform so the pipeline
//! is compiled exactly once per surface. The CPU reference for this math
//! lives in `gradient::field`; changes must land in both places.

use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the full-viewport quad vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gradient quad vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the seven-variant gradient fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gradient fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Full-viewport quad as a four-vertex triangle strip; UVs span `[0,1]^2`
/// with the origin at the bottom-left, matching the field math.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[4] = vec2[4](
    vec2(-1.0, -1.0),
    vec2(1.0, -1.0),
    vec2(-1.0, 1.0),
    vec2(1.0, 1.0)
);

void main() {
    vec2 pos = positions[uint(gl_VertexIndex)];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// The uniform block layout must match `GradientUniforms` in `gpu.rs`.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform GradientParams {
    vec4 color1;
    vec4 color2;
    vec4 color3;
    vec2 resolution;
    float time;
    float speed;
    float scale;
    float noise_amount;
    int kind;
    float _pad;
} ubo;

#define PI 3.14159265359

float grain_hash(vec2 st) {
    return fract(sin(dot(st, vec2(12.9898, 78.233))) * 43758.5453);
}

mat2 rot(float a) {
    float s = sin(a);
    float c = cos(a);
    return mat2(c, -s, s, c);
}

vec2 hash22(vec2 p) {
    p = vec2(dot(p, vec2(2127.1, 81.17)), dot(p, vec2(1269.5, 283.37)));
    return fract(sin(p) * 43758.5453);
}

float value_noise(in vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);

    vec2 u = f * f * (3.0 - 2.0 * f);
    float n = mix(mix(dot(-1.0 + 2.0 * hash22(i + vec2(0.0, 0.0)), f - vec2(0.0, 0.0)),
                      dot(-1.0 + 2.0 * hash22(i + vec2(1.0, 0.0)), f - vec2(1.0, 0.0)), u.x),
                  mix(dot(-1.0 + 2.0 * hash22(i + vec2(0.0, 1.0)), f - vec2(0.0, 1.0)),
                      dot(-1.0 + 2.0 * hash22(i + vec2(1.0, 1.0)), f - vec2(1.0, 1.0)), u.x), u.y);
    return 0.5 + 0.5 * n;
}

vec3 linear_gradient(vec2 uv, float time) {
    float t = (uv.y * ubo.scale) + sin(uv.x * PI + time) * 0.1;
    t = clamp(t, 0.0, 1.0);

    return t < 0.5
        ? mix(ubo.color1.rgb, ubo.color2.rgb, t * 2.0)
        : mix(ubo.color2.rgb, ubo.color3.rgb, (t - 0.5) * 2.0);
}

vec3 conic_gradient(vec2 uv, float time) {
    vec2 pos = uv - vec2(0.5);

    float angle = atan(pos.y, pos.x);
    float normalized_angle = (angle + PI) / (2.0 * PI);

    float t = fract(normalized_angle * ubo.scale + time * 0.3);

    vec3 color;
    if (t < 0.33) {
        color = mix(ubo.color1.rgb, ubo.color2.rgb, smoothstep(0.0, 0.33, t));
    } else if (t < 0.66) {
        color = mix(ubo.color2.rgb, ubo.color3.rgb, smoothstep(0.33, 0.66, t));
    } else {
        color = mix(ubo.color3.rgb, ubo.color1.rgb, smoothstep(0.66, 1.0, t));
    }

    float dist = length(pos);
    color += sin(dist * 8.0 + time * 1.5) * 0.03;

    return color;
}

vec3 animated_gradient(vec2 uv, float time) {
    float ratio = ubo.resolution.x / ubo.resolution.y;
    vec2 tuv = uv - 0.5;

    float degree = value_noise(vec2(time * 0.1 * ubo.speed, tuv.x * tuv.y));
    tuv.y *= 1.0 / ratio;
    tuv *= rot(radians((degree - 0.5) * 720.0 * ubo.scale + 180.0));
    tuv.y *= ratio;

    float frequency = 5.0 * ubo.scale;
    float amplitude = 30.0;
    float speed = time * 2.0 * ubo.speed;
    tuv.x += sin(tuv.y * frequency + speed) / amplitude;
    tuv.y += sin(tuv.x * frequency * 1.5 + speed) / (amplitude * 0.5);

    float tilt = (tuv * rot(radians(-5.0))).x;
    vec3 layer1 = mix(ubo.color1.rgb, ubo.color2.rgb, smoothstep(-0.3, 0.2, tilt));
    vec3 layer2 = mix(ubo.color2.rgb, ubo.color3.rgb, smoothstep(-0.3, 0.2, tilt));

    return mix(layer1, layer2, smoothstep(0.05, -0.2, tuv.y));
}

vec3 wave_gradient(vec2 uv, float time) {
    float wave1 = sin(uv.x * PI * ubo.scale * 0.8 + time * ubo.speed * 0.5) * 0.1;
    float wave2 = sin(uv.x * PI * ubo.scale * 0.5 + time * ubo.speed * 0.3) * 0.15;
    float wave3 = sin(uv.x * PI * ubo.scale * 1.2 + time * ubo.speed * 0.8) * 0.2;

    float flowing_y = uv.y + wave1 + wave2 + wave3;
    float pattern = smoothstep(0.0, 1.0, clamp(flowing_y, 0.0, 1.0));

    vec3 color;
    if (pattern < 0.33) {
        color = mix(ubo.color1.rgb, ubo.color2.rgb, smoothstep(0.0, 0.33, pattern));
    } else if (pattern < 0.66) {
        color = mix(ubo.color2.rgb, ubo.color3.rgb, smoothstep(0.33, 0.66, pattern));
    } else {
        color = mix(ubo.color3.rgb, ubo.color1.rgb, smoothstep(0.66, 1.0, pattern));
    }

    float variation = sin(uv.x * PI * 2.0 + time * ubo.speed) *
                      cos(uv.y * PI * 1.5 + time * ubo.speed * 0.7) * 0.02;
    color += variation;

    return clamp(color, 0.0, 1.0);
}

vec3 silk_gradient(vec2 uv, float time) {
    vec2 frag_coord = uv * ubo.resolution;
    vec2 centered = (frag_coord * 2.0 - ubo.resolution) / ubo.resolution;
    centered *= ubo.scale;

    float dampening = 1.0 / (1.0 + ubo.scale * 0.1);

    float d = -time * ubo.speed * 0.5;
    float a = 0.0;

    for (float i = 0.0; i < 8.0; ++i) {
        a += cos(i - d - a * centered.x) * dampening;
        d += sin(centered.y * i + a) * dampening;
    }

    d += time * ubo.speed * 0.5;

    vec3 patterns = vec3(
        cos(centered.x * d + a) * 0.5 + 0.5,
        cos(centered.y * a + d) * 0.5 + 0.5,
        cos((centered.x + centered.y) * (d + a) * 0.5) * 0.5 + 0.5
    );

    vec3 color1_mix = mix(ubo.color1.rgb, ubo.color2.rgb, patterns.x);
    vec3 color2_mix = mix(ubo.color2.rgb, ubo.color3.rgb, patterns.y);
    vec3 color3_mix = mix(ubo.color3.rgb, ubo.color1.rgb, patterns.z);

    vec3 final_color = mix(color1_mix, color2_mix, patterns.z);
    final_color = mix(final_color, color3_mix, patterns.x * 0.5);

    vec3 interference = vec3(cos(centered * vec2(d, a)) * 0.6 + 0.4, cos(a + d) * 0.5 + 0.5);
    interference = cos(interference * cos(vec3(d, a, 2.5)) * 0.5 + 0.5);

    return mix(final_color, interference * final_color, 0.3);
}

vec3 smoke_gradient(vec2 uv, float time) {
    float mr = min(ubo.resolution.x, ubo.resolution.y);
    vec2 frag_coord = uv * ubo.resolution;
    vec2 p = (2.0 * frag_coord - ubo.resolution) / mr;

    p *= ubo.scale;

    float warp_time = time * ubo.speed;

    for (int i = 1; i < 10; i++) {
        vec2 newp = p;
        float fi = float(i);
        newp.x += 0.6 / fi * sin(fi * p.y + warp_time + 0.3 * fi) + 1.0;
        newp.y += 0.6 / fi * sin(fi * p.x + warp_time + 0.3 * (fi + 10.0)) - 1.4;
        p = newp;
    }

    float green_pattern = clamp(1.0 - sin(p.y), 0.0, 1.0);
    float blue_pattern = sin(p.x + p.y) * 0.5 + 0.5;

    vec3 color12 = mix(ubo.color1.rgb, ubo.color2.rgb, green_pattern);
    vec3 color = mix(color12, ubo.color3.rgb, blue_pattern);

    return clamp(color, 0.0, 1.0);
}

vec3 stripe_gradient(vec2 uv, float time) {
    vec2 p = ((uv * ubo.resolution * 2.0 - ubo.resolution) /
              (ubo.resolution.x + ubo.resolution.y) * 2.0) * ubo.scale;
    float t = time * 0.7;
    float a = 4.0 * p.y - sin(-p.x * 3.0 + p.y - t);
    a = smoothstep(cos(a) * 0.7, sin(a) * 0.7 + 1.0, cos(a - 4.0 * p.y) - sin(a + 3.0 * p.x));

    vec2 warped = (cos(a) * p + sin(a) * vec2(-p.y, p.x)) * 0.5 + 0.5;
    vec3 color = mix(ubo.color1.rgb, ubo.color2.rgb, warped.x);
    color = mix(color, ubo.color3.rgb, warped.y);

    // Clamp before the tone curve: the warped mix can extrapolate below
    // zero and sqrt of a negative channel would poison the frame.
    color = clamp(color, 0.0, 1.0);
    color *= color + 0.6 * sqrt(color);

    return clamp(color, 0.0, 1.0);
}

void main() {
    vec2 uv = v_uv;
    float time = ubo.time * ubo.speed;

    vec3 color;

    if (ubo.kind == 0) {
        color = linear_gradient(uv, time);
    } else if (ubo.kind == 1) {
        color = conic_gradient(uv, time);
    } else if (ubo.kind == 2) {
        color = animated_gradient(uv, time);
    } else if (ubo.kind == 3) {
        color = wave_gradient(uv, time);
    } else if (ubo.kind == 4) {
        color = silk_gradient(uv, time);
    } else if (ubo.kind == 5) {
        color = smoke_gradient(uv, time);
    } else if (ubo.kind == 6) {
        color = stripe_gradient(uv, time);
    } else {
        color = animated_gradient(uv, time);
    }

    if (ubo.noise_amount > 0.001) {
        float grain = grain_hash(uv * 200.0 + time * 0.1);
        color *= (1.0 - ubo.noise_amount * 0.4 + ubo.noise_amount * grain * 0.4);
    }

    out_color = vec4(color, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_shader_dispatches_all_seven_variants() {
        for selector in 0..7 {
            assert!(
                FRAGMENT_SHADER_GLSL.contains(&format!("ubo.kind == {selector}")),
                "selector {selector} missing from dispatch"
            );
        }
        // Unknown selectors must fall through to the animated variant.
        assert!(FRAGMENT_SHADER_GLSL.contains("} else {\n        color = animated_gradient(uv, time);"));
    }

    #[test]
    fn uniform_block_fields_match_the_cpu_struct_order() {
        let block_start = FRAGMENT_SHADER_GLSL
            .find("uniform GradientParams")
            .expect("uniform block present");
        let block = &FRAGMENT_SHADER_GLSL[block_start..block_start + 400];
        let order = [
            "vec4 color1", "vec4 color2", "vec4 color3", "vec2 resolution",
            "float time", "float speed", "float scale", "float noise_amount",
            "int kind",
        ];
        let mut last = 0;
        for field in order {
            let at = block.find(field).unwrap_or_else(|| panic!("{field} missing"));
            assert!(at > last, "{field} out of order");
            last = at;
        }
    }
}
