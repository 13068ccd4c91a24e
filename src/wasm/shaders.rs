// GLSL ES 3.00 sources for the two point programs.

/// Blends sphere and text layouts, then pushes each point outward.
/// Must agree with `animation::particle_position`.
pub const MORPH_VERTEX: &str = r#"#version 300 es
in vec3 positionSphere;
in vec3 positionText;
in float aRandom;

uniform mat4 uProjection;
uniform mat4 uView;
uniform mat4 uModel;
uniform float uTime;
uniform float uMix;
uniform float uExplosion;
uniform float uPixelRatio;

out float vMix;
out float vRandom;

void main() {
    vec3 base = mix(positionSphere, positionText, uMix);
    float len = length(base);
    vec3 dir = len > 0.0 ? base / len : vec3(0.0);
    vec3 pos = base + dir * uExplosion * aRandom;

    vec4 viewPos = uView * uModel * vec4(pos, 1.0);
    gl_Position = uProjection * viewPos;

    float twinkle = 0.8 + 0.2 * sin(uTime * 3.0 + aRandom * 6.2831);
    gl_PointSize = (2.0 + aRandom * 2.0) * twinkle * uPixelRatio * (140.0 / max(-viewPos.z, 1.0));

    vMix = uMix;
    vRandom = aRandom;
}
"#;

pub const MORPH_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform vec3 uColor;
uniform vec3 uColorText;

in float vMix;
in float vRandom;

out vec4 fragColor;

void main() {
    float d = length(gl_PointCoord - vec2(0.5));
    if (d > 0.5) discard;
    float glow = pow(1.0 - d * 2.0, 1.5);
    vec3 color = mix(uColor, uColorText, vMix);
    fragColor = vec4(color, glow * (0.6 + 0.4 * vRandom));
}
"#;

/// Static ambient field; only `uTime` moves it.
pub const BACKGROUND_VERTEX: &str = r#"#version 300 es
in vec3 position;
in float aRandom;
in float aSize;

uniform mat4 uProjection;
uniform mat4 uView;
uniform float uTime;
uniform float uPixelRatio;

out float vShimmer;

void main() {
    vec4 viewPos = uView * vec4(position, 1.0);
    gl_Position = uProjection * viewPos;

    vShimmer = 0.5 + 0.5 * sin(uTime * (0.5 + aRandom) + aRandom * 6.2831);
    gl_PointSize = aSize * uPixelRatio * (100.0 / max(-viewPos.z, 1.0));
}
"#;

pub const BACKGROUND_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform vec3 uColor;
uniform float uOpacity;

in float vShimmer;

out vec4 fragColor;

void main() {
    float d = length(gl_PointCoord - vec2(0.5));
    if (d > 0.5) discard;
    float falloff = 1.0 - d * 2.0;
    fragColor = vec4(uColor, falloff * vShimmer * uOpacity);
}
"#;
