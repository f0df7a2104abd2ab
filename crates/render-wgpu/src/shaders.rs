/// WGSL shader for the ground plane.
///
/// The vertex stage applies yaw, pitch, the fixed look-at view and the
/// projection, in that order. The plane stays centred on the viewer; the
/// fragment stage shades a world-anchored grid at `local.xz + position`, so
/// moving scrolls the pattern under the camera.
pub const TERRAIN_SHADER: &str = r#"
struct Uniforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    yaw_rotation: mat4x4<f32>,
    pitch_rotation: mat4x4<f32>,
    position: vec2<f32>,
    vertex_spacing: f32,
    fog_distance: f32,
    fog_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) surface: vec2<f32>,
    @location(1) distance: f32,
};

@vertex
fn vs_terrain(@location(0) position: vec3<f32>) -> VertexOutput {
    let rotated = uniforms.pitch_rotation * uniforms.yaw_rotation * vec4<f32>(position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.projection * uniforms.view * rotated;
    out.surface = position.xz + uniforms.position;
    out.distance = length(position.xz);
    return out;
}

@fragment
fn fs_terrain(in: VertexOutput) -> @location(0) vec4<f32> {
    let cell = in.surface / uniforms.vertex_spacing;

    // Anti-aliased grid lines on cell boundaries.
    let edge = abs(fract(cell - 0.5) - 0.5) / max(fwidth(cell), vec2<f32>(1e-4));
    let line = 1.0 - min(min(edge.x, edge.y), 1.0);

    let parity = (i32(floor(cell.x)) + i32(floor(cell.y))) & 1;
    let base = select(vec3<f32>(0.16, 0.38, 0.14), vec3<f32>(0.21, 0.45, 0.18), parity == 1);
    let color = mix(base, vec3<f32>(0.82, 0.78, 0.58), line * 0.6);

    // Fade into the clear colour before the plane edge becomes visible.
    let fog = clamp(in.distance / uniforms.fog_distance, 0.0, 1.0);
    return vec4<f32>(mix(color, uniforms.fog_color.rgb, fog * fog), 1.0);
}
"#;
