/// WGSL shader for every box in the scene: instanced unit cubes with fog,
/// hash-noise variation, a vertical glow, a slow pulse and a theme tint.
pub const BOX_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    cam_pos: vec3<f32>,
    time: f32,
    theme: f32,
    fog_start: f32,
    fog_end: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(1) model_0: vec4<f32>,
    @location(2) model_1: vec4<f32>,
    @location(3) model_2: vec4<f32>,
    @location(4) model_3: vec4<f32>,
    @location(5) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.color = instance.color;
    return out;
}

fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(127.1, 311.7))) * 43758.5453123);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let p = in.world_pos;
    let dist = length(p - uniforms.cam_pos);
    let fog = smoothstep(uniforms.fog_start, uniforms.fog_end, dist);
    let tint = mix(vec3<f32>(0.9, 0.25, 1.0), vec3<f32>(0.2, 0.7, 1.0), uniforms.theme);

    let n = hash(p.xz * 0.12) * 0.6 + 0.4;
    let glow = 0.35 + 0.65 * smoothstep(0.0, 1.0, abs(p.y) * 0.12 + n * 0.25);
    let pulse = 0.85 + 0.15 * sin(uniforms.time * 1.2 + p.x * 0.2 + p.z * 0.2);

    var col = in.color.rgb * glow * pulse;
    col += 0.06 * tint * smoothstep(-0.2, 2.2, p.y);
    let sky = mix(
        vec3<f32>(0.03, 0.02, 0.06),
        vec3<f32>(0.07, 0.05, 0.11),
        clamp((p.y + 2.0) / 8.0, 0.0, 1.0),
    );
    return vec4<f32>(mix(col, sky, fog), 1.0);
}
"#;
