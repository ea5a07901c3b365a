/// WGSL for the instanced scene meshes.
///
/// Shading is a hemisphere ambient (sky above, dim bounce below) plus one
/// wrapped key light, so the underside of bouncing bodies stays readable
/// without a second pass.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
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
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);

    let sky = vec3<f32>(0.38, 0.40, 0.46);
    let ground = vec3<f32>(0.12, 0.11, 0.10);
    let hemi = mix(ground, sky, n.y * 0.5 + 0.5);

    // Half-Lambert wrap keeps the shadow side from going flat black.
    let key_dir = normalize(vec3<f32>(-0.45, 0.85, 0.3));
    let wrap = clamp(dot(n, key_dir) * 0.5 + 0.5, 0.0, 1.0);
    let key = vec3<f32>(0.72) * wrap * wrap;

    return vec4<f32>(in.color.rgb * (hemi + key), in.color.a);
}
"#;

/// WGSL for the collider wireframe overlay.
///
/// Segments dim with view distance so the overlay over the far reaches of
/// the floor does not wash out the bodies in front of the camera.
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) view_depth: f32,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    out.view_depth = out.clip_position.w;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    let fade = clamp(1.0 - in.view_depth / 120.0, 0.25, 1.0);
    return vec4<f32>(in.color.rgb * fade, in.color.a);
}
"#;
