/// WGSL shader for the flat-colored cubes.
///
/// Member and attribute names match `cubecross_render::binding`.
pub const CUBE_SHADER: &str = r#"
struct Uniforms {
    uProjectionMatrix: mat4x4<f32>,
    uModelViewMatrix: mat4x4<f32>,
    uMoveMatrix: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) aVertexPosition: vec3<f32>,
    @location(1) aVertexColor: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) vColor: vec4<f32>,
    @location(1) vPosition: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let position = vec4<f32>(vertex.aVertexPosition, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.uProjectionMatrix
        * uniforms.uModelViewMatrix
        * uniforms.uMoveMatrix
        * position;
    out.vColor = vec4<f32>(vertex.aVertexColor, 1.0);
    out.vPosition = position;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.vColor;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use cubecross_render::FrameUniforms;
    use cubecross_render::binding::ALL_NAMES;

    fn parse() -> naga::Module {
        naga::front::wgsl::parse_str(CUBE_SHADER).expect("cube shader should parse")
    }

    #[test]
    fn shader_validates() {
        let module = parse();
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).expect("cube shader should validate");
    }

    #[test]
    fn shader_has_entry_points() {
        let module = parse();
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn shader_uses_binding_names() {
        for name in ALL_NAMES {
            assert!(CUBE_SHADER.contains(name), "shader is missing {name}");
        }
    }

    #[test]
    fn uniform_block_matches_cpu_layout() {
        let module = parse();
        let span = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { span, .. }) if name == "Uniforms" => {
                    Some(*span)
                }
                _ => None,
            })
            .expect("Uniforms struct");
        assert_eq!(span as usize, std::mem::size_of::<FrameUniforms>());
    }
}
