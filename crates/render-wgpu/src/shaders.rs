use std::borrow::Cow;
use std::path::Path;

use crate::error::RenderError;

/// WGSL shader for colored meshes transformed by one combined matrix.
///
/// Any replacement loaded with [`load_shader`] must keep the `vs_main` and
/// `fs_main` entry points, the uniform at group 0 binding 0, and the vertex
/// locations below.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    transform: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.transform * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

/// Read WGSL from `path`, or fall back to the built-in [`MESH_SHADER`].
pub fn load_shader(path: Option<&Path>) -> Result<Cow<'static, str>, RenderError> {
    let Some(path) = path else {
        return Ok(Cow::Borrowed(MESH_SHADER));
    };
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = source.len(), "loaded shader override");
    Ok(Cow::Owned(source))
}

/// Compile WGSL, turning validation failures into [`RenderError::Shader`].
pub(crate) fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::Shader {
            label: label.to_string(),
            message: err.to_string(),
        });
    }
    tracing::debug!(label, "shader compiled");
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_shader_declares_entry_points() {
        assert!(MESH_SHADER.contains("fn vs_main"));
        assert!(MESH_SHADER.contains("fn fs_main"));
        assert!(MESH_SHADER.contains("@group(0) @binding(0)"));
    }

    #[test]
    fn no_path_uses_builtin() {
        let source = load_shader(None).unwrap();
        assert!(matches!(source, Cow::Borrowed(_)));
        assert_eq!(source, MESH_SHADER);
    }

    #[test]
    fn override_is_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"// custom\n").unwrap();
        let source = load_shader(Some(file.path())).unwrap();
        assert_eq!(source, "// custom\n");
    }

    #[test]
    fn missing_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.wgsl");
        let err = load_shader(Some(&missing)).unwrap_err();
        assert!(matches!(err, RenderError::ShaderFile { .. }));
        assert!(err.to_string().contains("nope.wgsl"));
    }
}
