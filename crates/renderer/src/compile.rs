use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use wgpu::naga::ShaderStage;

use crate::types::ShaderSources;

/// Pipeline stage a GLSL source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn naga(self) -> ShaderStage {
        match self {
            Stage::Vertex => ShaderStage::Vertex,
            Stage::Fragment => ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader at {}", path.display())]
    Read {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader '{label}' failed to compile:\n{message}")]
    Compile {
        stage: Stage,
        label: String,
        message: String,
    },
}

/// Vertex and fragment GLSL ready to hand to the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

/// Resolves the configured shader sources into GLSL text.
pub fn load_sources(sources: &ShaderSources) -> Result<ProgramSource, ShaderError> {
    match sources {
        ShaderSources::Builtin => Ok(ProgramSource {
            label: "builtin".to_string(),
            vertex: BUILTIN_VERTEX_GLSL.to_string(),
            fragment: BUILTIN_FRAGMENT_GLSL.to_string(),
        }),
        ShaderSources::Files { vertex, fragment } => Ok(ProgramSource {
            label: vertex
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("shader")
                .to_string(),
            vertex: read_stage(Stage::Vertex, vertex)?,
            fragment: read_stage(Stage::Fragment, fragment)?,
        }),
    }
}

fn read_stage(stage: Stage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrites the `#version` directive to the one naga's GLSL frontend accepts.
///
/// Desktop-GL sources usually open with `#version 330 core`; the directive is
/// replaced in place (keeping line numbers stable for diagnostics) or prepended
/// when missing.
///
/// Only the version line changes. Every uniform, texture, and sampler still
/// needs explicit `layout(set = N, binding = M)` qualifiers, and loose
/// `uniform vec3 ourColor;` declarations must move into the `Globals` block at
/// set 0, binding 0.
pub fn normalize_glsl(source: &str) -> String {
    let mut replaced = false;
    let mut lines = Vec::new();
    for line in source.lines() {
        if !replaced && line.trim_start().starts_with("#version") {
            lines.push(GLSL_VERSION_DIRECTIVE);
            replaced = true;
        } else {
            lines.push(line);
        }
    }

    let mut normalized = String::with_capacity(source.len() + GLSL_VERSION_DIRECTIVE.len() + 1);
    if !replaced {
        normalized.push_str(GLSL_VERSION_DIRECTIVE);
        normalized.push('\n');
    }
    for line in lines {
        normalized.push_str(line);
        normalized.push('\n');
    }
    normalized
}

/// Compiles one GLSL stage, surfacing validation failures as [`ShaderError`].
///
/// wgpu reports shader errors asynchronously through the device error sink, so
/// creation is wrapped in a validation error scope that is popped immediately.
pub(crate) fn compile_module(
    device: &wgpu::Device,
    label: &str,
    stage: Stage,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let normalized = normalize_glsl(source);
    let module_label = format!("{label} {stage}");

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&module_label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(normalized),
            stage: stage.naga(),
            defines: &[],
        },
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        let mut message = error.to_string();
        if let Some(hint) = binding_hint(source) {
            message.push_str("\nhint: ");
            message.push_str(&hint);
        }
        return Err(ShaderError::Compile {
            stage,
            label: label.to_string(),
            message,
        });
    }

    tracing::debug!(%stage, label, "compiled shader stage");
    Ok(module)
}

/// Points at the first `uniform` declaration lacking a `binding` qualifier.
fn binding_hint(source: &str) -> Option<String> {
    source.lines().enumerate().find_map(|(index, line)| {
        let code = line.split("//").next().unwrap_or_default().trim();
        let declares_uniform = code.split_whitespace().any(|token| token == "uniform");
        (declares_uniform && !code.contains("binding")).then(|| {
            format!(
                "line {}: `{code}` has no `layout(set = N, binding = M)`; \
                 move plain uniforms into `layout(std140, set = 0, binding = 0) uniform Globals {{ vec4 ourColor; float time; }};`",
                index + 1
            )
        })
    })
}

const GLSL_VERSION_DIRECTIVE: &str = "#version 450";

/// Passthrough vertex shader: forwards position and per-vertex color.
const BUILTIN_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec3 position;
layout(location = 1) in vec3 color;

layout(location = 0) out vec3 ourColor;

void main() {
    gl_Position = vec4(position, 1.0);
    ourColor = color;
}
";

/// Writes the interpolated vertex color.
const BUILTIN_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec3 ourColor;
layout(location = 0) out vec4 color;

void main() {
    color = vec4(ourColor, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ColorVertex, TexturedVertex};
    use crate::gpu::uniforms::ColorUniforms;
    use std::fs;
    use tempfile::TempDir;
    use wgpu::naga;

    const SHADER_VS: &str = include_str!("../../../shaders/shader.vs");
    const SHADER_FRAG: &str = include_str!("../../../shaders/shader.frag");
    const TEXTURED_VS: &str = include_str!("../../../shaders/textured.vs");
    const TEXTURED_FRAG: &str = include_str!("../../../shaders/textured.frag");

    fn parse_and_validate(name: &str, stage: ShaderStage, source: &str) -> naga::Module {
        let module = naga::front::glsl::Frontend::default()
            .parse(
                &naga::front::glsl::Options::from(stage),
                &normalize_glsl(source),
            )
            .unwrap_or_else(|err| panic!("{name} failed to parse: {err:?}"));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .unwrap_or_else(|err| panic!("{name} failed validation: {err:?}"));
        module
    }

    fn location(binding: &Option<naga::Binding>) -> Option<u32> {
        match binding {
            Some(naga::Binding::Location { location, .. }) => Some(*location),
            _ => None,
        }
    }

    fn input_locations(module: &naga::Module) -> Vec<u32> {
        let mut locations: Vec<u32> = module.entry_points[0]
            .function
            .arguments
            .iter()
            .filter_map(|arg| location(&arg.binding))
            .collect();
        locations.sort_unstable();
        locations
    }

    fn output_locations(module: &naga::Module) -> Vec<u32> {
        let Some(result) = &module.entry_points[0].function.result else {
            return Vec::new();
        };
        let mut locations: Vec<u32> = match &module.types[result.ty].inner {
            naga::TypeInner::Struct { members, .. } if result.binding.is_none() => members
                .iter()
                .filter_map(|member| location(&member.binding))
                .collect(),
            _ => location(&result.binding).into_iter().collect(),
        };
        locations.sort_unstable();
        locations
    }

    fn resource_bindings(module: &naga::Module) -> Vec<(u32, u32)> {
        let mut bindings: Vec<(u32, u32)> = module
            .global_variables
            .iter()
            .filter_map(|(_, var)| var.binding.as_ref())
            .map(|binding| (binding.group, binding.binding))
            .collect();
        bindings.sort_unstable();
        bindings
    }

    fn globals_block_size(module: &naga::Module) -> Option<u32> {
        module
            .global_variables
            .iter()
            .map(|(_, var)| var)
            .find(|var| {
                var.space == naga::AddressSpace::Uniform
                    && var.binding
                        == Some(naga::ResourceBinding {
                            group: 0,
                            binding: 0,
                        })
            })
            .map(|var| module.types[var.ty].inner.size(module.to_ctx()))
    }

    fn layout_locations(layout: &wgpu::VertexBufferLayout<'_>) -> Vec<u32> {
        let mut locations: Vec<u32> = layout
            .attributes
            .iter()
            .map(|attr| attr.shader_location)
            .collect();
        locations.sort_unstable();
        locations
    }

    #[test]
    fn bundled_programs_match_vertex_layouts() {
        let programs = [
            (
                "builtin",
                BUILTIN_VERTEX_GLSL,
                BUILTIN_FRAGMENT_GLSL,
                ColorVertex::layout(),
            ),
            ("shader", SHADER_VS, SHADER_FRAG, ColorVertex::layout()),
            (
                "textured",
                TEXTURED_VS,
                TEXTURED_FRAG,
                TexturedVertex::layout(),
            ),
        ];

        for (name, vertex, fragment, layout) in programs {
            let vs = parse_and_validate(name, ShaderStage::Vertex, vertex);
            let fs = parse_and_validate(name, ShaderStage::Fragment, fragment);

            assert_eq!(
                input_locations(&vs),
                layout_locations(&layout),
                "{name}: vertex inputs differ from the vertex buffer layout"
            );
            let varyings = output_locations(&vs);
            for input in input_locations(&fs) {
                assert!(
                    varyings.contains(&input),
                    "{name}: fragment input {input} is not written by the vertex stage"
                );
            }
            assert_eq!(output_locations(&fs), vec![0], "{name}: color output");
        }
    }

    #[test]
    fn bundled_fragment_shaders_bind_globals_block() {
        let expected = std::mem::size_of::<ColorUniforms>() as u32;
        for (name, source) in [("shader.frag", SHADER_FRAG), ("textured.frag", TEXTURED_FRAG)] {
            let module = parse_and_validate(name, ShaderStage::Fragment, source);
            assert_eq!(globals_block_size(&module), Some(expected), "{name}");
        }

        let textured = parse_and_validate("textured.frag", ShaderStage::Fragment, TEXTURED_FRAG);
        assert_eq!(resource_bindings(&textured), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn desktop_version_lines_still_validate() {
        let source = SHADER_VS.replacen("#version 450", "#version 330 core", 1);
        parse_and_validate("shader.vs (330 core)", ShaderStage::Vertex, &source);
    }

    #[test]
    fn binding_hint_flags_plain_uniforms() {
        let source = "#version 330 core\nout vec4 FragColor;\nuniform vec3 ourColor; // set from CPU\n";
        let hint = binding_hint(source).unwrap();
        assert!(hint.starts_with("line 3:"), "{hint}");
        assert!(hint.contains("uniform vec3 ourColor;"), "{hint}");
        assert!(!hint.contains("set from CPU"), "{hint}");

        assert_eq!(binding_hint(SHADER_FRAG), None);
        assert_eq!(binding_hint(TEXTURED_FRAG), None);
        assert_eq!(binding_hint("// uniform vec3 commented;\n"), None);
    }

    #[test]
    fn normalize_replaces_desktop_version() {
        let source = "#version 330 core\nvoid main() {}\n";
        let normalized = normalize_glsl(source);
        assert!(normalized.starts_with("#version 450\n"));
        assert!(!normalized.contains("330"));
        assert_eq!(normalized.lines().count(), source.lines().count());
    }

    #[test]
    fn normalize_prepends_missing_version() {
        let normalized = normalize_glsl("void main() {}");
        assert_eq!(normalized, "#version 450\nvoid main() {}\n");
    }

    #[test]
    fn normalize_only_touches_first_directive() {
        let source = "  #version 330 core\n// #version mention\n#version 100\n";
        let normalized = normalize_glsl(source);
        assert_eq!(normalized.matches("#version 450").count(), 1);
        assert!(normalized.contains("#version 100"));
    }

    #[test]
    fn builtin_sources_declare_matching_interface() {
        let program = load_sources(&ShaderSources::Builtin).unwrap();
        assert_eq!(program.label, "builtin");
        assert!(program.vertex.contains("layout(location = 0) out vec3 ourColor"));
        assert!(program.fragment.contains("layout(location = 0) in vec3 ourColor"));
    }

    #[test]
    fn file_sources_are_read_from_disk() {
        let dir = TempDir::new().unwrap();
        let vertex = dir.path().join("shader.vs");
        let fragment = dir.path().join("shader.frag");
        fs::write(&vertex, "// vertex").unwrap();
        fs::write(&fragment, "// fragment").unwrap();

        let program = load_sources(&ShaderSources::Files {
            vertex: vertex.clone(),
            fragment,
        })
        .unwrap();
        assert_eq!(program.label, "shader");
        assert_eq!(program.vertex, "// vertex");
        assert_eq!(program.fragment, "// fragment");
    }

    #[test]
    fn missing_fragment_file_reports_stage() {
        let dir = TempDir::new().unwrap();
        let vertex = dir.path().join("shader.vs");
        fs::write(&vertex, "// vertex").unwrap();

        let err = load_sources(&ShaderSources::Files {
            vertex,
            fragment: dir.path().join("missing.frag"),
        })
        .unwrap_err();
        match err {
            ShaderError::Read { stage, path, .. } => {
                assert_eq!(stage, Stage::Fragment);
                assert!(path.ends_with("missing.frag"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
