//! Layers CLI flags over `learngl.toml` over built-in defaults to produce the
//! `RendererConfig` handed to the renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use renderer::{RendererConfig, ShaderSources, Variant};

use crate::cli::RunArgs;
use crate::config::FileConfig;
use crate::paths::AppPaths;

/// Configuration file picked for this run and whether it was explicitly requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub explicit: bool,
}

impl ConfigLocation {
    pub fn select(args: &RunArgs, paths: &AppPaths) -> Self {
        match &args.config {
            Some(path) => Self {
                path: path.clone(),
                explicit: true,
            },
            None => Self {
                path: paths.config_file(),
                explicit: false,
            },
        }
    }

    /// An explicit file must exist; the per-user default may be absent.
    pub fn load(&self) -> Result<FileConfig> {
        let loaded = if self.explicit {
            FileConfig::load(&self.path)
        } else {
            FileConfig::load_or_default(&self.path)
        };
        loaded.with_context(|| format!("failed to load {}", self.path.display()))
    }
}

pub fn resolve(args: &RunArgs, file: &FileConfig, paths: &AppPaths) -> RendererConfig {
    let mut config = RendererConfig::default();

    if let Some(width) = file.window.width {
        config.window.size.0 = width;
    }
    if let Some(height) = file.window.height {
        config.window.size.1 = height;
    }
    if let Some(size) = args.size {
        config.window.size = size;
    }
    if let Some(title) = args.title.clone().or_else(|| file.window.title.clone()) {
        config.window.title = title;
    }
    if let Some(resizable) = args.resizable.or(file.window.resizable) {
        config.window.resizable = resizable;
    }

    config.variant = args
        .variant
        .or(file.render.variant.map(Variant::from))
        .unwrap_or_default();
    if let Some(backend) = args.backend.or(file.render.backend.map(Into::into)) {
        config.backend = backend;
    }
    if let Some(color) = file.render.clear_color {
        config.clear_color = color;
    }
    config.fixed_time = args.freeze_time.or(file.render.freeze_time);

    config.shaders = match config.variant {
        Variant::Inline => {
            if args.vertex_shader.is_some() || args.fragment_shader.is_some() {
                tracing::warn!("inline variant uses built-in shaders; ignoring shader paths");
            }
            ShaderSources::Builtin
        }
        variant => {
            let (vertex_name, fragment_name) = default_shader_names(variant);
            ShaderSources::Files {
                vertex: args
                    .vertex_shader
                    .clone()
                    .or_else(|| file.render.vertex_shader.clone())
                    .unwrap_or_else(|| paths.find_shader(vertex_name)),
                fragment: args
                    .fragment_shader
                    .clone()
                    .or_else(|| file.render.fragment_shader.clone())
                    .unwrap_or_else(|| paths.find_shader(fragment_name)),
            }
        }
    };

    config.texture.path = args.texture.clone().or_else(|| file.texture.path.clone());
    if let Some(wrap) = args.wrap.or(file.texture.wrap.map(Into::into)) {
        config.texture.wrap = wrap;
    }
    if let Some(filter) = args.filter.or(file.texture.filter.map(Into::into)) {
        config.texture.filter = filter;
    }
    if let Some(flip) = file.texture.flip_vertical {
        config.texture.flip_vertical = flip;
    }

    config
}

fn default_shader_names(variant: Variant) -> (&'static str, &'static str) {
    match variant {
        Variant::Textured => ("textured.vs", "textured.frag"),
        _ => ("shader.vs", "shader.frag"),
    }
}

/// Loads the selected config file and merges it with `args`.
pub fn load(args: &RunArgs, paths: &AppPaths) -> Result<RendererConfig> {
    let location = ConfigLocation::select(args, paths);
    let file = location.load()?;
    tracing::debug!(
        path = %location.path.display(),
        explicit = location.explicit,
        "loaded configuration"
    );
    Ok(resolve(args, &file, paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::{BackendPreference, FilterMode, WrapMode};
    use std::fs;
    use tempfile::TempDir;

    fn paths_in(root: &TempDir) -> AppPaths {
        AppPaths::new(root.path().join("cfg"), None, root.path().join("work"))
    }

    #[test]
    fn defaults_use_file_shaders_from_working_dir() {
        let root = TempDir::new().unwrap();
        let paths = paths_in(&root);
        let config = resolve(&RunArgs::default(), &FileConfig::default(), &paths);

        assert_eq!(config.variant, Variant::FileShaders);
        assert_eq!(config.window.size, (800, 600));
        assert_eq!(
            config.shaders,
            ShaderSources::Files {
                vertex: root.path().join("work/shaders/shader.vs"),
                fragment: root.path().join("work/shaders/shader.frag"),
            }
        );
    }

    #[test]
    fn cli_overrides_file_values() {
        let root = TempDir::new().unwrap();
        let paths = paths_in(&root);
        let file = FileConfig::from_toml_str(
            r#"
            [window]
            width = 640
            height = 480
            title = "From file"

            [render]
            variant = "textured"
            backend = "vulkan"

            [texture]
            wrap = "clamp"
            filter = "nearest"
            "#,
        )
        .unwrap();
        let args = RunArgs {
            size: Some((1280, 720)),
            variant: Some(Variant::Inline),
            wrap: Some(WrapMode::MirroredRepeat),
            ..RunArgs::default()
        };

        let config = resolve(&args, &file, &paths);
        assert_eq!(config.window.size, (1280, 720));
        assert_eq!(config.window.title, "From file");
        assert_eq!(config.variant, Variant::Inline);
        assert_eq!(config.shaders, ShaderSources::Builtin);
        assert_eq!(config.backend, BackendPreference::Vulkan);
        assert_eq!(config.texture.wrap, WrapMode::MirroredRepeat);
        assert_eq!(config.texture.filter, FilterMode::Nearest);
    }

    #[test]
    fn resizable_flag_overrides_file_in_both_directions() {
        let root = TempDir::new().unwrap();
        let paths = paths_in(&root);
        let resizable_file = FileConfig::from_toml_str("[window]\nresizable = true\n").unwrap();

        let inherited = resolve(&RunArgs::default(), &resizable_file, &paths);
        assert!(inherited.window.resizable);

        let disabled = RunArgs {
            resizable: Some(false),
            ..RunArgs::default()
        };
        assert!(!resolve(&disabled, &resizable_file, &paths).window.resizable);

        let enabled = RunArgs {
            resizable: Some(true),
            ..RunArgs::default()
        };
        assert!(resolve(&enabled, &FileConfig::default(), &paths).window.resizable);
    }

    #[test]
    fn textured_variant_defaults_to_textured_shaders() {
        let root = TempDir::new().unwrap();
        let paths = paths_in(&root);
        let args = RunArgs {
            variant: Some(Variant::Textured),
            fragment_shader: Some(PathBuf::from("/custom.frag")),
            ..RunArgs::default()
        };

        let config = resolve(&args, &FileConfig::default(), &paths);
        assert_eq!(
            config.shaders,
            ShaderSources::Files {
                vertex: root.path().join("work/shaders/textured.vs"),
                fragment: PathBuf::from("/custom.frag"),
            }
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let root = TempDir::new().unwrap();
        let paths = paths_in(&root);
        let args = RunArgs {
            config: Some(root.path().join("nope.toml")),
            ..RunArgs::default()
        };
        assert!(load(&args, &paths).is_err());
    }

    #[test]
    fn per_user_config_is_optional_and_loaded_when_present() {
        let root = TempDir::new().unwrap();
        let paths = paths_in(&root);
        let defaults = load(&RunArgs::default(), &paths).unwrap();
        assert_eq!(defaults.window.title, "LearnOpenGL");

        fs::create_dir_all(paths.config_dir()).unwrap();
        fs::write(paths.config_file(), "[window]\nresizable = true\n").unwrap();
        let loaded = load(&RunArgs::default(), &paths).unwrap();
        assert!(loaded.window.resizable);
    }
}
