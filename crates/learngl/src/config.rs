//! `learngl.toml` parsing: every key is optional so the file only needs to
//! mention what differs from the built-in defaults.
//!
//! ```toml
//! [window]
//! width = 800
//! height = 600
//!
//! [render]
//! variant = "textured"
//! backend = "gl"
//! clear_color = [0.2, 0.3, 0.3, 1.0]
//!
//! [texture]
//! path = "container.jpg"
//! wrap = "repeat"
//! filter = "linear"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use renderer::{
    BackendPreference, FilterMode, RendererConfig, ShaderSources, Variant, WrapMode,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSetting {
    Inline,
    #[serde(alias = "file-shaders")]
    Files,
    Textured,
}

impl From<VariantSetting> for Variant {
    fn from(value: VariantSetting) -> Self {
        match value {
            VariantSetting::Inline => Variant::Inline,
            VariantSetting::Files => Variant::FileShaders,
            VariantSetting::Textured => Variant::Textured,
        }
    }
}

impl From<Variant> for VariantSetting {
    fn from(value: Variant) -> Self {
        match value {
            Variant::Inline => VariantSetting::Inline,
            Variant::FileShaders => VariantSetting::Files,
            Variant::Textured => VariantSetting::Textured,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSetting {
    #[serde(alias = "opengl")]
    Gl,
    Vulkan,
    Metal,
    Dx12,
    Auto,
}

impl From<BackendSetting> for BackendPreference {
    fn from(value: BackendSetting) -> Self {
        match value {
            BackendSetting::Gl => BackendPreference::Gl,
            BackendSetting::Vulkan => BackendPreference::Vulkan,
            BackendSetting::Metal => BackendPreference::Metal,
            BackendSetting::Dx12 => BackendPreference::Dx12,
            BackendSetting::Auto => BackendPreference::Auto,
        }
    }
}

impl From<BackendPreference> for BackendSetting {
    fn from(value: BackendPreference) -> Self {
        match value {
            BackendPreference::Gl => BackendSetting::Gl,
            BackendPreference::Vulkan => BackendSetting::Vulkan,
            BackendPreference::Metal => BackendSetting::Metal,
            BackendPreference::Dx12 => BackendSetting::Dx12,
            BackendPreference::Auto => BackendSetting::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapSetting {
    Repeat,
    #[serde(alias = "mirrored-repeat")]
    Mirror,
    #[serde(alias = "clamp-to-edge")]
    Clamp,
}

impl From<WrapSetting> for WrapMode {
    fn from(value: WrapSetting) -> Self {
        match value {
            WrapSetting::Repeat => WrapMode::Repeat,
            WrapSetting::Mirror => WrapMode::MirroredRepeat,
            WrapSetting::Clamp => WrapMode::ClampToEdge,
        }
    }
}

impl From<WrapMode> for WrapSetting {
    fn from(value: WrapMode) -> Self {
        match value {
            WrapMode::Repeat => WrapSetting::Repeat,
            WrapMode::MirroredRepeat => WrapSetting::Mirror,
            WrapMode::ClampToEdge => WrapSetting::Clamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSetting {
    Linear,
    Nearest,
}

impl From<FilterSetting> for FilterMode {
    fn from(value: FilterSetting) -> Self {
        match value {
            FilterSetting::Linear => FilterMode::Linear,
            FilterSetting::Nearest => FilterMode::Nearest,
        }
    }
}

impl From<FilterMode> for FilterSetting {
    fn from(value: FilterMode) -> Self {
        match value {
            FilterMode::Linear => FilterSetting::Linear,
            FilterMode::Nearest => FilterSetting::Nearest,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_color: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_shader: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_shader: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_time: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextureSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<WrapSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_vertical: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub window: WindowSection,
    pub render: RenderSection,
    pub texture: TextureSection,
}

impl FileConfig {
    /// Reads and validates `path`, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise returns an empty configuration.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == Some(0) || self.window.height == Some(0) {
            return Err(ConfigError::Invalid(
                "window width and height must be greater than zero".into(),
            ));
        }
        if let Some(color) = self.render.clear_color {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::Invalid(format!(
                    "clear_color components must lie in [0, 1], got {color:?}"
                )));
            }
        }
        if let Some(time) = self.render.freeze_time {
            if !time.is_finite() {
                return Err(ConfigError::Invalid("freeze_time must be finite".into()));
            }
        }
        Ok(())
    }

    fn resolve_relative(&mut self, base: &Path) {
        for path in [
            &mut self.render.vertex_shader,
            &mut self.render.fragment_shader,
            &mut self.texture.path,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Fully populated view of a resolved renderer configuration.
    pub fn from_renderer(config: &RendererConfig) -> Self {
        let (vertex_shader, fragment_shader) = match &config.shaders {
            ShaderSources::Builtin => (None, None),
            ShaderSources::Files { vertex, fragment } => {
                (Some(vertex.clone()), Some(fragment.clone()))
            }
        };
        Self {
            window: WindowSection {
                width: Some(config.window.size.0),
                height: Some(config.window.size.1),
                title: Some(config.window.title.clone()),
                resizable: Some(config.window.resizable),
            },
            render: RenderSection {
                variant: Some(config.variant.into()),
                backend: Some(config.backend.into()),
                clear_color: Some(config.clear_color),
                vertex_shader,
                fragment_shader,
                freeze_time: config.fixed_time,
            },
            texture: TextureSection {
                path: config.texture.path.clone(),
                wrap: Some(config.texture.wrap.into()),
                filter: Some(config.texture.filter.into()),
                flip_vertical: Some(config.texture.flip_vertical),
            },
        }
    }
}
