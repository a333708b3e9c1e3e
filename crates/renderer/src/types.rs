use std::fmt;
use std::path::PathBuf;

/// Which revision of the triangle program to run.
///
/// * `Inline` compiles the built-in shader strings and never clears the frame.
/// * `FileShaders` reads both stages from disk and clears to the clear color
///   before drawing, mixing the animated uniform into the output.
/// * `Textured` extends `FileShaders` with texture coordinates and a sampled
///   image bound alongside the uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    Inline,
    #[default]
    FileShaders,
    Textured,
}

impl Variant {
    /// Whether the variant carries per-vertex texture coordinates.
    pub fn is_textured(self) -> bool {
        matches!(self, Variant::Textured)
    }

    /// The inline revision draws over whatever the swapchain last held.
    pub fn clears_frame(self) -> bool {
        !matches!(self, Variant::Inline)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Inline => f.write_str("inline"),
            Variant::FileShaders => f.write_str("files"),
            Variant::Textured => f.write_str("textured"),
        }
    }
}

/// Graphics API the GPU context should be created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// OpenGL / OpenGL ES through wgpu's GL backend.
    #[default]
    Gl,
    Vulkan,
    Metal,
    Dx12,
    /// Let wgpu pick from every compiled-in backend.
    Auto,
}

impl BackendPreference {
    pub fn backends(self) -> wgpu::Backends {
        match self {
            BackendPreference::Gl => wgpu::Backends::GL,
            BackendPreference::Vulkan => wgpu::Backends::VULKAN,
            BackendPreference::Metal => wgpu::Backends::METAL,
            BackendPreference::Dx12 => wgpu::Backends::DX12,
            BackendPreference::Auto => wgpu::Backends::all(),
        }
    }
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPreference::Gl => f.write_str("gl"),
            BackendPreference::Vulkan => f.write_str("vulkan"),
            BackendPreference::Metal => f.write_str("metal"),
            BackendPreference::Dx12 => f.write_str("dx12"),
            BackendPreference::Auto => f.write_str("auto"),
        }
    }
}

/// Where the shader program's two stages come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShaderSources {
    /// The hardcoded passthrough shaders compiled into the binary.
    #[default]
    Builtin,
    /// GLSL files read at start-up.
    Files {
        vertex: PathBuf,
        fragment: PathBuf,
    },
}

/// Texture coordinate wrapping applied on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl WrapMode {
    pub(crate) fn address_mode(self) -> wgpu::AddressMode {
        match self {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapMode::Repeat => f.write_str("repeat"),
            WrapMode::MirroredRepeat => f.write_str("mirror"),
            WrapMode::ClampToEdge => f.write_str("clamp"),
        }
    }
}

/// Minification/magnification filter for the sampled texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Linear,
    Nearest,
}

impl FilterMode {
    pub(crate) fn filter(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Linear => f.write_str("linear"),
            FilterMode::Nearest => f.write_str("nearest"),
        }
    }
}

/// Image and sampler parameters for the textured variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSettings {
    /// Image to decode; `None` binds a white placeholder.
    pub path: Option<PathBuf>,
    pub wrap: WrapMode,
    pub filter: FilterMode,
    /// Flip rows so the first texel row sits at the bottom (v = 0).
    pub flip_vertical: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            path: None,
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
            flip_vertical: true,
        }
    }
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    /// Inner size in physical pixels.
    pub size: (u32, u32),
    pub title: String,
    pub resizable: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            size: (800, 600),
            title: "LearnOpenGL".to_string(),
            resizable: false,
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the CLI/config-file surface and tells the renderer
/// which variant to draw, where its shaders live, and how the window and GPU
/// context should be created.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub window: WindowSettings,
    pub variant: Variant,
    pub shaders: ShaderSources,
    pub texture: TextureSettings,
    pub backend: BackendPreference,
    /// RGBA color the frame is cleared to before drawing.
    pub clear_color: [f64; 4],
    /// When set, every frame is evaluated at this timestamp (seconds).
    pub fixed_time: Option<f32>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            variant: Variant::default(),
            shaders: ShaderSources::default(),
            texture: TextureSettings::default(),
            backend: BackendPreference::default(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            fixed_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tutorial_window() {
        let config = RendererConfig::default();
        assert_eq!(config.window.size, (800, 600));
        assert_eq!(config.window.title, "LearnOpenGL");
        assert!(!config.window.resizable);
        assert_eq!(config.backend, BackendPreference::Gl);
        assert_eq!(config.clear_color, [0.2, 0.3, 0.3, 1.0]);
    }

    #[test]
    fn inline_variant_skips_clear() {
        assert!(!Variant::Inline.clears_frame());
        assert!(Variant::FileShaders.clears_frame());
        assert!(Variant::Textured.clears_frame());
        assert!(Variant::Textured.is_textured());
        assert!(!Variant::FileShaders.is_textured());
    }

    #[test]
    fn backend_preference_maps_to_wgpu_backends() {
        assert_eq!(BackendPreference::Gl.backends(), wgpu::Backends::GL);
        assert_eq!(BackendPreference::Auto.backends(), wgpu::Backends::all());
    }
}
