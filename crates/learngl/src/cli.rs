use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderer::{BackendPreference, FilterMode, Variant, WrapMode};

#[derive(Parser, Debug)]
#[command(
    name = "learngl",
    author,
    version,
    about = "Draws the LearnOpenGL pulsing triangle",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default, Clone)]
pub struct RunArgs {
    /// Configuration file to load instead of the per-user `learngl.toml`.
    #[arg(long, value_name = "FILE", env = "LEARNGL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Program revision: `inline`, `files`, or `textured`.
    #[arg(long, value_name = "VARIANT", value_parser = parse_variant)]
    pub variant: Option<Variant>,

    /// Vertex shader file (GLSL).
    #[arg(long, value_name = "PATH")]
    pub vertex_shader: Option<PathBuf>,

    /// Fragment shader file (GLSL).
    #[arg(long, value_name = "PATH")]
    pub fragment_shader: Option<PathBuf>,

    /// Image sampled by the textured variant.
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,

    /// Texture wrapping: `repeat`, `mirror`, or `clamp`.
    #[arg(long, value_name = "MODE", value_parser = parse_wrap)]
    pub wrap: Option<WrapMode>,

    /// Texture filtering: `linear` or `nearest`.
    #[arg(long, value_name = "MODE", value_parser = parse_filter)]
    pub filter: Option<FilterMode>,

    /// Window size (e.g. `800x600`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Window title.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Allow the window to be resized; `--resizable=false` overrides the config file.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub resizable: Option<bool>,

    /// Graphics backend: `gl` (default), `vulkan`, `metal`, `dx12`, or `auto`.
    #[arg(long, value_name = "BACKEND", value_parser = parse_backend)]
    pub backend: Option<BackendPreference>,

    /// Evaluate every frame at this timestamp instead of the wall clock.
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub freeze_time: Option<f32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect the resolved configuration.
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration the renderer would start with, as TOML.
    Show,
    /// Print the configuration file location.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_variant(value: &str) -> Result<Variant, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("variant must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "inline" | "builtin" => Ok(Variant::Inline),
        "files" | "file" | "file-shaders" => Ok(Variant::FileShaders),
        "textured" | "texture" => Ok(Variant::Textured),
        other => Err(format!(
            "unknown variant '{other}'; expected inline, files, or textured"
        )),
    }
}

pub fn parse_backend(value: &str) -> Result<BackendPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("backend must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "gl" | "opengl" | "gles" => Ok(BackendPreference::Gl),
        "vulkan" | "vk" => Ok(BackendPreference::Vulkan),
        "metal" => Ok(BackendPreference::Metal),
        "dx12" | "d3d12" => Ok(BackendPreference::Dx12),
        "auto" | "any" => Ok(BackendPreference::Auto),
        other => Err(format!(
            "unknown backend '{other}'; expected gl, vulkan, metal, dx12, or auto"
        )),
    }
}

pub fn parse_wrap(value: &str) -> Result<WrapMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "repeat" => Ok(WrapMode::Repeat),
        "mirror" | "mirrored-repeat" => Ok(WrapMode::MirroredRepeat),
        "clamp" | "clamp-to-edge" => Ok(WrapMode::ClampToEdge),
        other => Err(format!(
            "unknown wrap mode '{other}'; expected repeat, mirror, or clamp"
        )),
    }
}

pub fn parse_filter(value: &str) -> Result<FilterMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "linear" => Ok(FilterMode::Linear),
        "nearest" => Ok(FilterMode::Nearest),
        other => Err(format!(
            "unknown filter '{other}'; expected linear or nearest"
        )),
    }
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("window size must be greater than zero".into());
    }
    Ok((width, height))
}

fn parse_seconds(value: &str) -> Result<f32, String> {
    let seconds = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid timestamp '{value}'"))?;
    if !seconds.is_finite() {
        return Err("timestamp must be finite".into());
    }
    Ok(seconds)
}
