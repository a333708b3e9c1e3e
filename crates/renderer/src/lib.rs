//! Renderer crate for learngl.
//!
//! Opens a window, compiles one GLSL shader program, uploads a single triangle
//! and draws it every frame while a uniform color pulses over time:
//!
//! ```text
//!   CLI / learngl
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!                                                │
//!                                                └─▶ ColorUniforms ─▶ GPU UBO
//! ```
//!
//! Shader compilation is delegated to naga's GLSL frontend through `wgpu`,
//! windowing to `winit`, and image decoding to `image`.

mod compile;
pub mod geometry;
mod gpu;
mod runtime;
mod types;
mod window;

use anyhow::Result;

pub use compile::{load_sources, normalize_glsl, ProgramSource, ShaderError, Stage};
pub use runtime::{
    pulse_intensity, time_source_for, BoxedTimeSource, FixedTimeSource, SystemTimeSource,
    TimeSample, TimeSource,
};
pub use types::{
    BackendPreference, FilterMode, RendererConfig, ShaderSources, TextureSettings, Variant,
    WindowSettings, WrapMode,
};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Fails when the window, the GPU adapter/device, or the shader program
    /// cannot be created.
    pub fn run(&self) -> Result<()> {
        window::run(&self.config)
    }
}
