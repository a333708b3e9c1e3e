//! GPU side of the triangle program.
//!
//! - `context` owns wgpu instance/device/surface wiring and reconfigures the
//!   surface when the framebuffer size changes.
//! - `pipeline` compiles the GLSL program into a render pipeline with two bind
//!   groups: uniforms at set 0, texture + sampler at set 1.
//! - `texture` decodes and uploads the optional image.
//! - `uniforms` mirrors the std140 color block written every frame.
//! - `state` glues everything together behind `GpuState`, used by `window`.

mod context;
mod pipeline;
mod state;
mod texture;
pub(crate) mod uniforms;

pub(crate) use state::GpuState;
