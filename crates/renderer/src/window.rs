use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::runtime::{time_source_for, BoxedTimeSource};
use crate::types::RendererConfig;

/// Window plus the GPU state rendering into it.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: Option<GpuState>,
    clock: BoxedTimeSource,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)?;
        Ok(Self {
            window,
            gpu: Some(gpu),
            clock: time_source_for(config.fixed_time),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn gpu_mut(&mut self) -> Option<&mut GpuState> {
        self.gpu.as_mut()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(gpu) = self.gpu_mut() {
            gpu.resize(new_size);
        }
    }

    /// Renders one frame. Returns `false` when the loop should stop.
    pub(crate) fn render_frame(&mut self) -> bool {
        let sample = self.clock.sample();
        let Some(gpu) = self.gpu.as_mut() else {
            return false;
        };
        let Err(error) = gpu.render(sample) else {
            return true;
        };
        match surface_error_action(&error) {
            SurfaceAction::Reconfigure => {
                debug!(size = ?gpu.size(), "surface lost or outdated; reconfiguring");
                gpu.reconfigure();
                true
            }
            SurfaceAction::Exit => {
                error!("surface out of memory; closing window");
                false
            }
            SurfaceAction::Retry => {
                warn!("surface error: {error:?}; retrying next frame");
                true
            }
        }
    }

    /// Drops GPU objects while the window they render into is still alive.
    pub(crate) fn release(&mut self) {
        if self.gpu.take().is_some() {
            debug!("released GPU resources");
        }
    }
}

/// What the render loop does after `get_current_texture` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceAction {
    Reconfigure,
    Exit,
    Retry,
}

fn surface_error_action(error: &wgpu::SurfaceError) -> SurfaceAction {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceAction::Exit,
        _ => SurfaceAction::Retry,
    }
}

fn is_close_key(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && !event.repeat
        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
}

/// Opens the window and drives the render loop until it is closed.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;

    let (width, height) = config.window.size;
    let window = WindowBuilder::new()
        .with_title(config.window.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_resizable(config.window.resizable)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window.clone(), config)
        .context("failed to initialize GPU state for window")?;
    info!(
        width,
        height,
        variant = %config.variant,
        "window ready; press Escape to close"
    );

    event_loop.set_control_flow(ControlFlow::Poll);
    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if is_close_key(&event) {
                        debug!("escape pressed; closing window");
                        elwt.exit();
                    }
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                }
                WindowEvent::RedrawRequested => {
                    if !state.render_frame() {
                        elwt.exit();
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            state.window().request_redraw();
        }
        Event::LoopExiting => {
            state.release();
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_surfaces_are_reconfigured() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Lost),
            SurfaceAction::Reconfigure
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Outdated),
            SurfaceAction::Reconfigure
        );
    }

    #[test]
    fn out_of_memory_ends_the_loop() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::OutOfMemory),
            SurfaceAction::Exit
        );
    }

    #[test]
    fn transient_errors_retry_next_frame() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Timeout),
            SurfaceAction::Retry
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Other),
            SurfaceAction::Retry
        );
    }
}
