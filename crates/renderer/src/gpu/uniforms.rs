use bytemuck::{Pod, Zeroable};

use crate::runtime::TimeSample;

/// Mirror of the std140 block shared by the bundled shaders:
///
/// ```glsl
/// layout(std140, set = 0, binding = 0) uniform Globals {
///     vec4 ourColor;
///     float time;
/// };
/// ```
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorUniforms {
    pub our_color: [f32; 4],
    pub time: f32,
    pub _padding: [f32; 3],
}

unsafe impl Zeroable for ColorUniforms {}
unsafe impl Pod for ColorUniforms {}

impl ColorUniforms {
    pub fn new() -> Self {
        Self {
            our_color: [0.0, 0.5, 0.0, 1.0],
            time: 0.0,
            _padding: [0.0; 3],
        }
    }

    /// Recomputes the animated color: only the green channel pulses.
    pub fn update_time(&mut self, sample: TimeSample) {
        self.time = sample.seconds;
        self.our_color = [0.0, sample.pulse(), 0.0, 1.0];
    }
}
