use std::time::Instant;

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or frozen time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }

    /// Green channel intensity for this sample.
    pub fn pulse(&self) -> f32 {
        pulse_intensity(self.seconds)
    }
}

/// Maps elapsed seconds onto `[0, 1]` with a sine wave: `sin(t) / 2 + 0.5`.
pub fn pulse_intensity(seconds: f32) -> f32 {
    (seconds.sin() / 2.0 + 0.5).clamp(0.0, 1.0)
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports the same timestamp while still counting frames.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Picks the clock for a run: frozen when `fixed_time` is set, wall-clock otherwise.
pub fn time_source_for(fixed_time: Option<f32>) -> BoxedTimeSource {
    match fixed_time {
        Some(time) => Box::new(FixedTimeSource::new(time)),
        None => Box::new(SystemTimeSource::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn pulse_follows_shifted_sine() {
        assert!((pulse_intensity(0.0) - 0.5).abs() < 1e-6);
        assert!((pulse_intensity(FRAC_PI_2) - 1.0).abs() < 1e-6);
        assert!((pulse_intensity(3.0 * FRAC_PI_2) - 0.0).abs() < 1e-6);
        assert!((pulse_intensity(PI) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn pulse_stays_in_unit_range() {
        for step in 0..1000 {
            let value = pulse_intensity(step as f32 * 0.037);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn system_source_counts_frames_and_advances() {
        let mut source = SystemTimeSource::new();
        let first = source.sample();
        let second = source.sample();
        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert!(second.seconds >= first.seconds);

        source.reset();
        assert_eq!(source.sample().frame_index, 0);
    }

    #[test]
    fn fixed_source_freezes_time() {
        let mut source = time_source_for(Some(2.5));
        let first = source.sample();
        let second = source.sample();
        assert_eq!(first.seconds, 2.5);
        assert_eq!(second.seconds, 2.5);
        assert_eq!(second.frame_index, 1);
    }
}
