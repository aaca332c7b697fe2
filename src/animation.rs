//! The scene clock and the waveforms derived from it.
//!
//! The clock advances by a fixed increment once per rendered frame, so
//! animation speed follows the display refresh rate rather than wall time.
//! The amplitudes and phase steps were tuned against exactly that stepping
//! behavior, which is why the increment is configurable but not
//! elapsed-time-based.

/// Frame-coupled scene clock.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    time: f32,
    step: f32,
}

impl Clock {
    /// A clock at time zero advancing by `step` per tick.
    pub fn new(step: f32) -> Clock {
        Clock { time: 0.0, step }
    }

    /// Advances by one frame and returns the new time.
    pub fn tick(&mut self) -> f32 {
        self.time += self.step;
        self.time
    }

    /// Current time.
    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Pendulum deflection about the Z axis at `time`.
///
/// A pure kinematic swing: no damping, no physics integration. The result
/// stays within `[-amplitude, amplitude]`.
pub fn swing_angle(time: f32, amplitude: f32) -> f32 {
    amplitude * time.sin()
}

/// Vertical scale of wave cube `index` at `time`.
///
/// Each cube runs the same waveform shifted by `phase_step * index`, which
/// makes the row carry a traveling wave. The result stays within
/// `[1 - amplitude, 1 + amplitude]`; with the reference amplitude of 0.5 the
/// cubes never collapse to zero height.
pub fn wave_scale(time: f32, index: usize, phase_step: f32, amplitude: f32) -> f32 {
    1.0 + amplitude * (time + phase_step * index as f32).sin()
}
