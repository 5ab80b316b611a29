//! Animation time for the flow layer.

/// Elapsed-time accumulator. Only advanced by host ticks; never resets itself.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationClock {
    value: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance by `dt * speed`. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32, speed: f32) {
        let step = dt * speed;
        if step.is_finite() && dt >= 0.0 {
            self.value += step;
        }
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
