use crate::clock;

use super::Signal;

/// Time steps closer than this count as simultaneous.
const MIN_TIME_STEP: f64 = 1e-8;

/// Time derivative between the previous and the current sample.
///
/// The first sample after construction or [`reset`](Derivative::reset) yields zero.
/// Two samples with the same timestamp saturate to signed infinity instead of dividing by zero.
pub struct Derivative<T: Signal> {
    prev: Option<(T, f64)>,
}

impl<T: Signal> Derivative<T> {
    pub fn new() -> Self {
        Self { prev: None }
    }

    pub fn update(&mut self, value: T, timestamp: f64) -> T {
        let diff = match self.prev {
            Some((prev_value, prev_timestamp)) => {
                let dt = timestamp - prev_timestamp;
                if dt.abs() <= MIN_TIME_STEP {
                    value.saturated()
                } else {
                    (value - prev_value) / dt
                }
            }
            None => T::zero(),
        };
        self.prev = Some((value, timestamp));
        diff
    }

    pub fn update_now(&mut self, value: T) -> T {
        self.update(value, clock::now())
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

impl<T: Signal> Default for Derivative<T> {
    fn default() -> Self {
        Self::new()
    }
}
