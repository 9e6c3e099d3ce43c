use crate::clock;

use super::Signal;

/// Exponentially weighted moving average.
///
/// `time_constant` is the time in seconds after which the response to a unit step
/// reaches `1 - 1/e`. The weighting depends on the elapsed time between samples,
/// so the output does not depend on the sampling rate. A time constant of zero or
/// below disables smoothing. A sample with the same timestamp as the previous one is ignored.
pub struct Ewma<T: Signal> {
    time_constant: f64,
    state: Option<(T, f64)>,
}

impl<T: Signal> Ewma<T> {
    pub fn new(time_constant: f64) -> Self {
        Self {
            time_constant,
            state: None,
        }
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    fn alpha(&self, dt: f64) -> f64 {
        if self.time_constant > 0.0 {
            1.0 - (-dt / self.time_constant).exp()
        } else {
            1.0
        }
    }

    pub fn update(&mut self, value: T, timestamp: f64) -> T {
        let smoothed = match self.state {
            // Same timestamp: keep the previous value. A saturated input must not turn into NaN.
            Some((prev, prev_timestamp)) if timestamp == prev_timestamp => prev,
            Some((prev, prev_timestamp)) => {
                let alpha = self.alpha(timestamp - prev_timestamp);
                value * alpha + prev * (1.0 - alpha)
            }
            None => value,
        };
        self.state = Some((smoothed, timestamp));
        smoothed
    }

    pub fn update_now(&mut self, value: T) -> T {
        self.update(value, clock::now())
    }

    /// Last smoothed value, if any sample was seen since the last reset.
    pub fn value(&self) -> Option<T> {
        self.state.map(|(v, _)| v)
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl<T: Signal> Default for Ewma<T> {
    fn default() -> Self {
        Self::new(1.0)
    }
}
