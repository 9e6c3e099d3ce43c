use crate::clock;

/// Repeats a held `true` input once per `interval` seconds.
///
/// The first `true` fires immediately; a `false` input rearms the timer so the next
/// `true` fires immediately again.
pub struct Turbo {
    interval: f64,
    last_fired: Option<f64>,
}

impl Turbo {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn update(&mut self, value: bool, timestamp: f64) -> bool {
        if !value {
            self.last_fired = None;
            return false;
        }

        let due = match self.last_fired {
            Some(last) => timestamp - last >= self.interval,
            None => true,
        };
        if due {
            self.last_fired = Some(timestamp);
        }
        due
    }

    pub fn update_now(&mut self, value: bool) -> bool {
        self.update(value, clock::now())
    }
}
