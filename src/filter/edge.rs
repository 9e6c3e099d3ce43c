/// Fires on a `false` -> `true` transition.
///
/// Starts as if the previous input was `true`, so an initial `true` does not fire.
pub struct RisingEdge {
    prev: bool,
}

impl RisingEdge {
    pub fn new() -> Self {
        Self { prev: true }
    }

    pub fn update(&mut self, value: bool) -> bool {
        let rising = !self.prev && value;
        self.prev = value;
        rising
    }
}

impl Default for RisingEdge {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires on a `true` -> `false` transition.
///
/// Starts as if the previous input was `false`.
pub struct FallingEdge {
    prev: bool,
}

impl FallingEdge {
    pub fn new() -> Self {
        Self { prev: false }
    }

    pub fn update(&mut self, value: bool) -> bool {
        let falling = self.prev && !value;
        self.prev = value;
        falling
    }
}

impl Default for FallingEdge {
    fn default() -> Self {
        Self::new()
    }
}
