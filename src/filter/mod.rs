//! Time-aware signal filters used by the gesture detectors.
//!
//! Each filter keeps its own state, so every use site needs a separate instance.

mod derivative;
mod edge;
mod ewma;
mod signal;
mod turbo;

pub use derivative::Derivative;
pub use edge::{FallingEdge, RisingEdge};
pub use ewma::Ewma;
pub use signal::{Signal, Vec2};
pub use turbo::Turbo;
