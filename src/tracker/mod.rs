pub mod person;
pub mod players;
pub mod tracking;

pub use person::{GestureSnapshot, Person};
pub use players::{PlayerStats, PlayerTracker, PoseStats};
pub use tracking::Tracking;
