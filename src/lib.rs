pub mod clock;
pub mod config;
pub mod filter;
pub mod gesture;
pub mod pose;
pub mod recording;
pub mod tracker;
