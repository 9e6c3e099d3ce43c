pub mod batch;
#[cfg(test)]
pub(crate) mod fixture;
pub mod keypoint;

pub use batch::DetectionBatch;
pub use keypoint::{Keypoint, KeypointIndex, Keypoints};
