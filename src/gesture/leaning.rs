use serde::Serialize;

use crate::pose::{KeypointIndex, Keypoints};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaningResult {
    pub detected: bool,
    pub angle_degrees: f64,
}

/// 背骨（肩中点 → 腰中点）の鉛直軸からの傾き
pub struct Leaning {
    confidence_threshold: f64,
}

impl Leaning {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn parse_keypoints(&self, keypoints: &Keypoints) -> LeaningResult {
        let shoulder_mid = keypoints.midpoint(
            KeypointIndex::LeftShoulder,
            KeypointIndex::RightShoulder,
            self.confidence_threshold,
        );
        let hip_mid = keypoints.midpoint(
            KeypointIndex::LeftHip,
            KeypointIndex::RightHip,
            self.confidence_threshold,
        );

        match (shoulder_mid, hip_mid) {
            (Some(shoulder), Some(hip)) => {
                let spine = hip - shoulder;
                LeaningResult {
                    detected: true,
                    angle_degrees: f64::atan2(spine.x, spine.y).to_degrees(),
                }
            }
            _ => LeaningResult {
                detected: false,
                angle_degrees: 0.0,
            },
        }
    }
}
