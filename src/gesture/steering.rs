use serde::Serialize;

use crate::pose::{KeypointIndex, Keypoints};

/// 両手首の距離がこの倍率 × 肩幅未満ならハンドルを握っているとみなす
const DETECTION_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteeringResult {
    pub detected: bool,
    pub angle_degrees: f64,
}

/// ハンドル操作: 両手首を結ぶ線の傾き
pub struct Steering {
    confidence_threshold: f64,
    shoulder_width: f64,
}

impl Steering {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
            shoulder_width: 0.0,
        }
    }

    pub fn set_shoulder_width(&mut self, shoulder_width: f64) {
        self.shoulder_width = shoulder_width;
    }

    pub fn parse_keypoints(&self, keypoints: &Keypoints) -> SteeringResult {
        let left = keypoints.get(KeypointIndex::LeftWrist);
        let right = keypoints.get(KeypointIndex::RightWrist);

        if !left.is_valid(self.confidence_threshold) || !right.is_valid(self.confidence_threshold) {
            return SteeringResult {
                detected: false,
                angle_degrees: 0.0,
            };
        }

        let wheel = left.xy - right.xy;
        if wheel.norm() < self.shoulder_width * DETECTION_FACTOR {
            SteeringResult {
                detected: true,
                angle_degrees: -f64::atan2(wheel.y, wheel.x).to_degrees(),
            }
        } else {
            SteeringResult {
                detected: false,
                angle_degrees: 0.0,
            }
        }
    }
}
