use serde::Serialize;

use crate::clock;
use crate::filter::{Derivative, Ewma, Vec2};
use crate::pose::{KeypointIndex, Keypoints};

/// 腰中点速度の平滑化時定数（秒）
const HIP_VELOCITY_TIME_CONSTANT: f64 = 0.1;
pub const DEFAULT_SENSITIVITY: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JumpingResult {
    pub detected: bool,
}

/// ジャンプ検出: 腰中点の上向き速度が肩幅 / 感度 を超えたら検出
pub struct Jumping {
    confidence_threshold: f64,
    shoulder_width: f64,
    sensitivity: f64,
    hip_velocity: Derivative<Vec2>,
    hip_velocity_ewma: Ewma<Vec2>,
}

impl Jumping {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
            shoulder_width: 0.0,
            sensitivity: DEFAULT_SENSITIVITY,
            hip_velocity: Derivative::new(),
            hip_velocity_ewma: Ewma::new(HIP_VELOCITY_TIME_CONSTANT),
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    pub fn set_shoulder_width(&mut self, shoulder_width: f64) {
        self.shoulder_width = shoulder_width;
    }

    pub fn parse_keypoints(&mut self, keypoints: &Keypoints, timestamp: f64) -> JumpingResult {
        let velocity = match keypoints.midpoint(
            KeypointIndex::LeftHip,
            KeypointIndex::RightHip,
            self.confidence_threshold,
        ) {
            Some(hip_center) => {
                let raw = self.hip_velocity.update(hip_center, timestamp);
                self.hip_velocity_ewma.update(raw, timestamp)
            }
            None => {
                // 再検出時に速度スパイクが出ないよう両方リセット
                self.hip_velocity.reset();
                self.hip_velocity_ewma.reset();
                Vec2::zeros()
            }
        };

        JumpingResult {
            detected: velocity.y < -self.shoulder_width / self.sensitivity,
        }
    }

    pub fn parse_keypoints_now(&mut self, keypoints: &Keypoints) -> JumpingResult {
        self.parse_keypoints(keypoints, clock::now())
    }
}
