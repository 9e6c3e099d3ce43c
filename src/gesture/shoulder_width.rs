use serde::Serialize;

use crate::clock;
use crate::filter::Ewma;
use crate::pose::{KeypointIndex, Keypoints};

/// 肩幅平滑化の時定数（秒）
const SHOULDER_WIDTH_TIME_CONSTANT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShoulderWidthResult {
    pub detected: bool,
    pub width: f64,
}

/// 肩幅（左右の肩の距離）
///
/// 他のジェスチャーの体格基準として使う。肩を見失っても平滑化状態は保持し、
/// 再検出時は前回値から続けて平滑化する。
pub struct ShoulderWidth {
    confidence_threshold: f64,
    width_ewma: Ewma<f64>,
}

impl ShoulderWidth {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
            width_ewma: Ewma::new(SHOULDER_WIDTH_TIME_CONSTANT),
        }
    }

    pub fn parse_keypoints(&mut self, keypoints: &Keypoints, timestamp: f64) -> ShoulderWidthResult {
        let left = keypoints.get(KeypointIndex::LeftShoulder);
        let right = keypoints.get(KeypointIndex::RightShoulder);

        if left.is_valid(self.confidence_threshold) && right.is_valid(self.confidence_threshold) {
            let width = self.width_ewma.update((left.xy - right.xy).norm(), timestamp);
            ShoulderWidthResult { detected: true, width }
        } else {
            ShoulderWidthResult {
                detected: false,
                width: 0.0,
            }
        }
    }

    pub fn parse_keypoints_now(&mut self, keypoints: &Keypoints) -> ShoulderWidthResult {
        self.parse_keypoints(keypoints, clock::now())
    }
}
