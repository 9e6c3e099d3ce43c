use serde::Serialize;

use super::Side;
use crate::pose::Keypoints;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmRaisingResult {
    pub detected: bool,
}

/// 腕上げ検出: 肘が目より上にあるか
///
/// 画像の y は下向きに増えるので「上」は y が小さいこと。
/// 右腕はトラッキングの参加ジェスチャーにも使う。
pub struct ArmRaising {
    confidence_threshold: f64,
    side: Side,
}

impl ArmRaising {
    pub fn new(confidence_threshold: f64, side: Side) -> Self {
        Self {
            confidence_threshold,
            side,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn parse_keypoints(&self, keypoints: &Keypoints) -> ArmRaisingResult {
        let elbow = keypoints.get(self.side.elbow());
        let eye = keypoints.get(self.side.eye());

        let detected = elbow.is_valid(self.confidence_threshold)
            && eye.is_valid(self.confidence_threshold)
            && elbow.y() < eye.y();

        ArmRaisingResult { detected }
    }
}
