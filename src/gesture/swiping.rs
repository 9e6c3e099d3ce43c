use serde::Serialize;

use super::Side;
use crate::clock;
use crate::filter::{Derivative, Ewma, Vec2};
use crate::pose::Keypoints;

const WRIST_VELOCITY_TIME_CONSTANT: f64 = 0.1;
pub const DEFAULT_SENSITIVITY: f64 = 0.16;
/// 解除側の閾値 = 検出閾値 * この係数
const THRESHOLD_OUT_FACTOR: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SwipingResult {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl SwipingResult {
    /// 反転した速度ベクトルの角度（度）から方向を1つだけ立てる
    fn from_angle(angle: f64) -> Self {
        Self {
            right: angle > -45.0 && angle <= 45.0,
            up: angle > 45.0 && angle <= 135.0,
            left: angle > 135.0 || angle <= -135.0,
            down: angle > -135.0 && angle <= -45.0,
        }
    }
}

/// スワイプ検出: 手首速度の大きさと向き
///
/// 検出閾値と解除閾値の間ではフラグを保持する（境界付近でのばたつき防止）。
pub struct Swiping {
    confidence_threshold: f64,
    side: Side,
    shoulder_width: f64,
    sensitivity: f64,
    wrist_velocity: Derivative<Vec2>,
    wrist_velocity_ewma: Ewma<Vec2>,
    state: SwipingResult,
}

impl Swiping {
    pub fn new(confidence_threshold: f64, side: Side) -> Self {
        Self {
            confidence_threshold,
            side,
            shoulder_width: 0.0,
            sensitivity: DEFAULT_SENSITIVITY,
            wrist_velocity: Derivative::new(),
            wrist_velocity_ewma: Ewma::new(WRIST_VELOCITY_TIME_CONSTANT),
            state: SwipingResult::default(),
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    pub fn set_shoulder_width(&mut self, shoulder_width: f64) {
        self.shoulder_width = shoulder_width;
    }

    pub fn parse_keypoints(&mut self, keypoints: &Keypoints, timestamp: f64) -> SwipingResult {
        let wrist = keypoints.get(self.side.wrist());

        if !wrist.is_valid(self.confidence_threshold) {
            self.wrist_velocity.reset();
            self.wrist_velocity_ewma.reset();
            self.state = SwipingResult::default();
            return self.state;
        }

        let raw = self.wrist_velocity.update(wrist.xy, timestamp);
        let velocity = self.wrist_velocity_ewma.update(raw, timestamp);

        let threshold_in = self.shoulder_width / self.sensitivity;
        let threshold_out = threshold_in * THRESHOLD_OUT_FACTOR;
        let speed = velocity.norm();

        if speed > threshold_in {
            // 画像は左右反転で映るため、速度を反転させてから向きを決める
            let angle = (-velocity.y).atan2(-velocity.x).to_degrees();
            self.state = SwipingResult::from_angle(angle);
        } else if speed < threshold_out {
            self.state = SwipingResult::default();
        }

        self.state
    }

    pub fn parse_keypoints_now(&mut self, keypoints: &Keypoints) -> SwipingResult {
        self.parse_keypoints(keypoints, clock::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::fixture::StandingPose;

    const MIN_CONF: f64 = 0.8;
    const FRAME: f64 = 1.0 / 30.0;

    fn swiping(side: Side) -> Swiping {
        let mut s = Swiping::new(MIN_CONF, side);
        s.set_sensitivity(0.16);
        s.set_shoulder_width(0.4);
        s
    }

    /// 10 フレームで from から to へ手首を動かし、最後の結果を返す
    fn swipe(side: Side, from: [f64; 2], to: [f64; 2], confidence: f64) -> SwipingResult {
        let mut gesture = swiping(side);
        let mut pose = StandingPose::new();
        let mut result = SwipingResult::default();
        for i in 0..10 {
            let s = i as f64 / 9.0;
            let wrist = [
                from[0] + (to[0] - from[0]) * s,
                from[1] + (to[1] - from[1]) * s,
                confidence,
            ];
            match side {
                Side::Left => pose.left_wrist = wrist,
                Side::Right => pose.right_wrist = wrist,
            }
            result = gesture.parse_keypoints(&pose.keypoints(), i as f64 * FRAME);
        }
        result
    }

    fn only(left: bool, right: bool, up: bool, down: bool) -> SwipingResult {
        SwipingResult { left, right, up, down }
    }

    #[test]
    fn test_up() {
        assert_eq!(swipe(Side::Left, [0.9, 1.0], [0.9, 0.0], 1.0), only(false, false, true, false));
        assert_eq!(swipe(Side::Right, [0.1, 1.0], [0.1, 0.0], 1.0), only(false, false, true, false));
    }

    #[test]
    fn test_down() {
        assert_eq!(swipe(Side::Left, [0.9, 0.0], [0.9, 1.0], 1.0), only(false, false, false, true));
        assert_eq!(swipe(Side::Right, [0.1, 0.0], [0.1, 1.0], 1.0), only(false, false, false, true));
    }

    #[test]
    fn test_left() {
        // x が増える = 映像上で右へ = 本人から見て左
        assert_eq!(swipe(Side::Left, [0.0, 0.7], [1.0, 0.7], 1.0), only(true, false, false, false));
        assert_eq!(swipe(Side::Right, [0.0, 0.7], [1.0, 0.7], 1.0), only(true, false, false, false));
    }

    #[test]
    fn test_right() {
        assert_eq!(swipe(Side::Left, [1.0, 0.7], [0.0, 0.7], 1.0), only(false, true, false, false));
        assert_eq!(swipe(Side::Right, [1.0, 0.7], [0.0, 0.7], 1.0), only(false, true, false, false));
    }

    #[test]
    fn test_no_movement() {
        for side in [Side::Left, Side::Right] {
            let mut gesture = swiping(side);
            let pose = StandingPose::new();
            let mut result = SwipingResult { left: true, ..Default::default() };
            for i in 0..10 {
                result = gesture.parse_keypoints(&pose.keypoints(), i as f64 * FRAME);
            }
            assert_eq!(result, SwipingResult::default());
        }
    }

    #[test]
    fn test_low_confidence() {
        assert_eq!(swipe(Side::Left, [0.9, 1.0], [0.9, 0.0], 0.5), SwipingResult::default());
        assert_eq!(swipe(Side::Right, [0.1, 1.0], [0.1, 0.0], 0.5), SwipingResult::default());
    }

    #[test]
    fn test_sectors_are_exclusive() {
        for angle in [-180.0, -135.0, -90.0, -45.0, 0.0, 45.0, 90.0, 135.0, 180.0] {
            let r = SwipingResult::from_angle(angle);
            let count = [r.left, r.right, r.up, r.down].iter().filter(|f| **f).count();
            assert_eq!(count, 1, "angle {}", angle);
        }
    }

    #[test]
    fn test_hysteresis_holds_then_clears() {
        let mut gesture = swiping(Side::Right);
        let mut pose = StandingPose::new();
        let mut t = 0.0;
        for i in 0..10 {
            pose.right_wrist = [0.1, 1.0 - i as f64 / 9.0, 1.0];
            gesture.parse_keypoints(&pose.keypoints(), t);
            t += FRAME;
        }

        // 止めた直後: 平滑化速度は解除閾値と検出閾値の間なので保持
        let held = gesture.parse_keypoints(&pose.keypoints(), t);
        assert!(held.up);

        let mut result = held;
        for _ in 0..10 {
            t += FRAME;
            result = gesture.parse_keypoints(&pose.keypoints(), t);
        }
        assert_eq!(result, SwipingResult::default());
    }

    #[test]
    fn test_confidence_loss_clears_flags() {
        let mut gesture = swiping(Side::Left);
        let mut pose = StandingPose::new();
        for i in 0..10 {
            pose.left_wrist = [0.9, 1.0 - i as f64 / 9.0, 1.0];
            gesture.parse_keypoints(&pose.keypoints(), i as f64 * FRAME);
        }
        pose.left_wrist[2] = 0.0;
        let result = gesture.parse_keypoints(&pose.keypoints(), 10.0 * FRAME);
        assert_eq!(result, SwipingResult::default());
    }

    #[test]
    fn test_duplicate_timestamp_does_not_stick() {
        let mut gesture = swiping(Side::Right);
        let mut pose = StandingPose::new();
        pose.right_wrist = [0.1, 1.0, 1.0];
        for i in 0..3 {
            gesture.parse_keypoints(&pose.keypoints(), i as f64 * FRAME);
        }
        // 同じ時刻のフレームがもう一度来る
        let repeated = gesture.parse_keypoints(&pose.keypoints(), 2.0 * FRAME);
        assert_eq!(repeated, SwipingResult::default());

        let mut t = 3.0 * FRAME;

        let mut swiped = false;
        for i in 0..10 {
            pose.right_wrist = [0.1, 1.0 - i as f64 / 9.0, 1.0];
            swiped |= gesture.parse_keypoints(&pose.keypoints(), t).up;
            t += FRAME;
        }
        assert!(swiped);

        let mut result = SwipingResult { up: true, ..Default::default() };
        for _ in 0..30 {
            result = gesture.parse_keypoints(&pose.keypoints(), t);
            t += FRAME;
        }
        assert_eq!(result, SwipingResult::default());
    }
}
