use serde::Serialize;

use super::Side;
use crate::clock;
use crate::filter::{Derivative, Ewma, Vec2};
use crate::pose::Keypoints;

/// 画面のアスペクト比（幅 / 高さ）の既定値
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;
const REFERENCE_SHOULDER_TIME_CONSTANT: f64 = 0.2;
const POINTER_TIME_CONSTANT: f64 = 0.1;
/// 正規化オフセットがこの範囲外なら指差しとみなさない（単位正方形より少し広い）
const DETECTION_AREA_FACTOR: f64 = 1.25;
/// ポインタ速度（正規化単位 / 秒）がこれを超えると選択カウントダウンをやり直す
const SELECT_MOTION_THRESHOLD: f64 = 0.3;
/// 静止してから選択になるまでの時間（秒）
const SELECT_DWELL: f64 = 0.75;
/// 静止し続けた場合の選択リピート間隔（秒）
const SELECT_REPEAT_INTERVAL: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointingResult {
    pub detected: bool,
    /// 肩基準のポインタ位置 [-1, 1] x [-1, 1]（未検出時は最後の値）
    pub xy: Vec2,
    /// 滞留選択（クリック）のトリガー
    pub selecting: bool,
}

/// 指差し: 肩を原点、肩幅を単位とした手首位置をポインタ座標にする
pub struct Pointing {
    confidence_threshold: f64,
    side: Side,
    aspect_ratio: f64,
    shoulder_width: f64,
    reference_shoulder: Vec2,
    reference_shoulder_ewma: Ewma<Vec2>,
    xy: Vec2,
    xy_ewma: Ewma<Vec2>,
    xy_velocity: Derivative<Vec2>,
    countdown_start: Option<f64>,
}

impl Pointing {
    pub fn new(confidence_threshold: f64, side: Side) -> Self {
        Self {
            confidence_threshold,
            side,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            shoulder_width: 0.0,
            reference_shoulder: Vec2::zeros(),
            reference_shoulder_ewma: Ewma::new(REFERENCE_SHOULDER_TIME_CONSTANT),
            xy: Vec2::zeros(),
            xy_ewma: Ewma::new(POINTER_TIME_CONSTANT),
            xy_velocity: Derivative::new(),
            countdown_start: None,
        }
    }

    /// ポインタを写す画面の (幅, 高さ)
    pub fn set_aspect_ratio(&mut self, width: f64, height: f64) {
        self.aspect_ratio = width / height;
    }

    pub fn set_shoulder_width(&mut self, shoulder_width: f64) {
        self.shoulder_width = shoulder_width;
    }

    fn correct_aspect(&self, mut offset: Vec2) -> Vec2 {
        if self.aspect_ratio > 1.0 {
            offset.y *= self.aspect_ratio;
        } else if self.aspect_ratio < 1.0 {
            offset.x /= self.aspect_ratio;
        }
        offset
    }

    pub fn parse_keypoints(&mut self, keypoints: &Keypoints, timestamp: f64) -> PointingResult {
        let shoulder = keypoints.get(self.side.shoulder());
        let wrist = keypoints.get(self.side.wrist());

        if shoulder.is_valid(self.confidence_threshold) {
            self.reference_shoulder = self.reference_shoulder_ewma.update(shoulder.xy, timestamp);
        }

        let offset = if shoulder.is_valid(self.confidence_threshold)
            && wrist.is_valid(self.confidence_threshold)
            && self.shoulder_width > 0.0
        {
            Some(self.correct_aspect((wrist.xy - self.reference_shoulder) / self.shoulder_width))
        } else {
            None
        };

        let detected = match offset {
            Some(offset) if offset.iter().all(|c| c.abs() < DETECTION_AREA_FACTOR) => {
                let clamped = offset.map(|c| c.clamp(-1.0, 1.0));
                self.xy = self.xy_ewma.update(clamped, timestamp);
                true
            }
            _ => {
                self.xy_ewma.reset();
                false
            }
        };

        let selecting = self.update_selection(detected, timestamp);

        PointingResult {
            detected,
            xy: self.xy,
            selecting,
        }
    }

    pub fn parse_keypoints_now(&mut self, keypoints: &Keypoints) -> PointingResult {
        self.parse_keypoints(keypoints, clock::now())
    }

    /// ポインタが静止し続けたら選択を出し、その後はリピート間隔ごとに繰り返す
    fn update_selection(&mut self, detected: bool, timestamp: f64) -> bool {
        if !detected {
            self.xy_velocity.reset();
            self.countdown_start = Some(timestamp);
            return false;
        }

        let velocity = self.xy_velocity.update(self.xy, timestamp);
        if velocity.x.abs() > SELECT_MOTION_THRESHOLD || velocity.y.abs() > SELECT_MOTION_THRESHOLD {
            self.countdown_start = Some(timestamp);
        }

        let start = *self.countdown_start.get_or_insert(timestamp);
        if timestamp - start >= SELECT_DWELL {
            self.countdown_start = Some(timestamp + SELECT_REPEAT_INTERVAL - SELECT_DWELL);
            true
        } else {
            false
        }
    }
}
