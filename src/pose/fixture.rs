//! テスト用の直立ポーズ（正面向き、両腕を水平に広げた状態）

use ndarray::{stack, Array1, Array2, Axis};

use super::batch::DetectionBatch;
use super::keypoint::{Keypoint, KeypointIndex, Keypoints};

/// 各関節を (x, y, confidence) で保持し、テストごとに書き換える
#[derive(Debug, Clone, Copy)]
pub struct StandingPose {
    pub nose: [f64; 3],
    pub left_eye: [f64; 3],
    pub right_eye: [f64; 3],
    pub left_ear: [f64; 3],
    pub right_ear: [f64; 3],
    pub left_shoulder: [f64; 3],
    pub right_shoulder: [f64; 3],
    pub left_elbow: [f64; 3],
    pub right_elbow: [f64; 3],
    pub left_wrist: [f64; 3],
    pub right_wrist: [f64; 3],
    pub left_hip: [f64; 3],
    pub right_hip: [f64; 3],
    pub left_knee: [f64; 3],
    pub right_knee: [f64; 3],
    pub left_ankle: [f64; 3],
    pub right_ankle: [f64; 3],
}

impl StandingPose {
    pub fn new() -> Self {
        Self {
            nose: [0.5, 0.1, 1.0],
            left_eye: [0.55, 0.08, 1.0],
            right_eye: [0.45, 0.08, 1.0],
            left_ear: [0.6, 0.1, 1.0],
            right_ear: [0.4, 0.1, 1.0],
            left_shoulder: [0.7, 0.3, 1.0],
            right_shoulder: [0.3, 0.3, 1.0],
            left_elbow: [0.8, 0.3, 1.0],
            right_elbow: [0.2, 0.3, 1.0],
            left_wrist: [0.9, 0.3, 1.0],
            right_wrist: [0.1, 0.3, 1.0],
            left_hip: [0.6, 0.5, 1.0],
            right_hip: [0.4, 0.5, 1.0],
            left_knee: [0.6, 0.7, 1.0],
            right_knee: [0.4, 0.7, 1.0],
            left_ankle: [0.6, 0.9, 1.0],
            right_ankle: [0.4, 0.9, 1.0],
        }
    }

    /// 右肘を目より上に上げる（参加ジェスチャー）
    pub fn raise_right_arm(&mut self) {
        self.right_elbow = [0.3, 0.05, 1.0];
        self.right_wrist = [0.3, 0.0, 1.0];
    }

    pub fn lower_right_arm(&mut self) {
        self.right_elbow = [0.2, 0.3, 1.0];
        self.right_wrist = [0.1, 0.3, 1.0];
    }

    fn joints(&self) -> [[f64; 3]; KeypointIndex::COUNT] {
        [
            self.nose,
            self.left_eye,
            self.right_eye,
            self.left_ear,
            self.right_ear,
            self.left_shoulder,
            self.right_shoulder,
            self.left_elbow,
            self.right_elbow,
            self.left_wrist,
            self.right_wrist,
            self.left_hip,
            self.right_hip,
            self.left_knee,
            self.right_knee,
            self.left_ankle,
            self.right_ankle,
        ]
    }

    pub fn keypoints(&self) -> Keypoints {
        let joints = self.joints();
        Keypoints::new(std::array::from_fn(|i| Keypoint::new(joints[i][0], joints[i][1], joints[i][2])))
    }

    /// (17, 2) 座標配列
    pub fn xy(&self) -> Array2<f64> {
        let joints = self.joints();
        Array2::from_shape_fn((KeypointIndex::COUNT, 2), |(i, j)| joints[i][j])
    }

    /// (17,) 信頼度配列
    pub fn confidence(&self) -> Array1<f64> {
        let joints = self.joints();
        Array1::from_shape_fn(KeypointIndex::COUNT, |i| joints[i][2])
    }
}

impl Default for StandingPose {
    fn default() -> Self {
        Self::new()
    }
}

/// (トラックID, ポーズ) の並びから検出バッチを作る（BBox は中央、信頼度 0.9）
pub fn batch_of(poses: &[(i64, StandingPose)]) -> DetectionBatch {
    if poses.is_empty() {
        return DetectionBatch::empty();
    }
    let n = poses.len();
    let xy: Vec<_> = poses.iter().map(|(_, p)| p.xy()).collect();
    let conf: Vec<_> = poses.iter().map(|(_, p)| p.confidence()).collect();
    let xy_views: Vec<_> = xy.iter().map(|a| a.view()).collect();
    let conf_views: Vec<_> = conf.iter().map(|a| a.view()).collect();
    DetectionBatch::new(
        Array2::from_shape_fn((n, 4), |(_, j)| if j < 2 { 0.2 } else { 0.8 }),
        Array1::from_elem(n, 0.9),
        poses.iter().map(|(id, _)| *id).collect(),
        stack(Axis(0), &xy_views).unwrap(),
        stack(Axis(0), &conf_views).unwrap(),
    )
}
