use ndarray::{ArrayView1, ArrayView2};

use crate::filter::Vec2;

/// COCO の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// 正規化座標 (通常 0.0〜1.0、一時的に範囲外もありうる)
    pub xy: Vec2,
    /// 信頼度スコア (0.0〜1.0)
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            xy: Vec2::new(x, y),
            confidence,
        }
    }

    pub fn x(&self) -> f64 {
        self.xy.x
    }

    pub fn y(&self) -> f64 {
        self.xy.y
    }

    /// 信頼度が閾値を超えるか
    pub fn is_valid(&self, threshold: f64) -> bool {
        self.confidence > threshold
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            xy: Vec2::zeros(),
            confidence: 0.0,
        }
    }
}

/// 1人分の17キーポイント
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoints {
    pub keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl Keypoints {
    pub fn new(keypoints: [Keypoint; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// 全座標・全信頼度がゼロ（割り当てトラックなしのスロット用）
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// 座標配列 (17, 2) と信頼度配列 (17,) から構築
    ///
    /// 形状が違う場合は呼び出し側のバグなので panic する
    pub fn from_arrays(xy: ArrayView2<f64>, confidence: ArrayView1<f64>) -> Self {
        assert_eq!(
            xy.shape(),
            &[KeypointIndex::COUNT, 2],
            "keypoint coordinates must have shape (17, 2)"
        );
        assert_eq!(
            confidence.shape(),
            &[KeypointIndex::COUNT],
            "keypoint confidences must have shape (17,)"
        );

        let keypoints = std::array::from_fn(|i| Keypoint::new(xy[[i, 0]], xy[[i, 1]], confidence[i]));
        Self { keypoints }
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    /// 2点の中点（両方の信頼度が閾値を超える場合のみ）
    pub fn midpoint(&self, a: KeypointIndex, b: KeypointIndex, threshold: f64) -> Option<Vec2> {
        let a = self.get(a);
        let b = self.get(b);
        if a.is_valid(threshold) && b.is_valid(threshold) {
            Some((a.xy + b.xy) / 2.0)
        } else {
            None
        }
    }
}

impl Default for Keypoints {
    fn default() -> Self {
        Self {
            keypoints: [Keypoint::default(); KeypointIndex::COUNT],
        }
    }
}
