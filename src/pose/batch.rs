use ndarray::{s, Array1, Array2, Array3, Axis};

use super::keypoint::{KeypointIndex, Keypoints};

/// 1フレーム分の検出結果（姿勢推定モデル + トラッカーの出力）
///
/// 全配列は先頭軸が検出数 n で揃っている
/// - bboxes: (n, 4) 正規化 xyxy
/// - scores: (n,) BBox 信頼度
/// - keypoints: (n, 17, 2) 正規化座標
/// - confidences: (n, 17) キーポイント信頼度
#[derive(Debug, Clone)]
pub struct DetectionBatch {
    pub bboxes: Array2<f64>,
    pub scores: Array1<f64>,
    pub track_ids: Vec<i64>,
    pub keypoints: Array3<f64>,
    pub confidences: Array2<f64>,
}

impl DetectionBatch {
    pub fn new(
        bboxes: Array2<f64>,
        scores: Array1<f64>,
        track_ids: Vec<i64>,
        keypoints: Array3<f64>,
        confidences: Array2<f64>,
    ) -> Self {
        let n = track_ids.len();
        assert_eq!(bboxes.shape(), &[n, 4], "bboxes must have shape (n, 4)");
        assert_eq!(scores.shape(), &[n], "scores must have shape (n,)");
        assert_eq!(
            keypoints.shape(),
            &[n, KeypointIndex::COUNT, 2],
            "keypoints must have shape (n, 17, 2)"
        );
        assert_eq!(
            confidences.shape(),
            &[n, KeypointIndex::COUNT],
            "confidences must have shape (n, 17)"
        );

        Self {
            bboxes,
            scores,
            track_ids,
            keypoints,
            confidences,
        }
    }

    /// 検出なし
    pub fn empty() -> Self {
        Self::new(
            Array2::zeros((0, 4)),
            Array1::zeros(0),
            Vec::new(),
            Array3::zeros((0, KeypointIndex::COUNT, 2)),
            Array2::zeros((0, KeypointIndex::COUNT)),
        )
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    /// トラックIDに対応する検出のインデックス（重複時は先頭）
    pub fn index_of(&self, track_id: i64) -> Option<usize> {
        self.track_ids.iter().position(|&id| id == track_id)
    }

    /// i番目の検出のキーポイント
    pub fn keypoints_at(&self, index: usize) -> Keypoints {
        Keypoints::from_arrays(
            self.keypoints.index_axis(Axis(0), index),
            self.confidences.index_axis(Axis(0), index),
        )
    }

    /// BBox 信頼度が min_score 未満の検出を除外
    pub fn retain_confident(&mut self, min_score: f64) {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.scores[i] >= min_score)
            .collect();
        if keep.len() == self.len() {
            return;
        }

        self.bboxes = self.bboxes.select(Axis(0), &keep);
        self.scores = self.scores.select(Axis(0), &keep);
        self.keypoints = self.keypoints.select(Axis(0), &keep);
        self.confidences = self.confidences.select(Axis(0), &keep);
        self.track_ids = keep.iter().map(|&i| self.track_ids[i]).collect();
    }

    /// フレーム端ちょうどに乗ったキーポイントの信頼度を0にする
    ///
    /// モデルは画面外の関節を端に張り付けて出力するため、実測値として扱わない。
    /// アスペクト比補正の前に呼ぶこと（補正後は端が 0/1 ではなくなる）
    pub fn filter_keypoints_at_edge(&mut self) {
        let keypoints = &self.keypoints;
        for ((i, k), conf) in self.confidences.indexed_iter_mut() {
            let x = keypoints[[i, k, 0]];
            let y = keypoints[[i, k, 1]];
            if x % 1.0 == 0.0 || y % 1.0 == 0.0 {
                *conf = 0.0;
            }
        }
    }

    /// 非正方形フレームの座標を正方形の正規化空間へ変換
    ///
    /// 横長なら y 軸、縦長なら x 軸を短辺比で縮めて中央寄せする
    pub fn correct_aspect_ratio(&mut self, frame_width: u32, frame_height: u32) {
        let (axis, ratio) = if frame_width > frame_height {
            (1, frame_height as f64 / frame_width as f64)
        } else {
            (0, frame_width as f64 / frame_height as f64)
        };
        let shift = (1.0 - ratio) / 2.0;

        for bbox_column in [axis, axis + 2] {
            self.bboxes
                .slice_mut(s![.., bbox_column])
                .mapv_inplace(|v| v * ratio + shift);
        }
        self.keypoints
            .slice_mut(s![.., .., axis])
            .mapv_inplace(|v| v * ratio + shift);
    }
}
