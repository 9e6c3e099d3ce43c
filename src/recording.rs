//! 記録済み検出結果（JSON Lines）の読み込み
//!
//! 1行 = 1フレーム。姿勢推定モデルとトラッカーの出力をそのまま保存したもので、
//! カメラや推論なしでトラッキングとジェスチャー判定を再生するのに使う。

use std::io::BufRead;

use ndarray::{Array1, Array2, Array3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pose::{DetectionBatch, KeypointIndex};

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("track {track_id}: expected {expected} keypoints, got {actual}")]
    KeypointCount {
        track_id: i64,
        expected: usize,
        actual: usize,
    },

    #[error("invalid frame size {width}x{height}")]
    FrameSize { width: u32, height: u32 },
}

/// 1人分の検出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDetection {
    pub track_id: i64,
    /// 正規化 xyxy
    pub bbox: [f64; 4],
    pub score: f64,
    /// 17 関節の [x, y, confidence]（正規化座標）
    pub keypoints: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// 秒（単調増加）
    pub timestamp: f64,
    /// 元フレームの画素サイズ（アスペクト比補正用）
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<RecordedDetection>,
}

impl RecordedFrame {
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self, RecordingError> {
        serde_json::from_str(line).map_err(|source| RecordingError::Json {
            line: line_number,
            source,
        })
    }

    /// 検出バッチへ変換
    pub fn to_batch(&self) -> Result<DetectionBatch, RecordingError> {
        if self.width == 0 || self.height == 0 {
            return Err(RecordingError::FrameSize {
                width: self.width,
                height: self.height,
            });
        }

        let n = self.detections.len();
        let mut bboxes = Array2::zeros((n, 4));
        let mut scores = Array1::zeros(n);
        let mut keypoints = Array3::zeros((n, KeypointIndex::COUNT, 2));
        let mut confidences = Array2::zeros((n, KeypointIndex::COUNT));

        for (i, detection) in self.detections.iter().enumerate() {
            if detection.keypoints.len() != KeypointIndex::COUNT {
                return Err(RecordingError::KeypointCount {
                    track_id: detection.track_id,
                    expected: KeypointIndex::COUNT,
                    actual: detection.keypoints.len(),
                });
            }
            for (j, v) in detection.bbox.iter().enumerate() {
                bboxes[[i, j]] = *v;
            }
            scores[i] = detection.score;
            for (k, [x, y, c]) in detection.keypoints.iter().enumerate() {
                keypoints[[i, k, 0]] = *x;
                keypoints[[i, k, 1]] = *y;
                confidences[[i, k]] = *c;
            }
        }

        Ok(DetectionBatch::new(
            bboxes,
            scores,
            self.detections.iter().map(|d| d.track_id).collect(),
            keypoints,
            confidences,
        ))
    }
}

/// JSON Lines を1フレームずつ読む（空行は読み飛ばす）
pub fn read_frames<R: BufRead>(reader: R) -> impl Iterator<Item = Result<RecordedFrame, RecordingError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(RecordedFrame::parse_line(&line, index + 1)),
            Err(e) => Some(Err(RecordingError::Io(e))),
        })
}
