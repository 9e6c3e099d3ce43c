use serde::Serialize;
use tracing::debug;

use super::person::Person;
use super::tracking::Tracking;
use crate::clock;
use crate::config::Config;
use crate::pose::{DetectionBatch, Keypoints};

/// スロット1つ分の状態
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub track_id: Option<i64>,
    pub visible: bool,
    /// 割り当て済みで見えていないときの退役までの残り秒数
    pub timeout: Option<f64>,
}

/// 1フレーム分の処理結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseStats {
    /// 参加ジェスチャー待ちのトラック
    pub unassigned_track_ids: Vec<i64>,
    /// スロット順
    pub players: Vec<PlayerStats>,
}

/// 検出バッチ → トラッキング → スロットごとの Person 更新
pub struct PlayerTracker {
    tracking: Tracking,
    players: Vec<Person>,
    min_bbox_conf: f64,
}

impl PlayerTracker {
    pub fn new(max_num_persons: usize, min_keypoint_conf: f64, tracking_timeout: f64, min_bbox_conf: f64) -> Self {
        Self {
            tracking: Tracking::new(max_num_persons, min_keypoint_conf, tracking_timeout),
            players: (0..max_num_persons).map(|_| Person::new(min_keypoint_conf)).collect(),
            min_bbox_conf,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let pose = &config.pose;
        let gesture = &config.gesture;
        let mut tracker = Self::new(
            pose.max_num_persons,
            pose.min_keypoint_conf,
            pose.tracking_timeout,
            pose.min_bbox_conf,
        );
        let [width, height] = gesture.aspect_ratio;
        for person in tracker.players.iter_mut() {
            person.set_aspect_ratio(width, height);
            person.set_jump_sensitivity(gesture.jump_sensitivity);
            person.set_swipe_sensitivity(gesture.swipe_sensitivity);
        }
        tracker
    }

    pub fn tracking(&self) -> &Tracking {
        &self.tracking
    }

    pub fn players(&self) -> &[Person] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Person] {
        &mut self.players
    }

    pub fn player_mut(&mut self, slot: usize) -> Option<&mut Person> {
        self.players.get_mut(slot)
    }

    pub fn process_frame(&mut self, batch: DetectionBatch, frame_width: u32, frame_height: u32) -> PoseStats {
        self.process_frame_at(batch, frame_width, frame_height, clock::now())
    }

    /// 1フレーム分の検出を処理して各スロットの Person を更新する
    ///
    /// 未割り当てのスロットと、割り当て済みでも今フレームに映っていないスロットには
    /// 全て 0 のキーポイントを与える（フィルタ状態は保持したまま未検出扱いになる）
    pub fn process_frame_at(
        &mut self,
        mut batch: DetectionBatch,
        frame_width: u32,
        frame_height: u32,
        timestamp: f64,
    ) -> PoseStats {
        batch.retain_confident(self.min_bbox_conf);
        // 端判定は正規化座標のまま行う
        batch.filter_keypoints_at_edge();
        batch.correct_aspect_ratio(frame_width, frame_height);

        self.tracking.retire_tracks(&batch.track_ids, timestamp);
        let unassigned_track_ids =
            self.tracking
                .assign_tracks(&batch.track_ids, batch.keypoints.view(), batch.confidences.view());

        let mut players = Vec::with_capacity(self.players.len());
        for (slot, person) in self.players.iter_mut().enumerate() {
            let Some(track_id) = self.tracking.track_for_slot(slot) else {
                person.parse(Keypoints::zeroed(), timestamp);
                players.push(PlayerStats {
                    track_id: None,
                    visible: false,
                    timeout: None,
                });
                continue;
            };

            match batch.index_of(track_id) {
                Some(index) => {
                    person.parse(batch.keypoints_at(index), timestamp);
                    players.push(PlayerStats {
                        track_id: Some(track_id),
                        visible: true,
                        timeout: None,
                    });
                }
                None => {
                    person.parse(Keypoints::zeroed(), timestamp);
                    players.push(PlayerStats {
                        track_id: Some(track_id),
                        visible: false,
                        timeout: self.tracking.get_track_timeout(track_id, timestamp),
                    });
                }
            }
        }

        // フィルタは評価時にしか進まないので、見えていないスロットも含めて全て評価しておく
        for person in self.players.iter_mut() {
            person.snapshot();
        }

        debug!(
            "detections={} unassigned={:?} visible={}",
            batch.len(),
            unassigned_track_ids,
            players.iter().filter(|p| p.visible).count()
        );

        PoseStats {
            unassigned_track_ids,
            players,
        }
    }
}
