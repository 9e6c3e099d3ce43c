use std::collections::BTreeMap;

use ndarray::{ArrayView2, ArrayView3, Axis};
use tracing::info;

use crate::clock;
use crate::gesture::{ArmRaising, Side};
use crate::pose::Keypoints;

/// トラックID → プレイヤースロットの割り当て
///
/// 上流トラッカーのIDは途切れたり振り直されたりするので、参加ジェスチャー（右腕上げ）を
/// したトラックだけを空いている最小番号のスロットに結び付ける。スロットの解放は
/// タイムアウトによる退役のみで、参加ジェスチャーなしに付け替えることはない。
pub struct Tracking {
    max_num_persons: usize,
    tracking_timeout: f64,
    join_gesture: ArmRaising,
    track_last_seen: BTreeMap<i64, f64>,
    person_to_track: BTreeMap<usize, i64>,
}

impl Tracking {
    pub fn new(max_num_persons: usize, min_keypoint_conf: f64, tracking_timeout: f64) -> Self {
        assert!(max_num_persons >= 1, "max_num_persons must be at least 1");
        Self {
            max_num_persons,
            tracking_timeout,
            join_gesture: ArmRaising::new(min_keypoint_conf, Side::Right),
            track_last_seen: BTreeMap::new(),
            person_to_track: BTreeMap::new(),
        }
    }

    pub fn max_num_persons(&self) -> usize {
        self.max_num_persons
    }

    /// スロット → トラックID
    pub fn person_to_track(&self) -> &BTreeMap<usize, i64> {
        &self.person_to_track
    }

    pub fn track_for_slot(&self, slot: usize) -> Option<i64> {
        self.person_to_track.get(&slot).copied()
    }

    /// 見えているトラックの最終時刻を更新し、タイムアウトしたトラックを退役させる
    ///
    /// 割り当てより先に毎フレーム呼ぶこと。退役したIDを昇順で返す。
    pub fn retire_tracks(&mut self, track_ids: &[i64], timestamp: f64) -> Vec<i64> {
        for &track_id in track_ids {
            self.track_last_seen.insert(track_id, timestamp);
        }

        let timeout = self.tracking_timeout;
        let retired: Vec<i64> = self
            .track_last_seen
            .iter()
            .filter(|(_, last_seen)| timestamp - **last_seen > timeout)
            .map(|(&track_id, _)| track_id)
            .collect();

        for track_id in &retired {
            self.track_last_seen.remove(track_id);
            self.person_to_track.retain(|&slot, track| {
                if *track == *track_id {
                    info!("Player {} left (track {} timed out)", slot, track_id);
                    false
                } else {
                    true
                }
            });
        }

        retired
    }

    pub fn retire_tracks_now(&mut self, track_ids: &[i64]) -> Vec<i64> {
        self.retire_tracks(track_ids, clock::now())
    }

    /// 未割り当てのトラックのうち参加ジェスチャーをしたものを空きスロットへ割り当てる
    ///
    /// keypoints: (n, 17, 2)、confidences: (n, 17)、n は track_ids と同じ長さ。
    /// 割り当てられずに残ったトラックIDを入力順で返す。
    pub fn assign_tracks(
        &mut self,
        track_ids: &[i64],
        keypoints: ArrayView3<f64>,
        confidences: ArrayView2<f64>,
    ) -> Vec<i64> {
        let mut unassigned = Vec::new();

        for (index, &track_id) in track_ids.iter().enumerate() {
            if self.person_to_track.values().any(|&t| t == track_id) {
                continue;
            }

            let pose = Keypoints::from_arrays(
                keypoints.index_axis(Axis(0), index),
                confidences.index_axis(Axis(0), index),
            );
            let joined = self.join_gesture.parse_keypoints(&pose).detected
                && match self.first_free_slot() {
                    Some(slot) => {
                        self.person_to_track.insert(slot, track_id);
                        info!("Player {} joined (track {})", slot, track_id);
                        true
                    }
                    None => false,
                };

            if !joined {
                unassigned.push(track_id);
            }
        }

        unassigned
    }

    fn first_free_slot(&self) -> Option<usize> {
        (0..self.max_num_persons).find(|slot| !self.person_to_track.contains_key(slot))
    }

    /// 退役までの残り時間（秒）。未知のトラックなら None
    pub fn get_track_timeout(&self, track_id: i64, timestamp: f64) -> Option<f64> {
        self.track_last_seen
            .get(&track_id)
            .map(|&last_seen| self.tracking_timeout - (timestamp - last_seen))
    }

    pub fn get_track_timeout_now(&self, track_id: i64) -> Option<f64> {
        self.get_track_timeout(track_id, clock::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::fixture::{batch_of, StandingPose};

    const MIN_CONF: f64 = 0.8;

    fn step(
        tracking: &mut Tracking,
        track_ids: &[i64],
        poses: &[&StandingPose],
        timestamp: f64,
    ) -> (Vec<i64>, Vec<i64>) {
        let detections: Vec<_> = track_ids.iter().zip(poses).map(|(&id, &&pose)| (id, pose)).collect();
        let batch = batch_of(&detections);
        let retired = tracking.retire_tracks(track_ids, timestamp);
        let unassigned = tracking.assign_tracks(track_ids, batch.keypoints.view(), batch.confidences.view());
        (retired, unassigned)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_join_play_leave_rejoin() {
        let mut tracking = Tracking::new(4, MIN_CONF, 4.0);
        let mut pose1 = StandingPose::new();
        let mut pose2 = StandingPose::new();
        let mut pose3 = StandingPose::new();

        // 1 と 2 が入ってくるが、誰も手を上げない
        let (retired, unassigned) = step(&mut tracking, &[1, 2], &[&pose1, &pose2], 1.0);
        assert!(retired.is_empty());
        assert_eq!(unassigned, vec![1, 2]);
        assert!(tracking.person_to_track().is_empty());

        // 1 が手を上げる
        pose1.raise_right_arm();
        let (retired, unassigned) = step(&mut tracking, &[1, 2], &[&pose1, &pose2], 2.0);
        assert!(retired.is_empty());
        assert_eq!(unassigned, vec![2]);
        assert_eq!(tracking.track_for_slot(0), Some(1));
        assert_eq!(tracking.track_for_slot(1), None);
        pose1.lower_right_arm();

        // 2 が手を上げる
        pose2.raise_right_arm();
        let (retired, unassigned) = step(&mut tracking, &[1, 2], &[&pose1, &pose2], 3.0);
        assert!(retired.is_empty());
        assert!(unassigned.is_empty());
        assert_eq!(tracking.track_for_slot(0), Some(1));
        assert_eq!(tracking.track_for_slot(1), Some(2));
        assert_eq!(tracking.track_for_slot(2), None);
        pose2.lower_right_arm();

        // 1 が 4 秒未満だけ見えなくなる
        let (retired, unassigned) = step(&mut tracking, &[2], &[&pose2], 6.0);
        assert!(retired.is_empty());
        assert!(unassigned.is_empty());
        assert_eq!(tracking.track_for_slot(0), Some(1));
        assert_close(tracking.get_track_timeout(1, 6.0).unwrap(), 1.0);
        assert_eq!(tracking.track_for_slot(1), Some(2));
        assert_close(tracking.get_track_timeout(2, 6.0).unwrap(), 4.0);

        // 1 が 4 秒を超えて見えない
        let (retired, unassigned) = step(&mut tracking, &[2], &[&pose2], 8.0);
        assert_eq!(retired, vec![1]);
        assert!(unassigned.is_empty());
        assert_eq!(tracking.track_for_slot(0), None);
        assert_eq!(tracking.track_for_slot(1), Some(2));
        assert_close(tracking.get_track_timeout(2, 8.0).unwrap(), 4.0);
        assert_eq!(tracking.get_track_timeout(1, 8.0), None);

        // 3 が入ってきて手を上げる: 空いた最小スロット 0 に入る
        pose3.raise_right_arm();
        let (retired, unassigned) = step(&mut tracking, &[2, 3], &[&pose2, &pose3], 9.0);
        assert!(retired.is_empty());
        assert!(unassigned.is_empty());
        assert_eq!(tracking.track_for_slot(0), Some(3));
        assert_eq!(tracking.track_for_slot(1), Some(2));
        assert_eq!(tracking.track_for_slot(2), None);
        assert_eq!(tracking.track_for_slot(3), None);
    }

    #[test]
    fn test_no_free_slot() {
        let mut tracking = Tracking::new(1, MIN_CONF, 4.0);
        let mut pose = StandingPose::new();
        pose.raise_right_arm();

        let (_, unassigned) = step(&mut tracking, &[7, 8], &[&pose, &pose], 0.0);
        assert_eq!(unassigned, vec![8]);
        assert_eq!(tracking.track_for_slot(0), Some(7));
    }

    #[test]
    fn test_assigned_track_not_reassigned() {
        let mut tracking = Tracking::new(2, MIN_CONF, 4.0);
        let mut pose = StandingPose::new();
        pose.raise_right_arm();

        step(&mut tracking, &[5], &[&pose], 0.0);
        step(&mut tracking, &[5], &[&pose], 0.1);
        assert_eq!(tracking.track_for_slot(0), Some(5));
        assert_eq!(tracking.track_for_slot(1), None);
    }

    #[test]
    fn test_timeout_boundary_is_exclusive() {
        let mut tracking = Tracking::new(1, MIN_CONF, 4.0);
        let mut pose = StandingPose::new();
        pose.raise_right_arm();
        step(&mut tracking, &[1], &[&pose], 0.0);

        // ちょうど 4 秒ではまだ退役しない
        let (retired, _) = step(&mut tracking, &[], &[], 4.0);
        assert!(retired.is_empty());
        assert_eq!(tracking.track_for_slot(0), Some(1));

        let (retired, _) = step(&mut tracking, &[], &[], 4.5);
        assert_eq!(retired, vec![1]);
        assert_eq!(tracking.track_for_slot(0), None);
    }

    #[test]
    fn test_low_confidence_join_ignored() {
        let mut tracking = Tracking::new(2, MIN_CONF, 4.0);
        let mut pose = StandingPose::new();
        pose.raise_right_arm();
        pose.right_elbow[2] = 0.5;

        let (_, unassigned) = step(&mut tracking, &[1], &[&pose], 0.0);
        assert_eq!(unassigned, vec![1]);
        assert!(tracking.person_to_track().is_empty());
    }

    #[test]
    #[should_panic(expected = "max_num_persons")]
    fn test_zero_persons_rejected() {
        Tracking::new(0, MIN_CONF, 4.0);
    }
}
