use ndarray::{ArrayView1, ArrayView2};
use serde::Serialize;

use crate::clock;
use crate::gesture::{
    ArmRaising, ArmRaisingResult, GestureKind, GestureResult, Jumping, JumpingResult, Leaning,
    LeaningResult, Pointing, PointingResult, ShoulderWidth, ShoulderWidthResult, Side, Steering,
    SteeringResult, Swiping, SwipingResult,
};
use crate::pose::Keypoints;

struct Detectors {
    left_arm_raising: ArmRaising,
    right_arm_raising: ArmRaising,
    jumping: Jumping,
    leaning: Leaning,
    left_hand_pointing: Pointing,
    right_hand_pointing: Pointing,
    shoulder_width: ShoulderWidth,
    steering: Steering,
    left_hand_swiping: Swiping,
    right_hand_swiping: Swiping,
}

/// メモ付きアクセサ: 今フレームの結果があればそれを返し、なければ評価して記録する
macro_rules! memoized {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $variant:ident, $result:ty, |$person:ident| $eval:block) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> $result {
            if let Some(GestureResult::$variant(result)) = self.memo[GestureKind::$kind as usize] {
                return result;
            }
            let result = {
                let $person = &mut *self;
                $eval
            };
            self.memo[GestureKind::$kind as usize] = Some(GestureResult::$variant(result));
            result
        }
    };
}

/// 1スロット分の人物: 全ジェスチャー検出器と直近のキーポイント
///
/// ジェスチャーは読まれたときに評価し、同一フレーム内ではメモした結果を返す。
/// 検出器のフィルタは評価時にだけ進む。[`PlayerTracker`](super::PlayerTracker) は
/// 見えていないスロットも含めて毎フレーム全ジェスチャーを評価する。
pub struct Person {
    keypoints: Keypoints,
    timestamp: f64,
    memo: [Option<GestureResult>; GestureKind::COUNT],
    detectors: Detectors,
}

/// 全ジェスチャーの結果（リプレイ出力用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureSnapshot {
    pub left_arm_raising: ArmRaisingResult,
    pub right_arm_raising: ArmRaisingResult,
    pub jumping: JumpingResult,
    pub leaning: LeaningResult,
    pub left_hand_pointing: PointingResult,
    pub right_hand_pointing: PointingResult,
    pub shoulder_width: ShoulderWidthResult,
    pub steering: SteeringResult,
    pub left_hand_swiping: SwipingResult,
    pub right_hand_swiping: SwipingResult,
}

impl Person {
    pub fn new(min_keypoint_conf: f64) -> Self {
        let c = min_keypoint_conf;
        Self {
            keypoints: Keypoints::zeroed(),
            timestamp: 0.0,
            memo: [None; GestureKind::COUNT],
            detectors: Detectors {
                left_arm_raising: ArmRaising::new(c, Side::Left),
                right_arm_raising: ArmRaising::new(c, Side::Right),
                jumping: Jumping::new(c),
                leaning: Leaning::new(c),
                left_hand_pointing: Pointing::new(c, Side::Left),
                right_hand_pointing: Pointing::new(c, Side::Right),
                shoulder_width: ShoulderWidth::new(c),
                steering: Steering::new(c),
                left_hand_swiping: Swiping::new(c, Side::Left),
                right_hand_swiping: Swiping::new(c, Side::Right),
            },
        }
    }

    pub fn set_aspect_ratio(&mut self, width: f64, height: f64) {
        self.detectors.left_hand_pointing.set_aspect_ratio(width, height);
        self.detectors.right_hand_pointing.set_aspect_ratio(width, height);
    }

    pub fn set_jump_sensitivity(&mut self, sensitivity: f64) {
        self.detectors.jumping.set_sensitivity(sensitivity);
    }

    pub fn set_swipe_sensitivity(&mut self, sensitivity: f64) {
        self.detectors.left_hand_swiping.set_sensitivity(sensitivity);
        self.detectors.right_hand_swiping.set_sensitivity(sensitivity);
    }

    /// (17, 2) 座標と (17,) 信頼度を現在時刻で取り込む
    pub fn parse_keypoints(&mut self, xy: ArrayView2<f64>, confidence: ArrayView1<f64>) {
        self.parse_keypoints_at(xy, confidence, clock::now());
    }

    pub fn parse_keypoints_at(&mut self, xy: ArrayView2<f64>, confidence: ArrayView1<f64>, timestamp: f64) {
        self.parse(Keypoints::from_arrays(xy, confidence), timestamp);
    }

    /// キーポイントを差し替えてメモを破棄する
    pub fn parse(&mut self, keypoints: Keypoints, timestamp: f64) {
        self.keypoints = keypoints;
        self.timestamp = timestamp;
        self.memo = [None; GestureKind::COUNT];
    }

    pub fn keypoints(&self) -> &Keypoints {
        &self.keypoints
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn gesture(&mut self, kind: GestureKind) -> GestureResult {
        match kind {
            GestureKind::LeftArmRaising => GestureResult::ArmRaising(self.left_arm_raising()),
            GestureKind::RightArmRaising => GestureResult::ArmRaising(self.right_arm_raising()),
            GestureKind::Jumping => GestureResult::Jumping(self.jumping()),
            GestureKind::Leaning => GestureResult::Leaning(self.leaning()),
            GestureKind::LeftHandPointing => GestureResult::Pointing(self.left_hand_pointing()),
            GestureKind::RightHandPointing => GestureResult::Pointing(self.right_hand_pointing()),
            GestureKind::ShoulderWidth => GestureResult::ShoulderWidth(self.shoulder_width()),
            GestureKind::Steering => GestureResult::Steering(self.steering()),
            GestureKind::LeftHandSwiping => GestureResult::Swiping(self.left_hand_swiping()),
            GestureKind::RightHandSwiping => GestureResult::Swiping(self.right_hand_swiping()),
        }
    }

    pub fn snapshot(&mut self) -> GestureSnapshot {
        GestureSnapshot {
            left_arm_raising: self.left_arm_raising(),
            right_arm_raising: self.right_arm_raising(),
            jumping: self.jumping(),
            leaning: self.leaning(),
            left_hand_pointing: self.left_hand_pointing(),
            right_hand_pointing: self.right_hand_pointing(),
            shoulder_width: self.shoulder_width(),
            steering: self.steering(),
            left_hand_swiping: self.left_hand_swiping(),
            right_hand_swiping: self.right_hand_swiping(),
        }
    }

    memoized!(left_arm_raising, LeftArmRaising, ArmRaising, ArmRaisingResult, |p| {
        p.detectors.left_arm_raising.parse_keypoints(&p.keypoints)
    });

    memoized!(right_arm_raising, RightArmRaising, ArmRaising, ArmRaisingResult, |p| {
        p.detectors.right_arm_raising.parse_keypoints(&p.keypoints)
    });

    memoized!(jumping, Jumping, Jumping, JumpingResult, |p| {
        let width = p.shoulder_width().width;
        p.detectors.jumping.set_shoulder_width(width);
        p.detectors.jumping.parse_keypoints(&p.keypoints, p.timestamp)
    });

    memoized!(leaning, Leaning, Leaning, LeaningResult, |p| {
        p.detectors.leaning.parse_keypoints(&p.keypoints)
    });

    memoized!(left_hand_pointing, LeftHandPointing, Pointing, PointingResult, |p| {
        let width = p.shoulder_width().width;
        p.detectors.left_hand_pointing.set_shoulder_width(width);
        p.detectors.left_hand_pointing.parse_keypoints(&p.keypoints, p.timestamp)
    });

    memoized!(right_hand_pointing, RightHandPointing, Pointing, PointingResult, |p| {
        let width = p.shoulder_width().width;
        p.detectors.right_hand_pointing.set_shoulder_width(width);
        p.detectors.right_hand_pointing.parse_keypoints(&p.keypoints, p.timestamp)
    });

    memoized!(
        /// 他のジェスチャーの体格基準。フレームごとに最初に一度だけ評価される
        shoulder_width, ShoulderWidth, ShoulderWidth, ShoulderWidthResult, |p| {
            p.detectors.shoulder_width.parse_keypoints(&p.keypoints, p.timestamp)
        }
    );

    memoized!(steering, Steering, Steering, SteeringResult, |p| {
        let width = p.shoulder_width().width;
        p.detectors.steering.set_shoulder_width(width);
        p.detectors.steering.parse_keypoints(&p.keypoints)
    });

    memoized!(left_hand_swiping, LeftHandSwiping, Swiping, SwipingResult, |p| {
        let width = p.shoulder_width().width;
        p.detectors.left_hand_swiping.set_shoulder_width(width);
        p.detectors.left_hand_swiping.parse_keypoints(&p.keypoints, p.timestamp)
    });

    memoized!(right_hand_swiping, RightHandSwiping, Swiping, SwipingResult, |p| {
        let width = p.shoulder_width().width;
        p.detectors.right_hand_swiping.set_shoulder_width(width);
        p.detectors.right_hand_swiping.parse_keypoints(&p.keypoints, p.timestamp)
    });
}
