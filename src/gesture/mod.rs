//! キーポイントからのジェスチャー検出
//!
//! 各検出器はフィルタ状態を内部に持つため、人物ごと・用途ごとに別インスタンスを使う。

mod arm_raising;
mod jumping;
mod leaning;
mod pointing;
mod shoulder_width;
mod steering;
mod swiping;

pub use arm_raising::{ArmRaising, ArmRaisingResult};
pub use jumping::{Jumping, JumpingResult, DEFAULT_SENSITIVITY as DEFAULT_JUMP_SENSITIVITY};
pub use leaning::{Leaning, LeaningResult};
pub use pointing::{Pointing, PointingResult};
pub use shoulder_width::{ShoulderWidth, ShoulderWidthResult};
pub use steering::{Steering, SteeringResult};
pub use swiping::{Swiping, SwipingResult, DEFAULT_SENSITIVITY as DEFAULT_SWIPE_SENSITIVITY};

use serde::Serialize;

use crate::pose::KeypointIndex;

/// 左右
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn eye(self) -> KeypointIndex {
        match self {
            Side::Left => KeypointIndex::LeftEye,
            Side::Right => KeypointIndex::RightEye,
        }
    }

    pub fn shoulder(self) -> KeypointIndex {
        match self {
            Side::Left => KeypointIndex::LeftShoulder,
            Side::Right => KeypointIndex::RightShoulder,
        }
    }

    pub fn elbow(self) -> KeypointIndex {
        match self {
            Side::Left => KeypointIndex::LeftElbow,
            Side::Right => KeypointIndex::RightElbow,
        }
    }

    pub fn wrist(self) -> KeypointIndex {
        match self {
            Side::Left => KeypointIndex::LeftWrist,
            Side::Right => KeypointIndex::RightWrist,
        }
    }
}

/// 人物ごとに評価するジェスチャーの種類（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum GestureKind {
    LeftArmRaising = 0,
    RightArmRaising = 1,
    Jumping = 2,
    Leaning = 3,
    LeftHandPointing = 4,
    RightHandPointing = 5,
    ShoulderWidth = 6,
    Steering = 7,
    LeftHandSwiping = 8,
    RightHandSwiping = 9,
}

impl GestureKind {
    pub const COUNT: usize = 10;

    pub const ALL: [GestureKind; GestureKind::COUNT] = [
        GestureKind::LeftArmRaising,
        GestureKind::RightArmRaising,
        GestureKind::Jumping,
        GestureKind::Leaning,
        GestureKind::LeftHandPointing,
        GestureKind::RightHandPointing,
        GestureKind::ShoulderWidth,
        GestureKind::Steering,
        GestureKind::LeftHandSwiping,
        GestureKind::RightHandSwiping,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GestureKind::LeftArmRaising => "left_arm_raising",
            GestureKind::RightArmRaising => "right_arm_raising",
            GestureKind::Jumping => "jumping",
            GestureKind::Leaning => "leaning",
            GestureKind::LeftHandPointing => "left_hand_pointing",
            GestureKind::RightHandPointing => "right_hand_pointing",
            GestureKind::ShoulderWidth => "shoulder_width",
            GestureKind::Steering => "steering",
            GestureKind::LeftHandSwiping => "left_hand_swiping",
            GestureKind::RightHandSwiping => "right_hand_swiping",
        }
    }
}

/// 1フレーム分のジェスチャー結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GestureResult {
    ArmRaising(ArmRaisingResult),
    Jumping(JumpingResult),
    Leaning(LeaningResult),
    Pointing(PointingResult),
    ShoulderWidth(ShoulderWidthResult),
    Steering(SteeringResult),
    Swiping(SwipingResult),
}
