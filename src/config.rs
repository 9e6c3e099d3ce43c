use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::gesture::{DEFAULT_JUMP_SENSITIVITY, DEFAULT_SWIPE_SENSITIVITY};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pose: PoseConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoseConfig {
    /// BBox 信頼度の下限（未満の検出は捨てる）
    #[serde(default = "default_min_bbox_conf")]
    pub min_bbox_conf: f64,
    /// キーポイント信頼度の閾値（全ジェスチャー共通）
    #[serde(default = "default_min_keypoint_conf")]
    pub min_keypoint_conf: f64,
    /// 見えなくなったトラックを退役させるまでの秒数
    #[serde(default = "default_tracking_timeout")]
    pub tracking_timeout: f64,
    /// プレイヤースロット数
    #[serde(default = "default_max_num_persons")]
    pub max_num_persons: usize,
}

fn default_min_bbox_conf() -> f64 { 0.8 }
fn default_min_keypoint_conf() -> f64 { 0.8 }
fn default_tracking_timeout() -> f64 { 4.0 }
fn default_max_num_persons() -> usize { 4 }

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            min_bbox_conf: default_min_bbox_conf(),
            min_keypoint_conf: default_min_keypoint_conf(),
            tracking_timeout: default_tracking_timeout(),
            max_num_persons: default_max_num_persons(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GestureConfig {
    /// ジャンプ感度（小さいほど速い上昇が必要）
    #[serde(default = "default_jump_sensitivity")]
    pub jump_sensitivity: f64,
    /// スワイプ感度（小さいほど速い手の動きが必要）
    #[serde(default = "default_swipe_sensitivity")]
    pub swipe_sensitivity: f64,
    /// ポインタを写す画面の [幅, 高さ]
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: [f64; 2],
}

fn default_jump_sensitivity() -> f64 { DEFAULT_JUMP_SENSITIVITY }
fn default_swipe_sensitivity() -> f64 { DEFAULT_SWIPE_SENSITIVITY }
fn default_aspect_ratio() -> [f64; 2] { [16.0, 9.0] }

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            jump_sensitivity: default_jump_sensitivity(),
            swipe_sensitivity: default_swipe_sensitivity(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 読めなければ警告を出して既定値で続行
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default config ({}): {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let pose = &self.pose;
        ensure!(
            (0.0..=1.0).contains(&pose.min_bbox_conf),
            "pose.min_bbox_conf must be in [0, 1], got {}",
            pose.min_bbox_conf
        );
        ensure!(
            (0.0..=1.0).contains(&pose.min_keypoint_conf),
            "pose.min_keypoint_conf must be in [0, 1], got {}",
            pose.min_keypoint_conf
        );
        ensure!(
            pose.tracking_timeout >= 0.0,
            "pose.tracking_timeout must not be negative, got {}",
            pose.tracking_timeout
        );
        ensure!(pose.max_num_persons >= 1, "pose.max_num_persons must be at least 1");

        let gesture = &self.gesture;
        ensure!(
            gesture.jump_sensitivity > 0.0,
            "gesture.jump_sensitivity must be positive, got {}",
            gesture.jump_sensitivity
        );
        ensure!(
            gesture.swipe_sensitivity > 0.0,
            "gesture.swipe_sensitivity must be positive, got {}",
            gesture.swipe_sensitivity
        );
        let [width, height] = gesture.aspect_ratio;
        ensure!(
            width > 0.0 && height > 0.0,
            "gesture.aspect_ratio must be positive, got [{}, {}]",
            width,
            height
        );
        Ok(())
    }
}
