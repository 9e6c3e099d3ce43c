//! 記録済みの検出結果を再生し、フレームごとのトラッキング状態とジェスチャーを JSON Lines で出力する
//!
//! ```bash
//! pose-input recording.jsonl --config config.toml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use pose_input::config::Config;
use pose_input::recording::read_frames;
use pose_input::tracker::{GestureSnapshot, PlayerTracker, PoseStats};

const CONFIG_PATH: &str = "config.toml";

#[derive(Parser, Debug)]
#[command(name = "pose-input", version, about = "Replay recorded pose detections through player tracking and gesture detection")]
struct Args {
    /// 記録ファイル（1行 1フレームの JSON）
    #[arg(value_name = "RECORDING")]
    recording: PathBuf,

    /// TOML 設定ファイル（省略時は ./config.toml、なければ既定値）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// ログレベル (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// プレイヤースロット数の上書き
    #[arg(long, value_name = "N")]
    max_players: Option<usize>,
}

/// 出力1行分
#[derive(Serialize)]
struct FrameOutput<'a> {
    timestamp: f64,
    #[serde(flatten)]
    stats: &'a PoseStats,
    /// スロット順。見えていないスロットは null
    gestures: Vec<Option<GestureSnapshot>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    info!("pose-input {}", env!("GIT_VERSION"));

    let mut config = match args.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_PATH),
    };
    if let Some(n) = args.max_players {
        config.pose.max_num_persons = n;
    }
    config.validate()?;

    info!(
        "players={} timeout={}s min_keypoint_conf={} aspect_ratio={}:{}",
        config.pose.max_num_persons,
        config.pose.tracking_timeout,
        config.pose.min_keypoint_conf,
        config.gesture.aspect_ratio[0],
        config.gesture.aspect_ratio[1],
    );

    let file = File::open(&args.recording)
        .with_context(|| format!("Failed to open recording {}", args.recording.display()))?;
    let mut tracker = PlayerTracker::from_config(&config);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut frame_count = 0usize;
    for frame in read_frames(BufReader::new(file)) {
        let frame = frame.with_context(|| format!("Failed to read {}", args.recording.display()))?;
        let batch = frame
            .to_batch()
            .with_context(|| format!("Bad frame at t={}", frame.timestamp))?;

        let stats = tracker.process_frame_at(batch, frame.width, frame.height, frame.timestamp);
        let gestures = stats
            .players
            .iter()
            .zip(tracker.players_mut())
            .map(|(player, person)| player.visible.then(|| person.snapshot()))
            .collect();

        let output = FrameOutput {
            timestamp: frame.timestamp,
            stats: &stats,
            gestures,
        };
        serde_json::to_writer(&mut out, &output)?;
        writeln!(out)?;
        frame_count += 1;
    }
    out.flush()?;

    info!("Replayed {} frames", frame_count);
    Ok(())
}
