use crate::models::{ShapingMode, SwingLegTrajectory, TrajectoryConfig, TrajectoryError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// デフォルトのサンプル数
pub const DEFAULT_NUM_POINTS: usize = 100;

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

/// サンプリング設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SamplingConfig {
    pub num_points: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_NUM_POINTS,
        }
    }
}

/// 再生設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackConfig {
    pub dt_s: f64,
}

/// 完全なシナリオ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub shaping: ShapingMode,
    #[serde(default)]
    pub playback: Option<PlaybackConfig>,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|e| ScenarioError::Io(path.to_path_buf(), e))?;

        let config: ScenarioConfig =
            serde_yaml::from_str(&contents).map_err(|e| ScenarioError::Parse(path.to_path_buf(), e))?;

        config.validate()?;

        Ok(config)
    }

    /// 組み込みのデモ用シナリオ
    pub fn demo() -> Self {
        Self {
            meta: ScenarioMeta {
                version: "1.0".to_string(),
                name: "demo_swing".to_string(),
                description: "一歩 1.0 秒、前方 1.0 の遊脚軌道".to_string(),
            },
            trajectory: TrajectoryConfig::default(),
            sampling: SamplingConfig::default(),
            shaping: ShapingMode::Reference,
            playback: None,
        }
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.trajectory.validate()?;

        if self.sampling.num_points < 2 {
            return Err(TrajectoryError::InvalidSampleCount(self.sampling.num_points).into());
        }

        if let Some(playback) = &self.playback {
            if !playback.dt_s.is_finite() || playback.dt_s <= 0.0 {
                return Err(ScenarioError::Validation("playback.dt_s must be positive".to_string()));
            }
        }

        Ok(())
    }

    /// 設定からジェネレータを作成
    pub fn build_generator(&self) -> Result<SwingLegTrajectory, ScenarioError> {
        Ok(SwingLegTrajectory::with_shaping(self.trajectory, self.shaping)?)
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        let t = &self.trajectory;
        println!("=== 境界条件 ===");
        println!("x: {:.3} -> {:.3} -> {:.3}", t.initial_x, t.mid_x, t.final_x);
        println!("z: {:.3} -> {:.3} -> {:.3}", t.initial_z, t.mid_z, t.final_z);
        println!("一歩の時間: {:.3}秒", t.step_time);
        println!();

        println!("=== 生成設定 ===");
        println!("サンプル数: {}", self.sampling.num_points);
        println!("整形モード: {}", self.shaping);
        if let Some(playback) = &self.playback {
            println!("再生周期: {:.4}秒", playback.dt_s);
        }
    }
}

/// シナリオ読み込みエラー
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("シナリオファイルが見つかりません: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("ファイル読み込みエラー {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("YAML解析エラー {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_yaml::Error),
    #[error("設定検証エラー: {0}")]
    Validation(String),
    #[error("設定検証エラー: {0}")]
    Trajectory(#[from] TrajectoryError),
}
