//! # Playback モジュール
//!
//! 生成済みの遊脚軌道を固定制御周期で再生し、各ティックの目標値を提供します。
//!
//! 軌道は時間グリッド上の配列として生成されますが、制御ループの周期は
//! グリッド間隔と一致するとは限りません。このモジュールは固定時間刻み（Δt）
//! で時刻を進め、グリッド間を線形補間した目標値を返します。
//!
//! ## 処理の流れ
//!
//! 1. **軌道生成**: `ITrajectoryGenerator` から一歩分の軌道を取得
//! 2. **ティック処理**: 時刻 `k * dt` の目標値を補間で算出
//! 3. **終了判定**: 時刻が一歩の時間を超えたら停止
//!
//! 複数歩の連続再生（歩容シーケンス）は扱いません。
//!
//! ## 使用例
//!
//! ```rust
//! use swingleg::models::{SwingLegTrajectory, TrajectoryConfig};
//! use swingleg::playback::TrajectoryPlayer;
//!
//! let generator = SwingLegTrajectory::new(TrajectoryConfig::default()).unwrap();
//! let mut player = TrajectoryPlayer::from_generator(&generator, 100, 0.01, 0).unwrap();
//! let setpoints = player.run();
//! assert_eq!(setpoints.len(), 101);
//! ```

use crate::models::{ISetpointSource, ITrajectoryGenerator, Setpoint, SwingTrajectory, TrajectoryError};
use tracing::{debug, info, trace, warn};

/// 1回の再生で許容する最大ティック数
pub const MAX_TICKS: u64 = 1_000_000;

/// 終端時刻の判定に使う相対許容誤差
const END_TOLERANCE: f64 = 1e-9;

pub struct TrajectoryPlayer {
    pub current_time: f64,
    pub dt: f64,
    pub step_time: f64,
    pub step_count: u64,

    pub trajectory: SwingTrajectory,
    pub verbose_level: u8,
}

impl TrajectoryPlayer {
    /// 生成済みの軌道から再生器を作成
    ///
    /// # 引数
    ///
    /// * `trajectory` - 再生する軌道
    /// * `dt` - 制御周期（秒、> 0）
    /// * `verbose_level` - 進行状況ログの詳細度
    pub fn new(trajectory: SwingTrajectory, dt: f64, verbose_level: u8) -> Result<Self, TrajectoryError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TrajectoryError::InvalidConfiguration(format!(
                "playback dt must be positive and finite (got {})",
                dt
            )));
        }

        let step_time = match trajectory.t_values.last() {
            Some(&last) => last,
            None => return Err(TrajectoryError::InvalidSampleCount(0)),
        };

        Ok(Self {
            current_time: 0.0,
            dt,
            step_time,
            step_count: 0,
            trajectory,
            verbose_level,
        })
    }

    /// ジェネレータから軌道を生成して再生器を作成
    pub fn from_generator<G: ITrajectoryGenerator + ?Sized>(
        generator: &G,
        num_points: usize,
        dt: f64,
        verbose_level: u8,
    ) -> Result<Self, TrajectoryError> {
        let trajectory = generator.generate(num_points)?;
        Self::new(trajectory, dt, verbose_level)
    }

    /// 再生するティック数
    pub fn total_ticks(&self) -> u64 {
        // 極端に小さい dt では u64::MAX に飽和する
        (((self.step_time / self.dt) * (1.0 + END_TOLERANCE)).floor() as u64).saturating_add(1)
    }

    /// 再生位置を先頭に戻す
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.step_count = 0;
    }

    /// 最後まで再生し、全ティックの目標値を返す
    pub fn run(&mut self) -> Vec<Setpoint> {
        let total = self.total_ticks();
        if total > MAX_TICKS {
            warn!(
                total_ticks = total,
                max_ticks = MAX_TICKS,
                dt = self.dt,
                "PLAYBACK_TRUNCATED: ティック数が上限を超えるため再生を打ち切ります"
            );
        }

        if self.verbose_level > 0 {
            info!("=== 軌道再生開始 ===");
            info!("制御周期: {:.4}秒, ティック数: {}", self.dt, total.min(MAX_TICKS));
        }

        let mut setpoints = Vec::with_capacity(total.min(MAX_TICKS) as usize);
        while let Some(setpoint) = self.tick() {
            if self.verbose_level > 2 {
                trace!(
                    time = setpoint.time,
                    x = setpoint.x,
                    z = setpoint.z,
                    "時刻: {:.4}秒 (ステップ: {})",
                    setpoint.time,
                    self.step_count
                );
            }

            if self.step_count % 100 == 0 && self.verbose_level > 1 {
                let progress = (self.current_time / self.step_time).min(1.0) * 100.0;
                debug!("進行状況: {:.1}% ({:.3}/{:.3}秒)", progress, self.current_time, self.step_time);
            }

            setpoints.push(setpoint);

            if self.step_count >= MAX_TICKS {
                break;
            }
        }

        if self.verbose_level > 0 {
            info!("=== 軌道再生完了 ===");
            info!("総ステップ数: {}", self.step_count);
        }

        setpoints
    }
}

impl ISetpointSource for TrajectoryPlayer {
    fn tick(&mut self) -> Option<Setpoint> {
        if !self.is_active() {
            return None;
        }

        let setpoint = self.trajectory.sample_at(self.current_time)?;
        self.step_count += 1;
        // 累積誤差を避けるため加算ではなく乗算で時刻を求める
        self.current_time = self.step_count as f64 * self.dt;
        Some(setpoint)
    }

    fn get_time(&self) -> f64 {
        self.current_time
    }

    fn is_active(&self) -> bool {
        self.current_time <= self.step_time * (1.0 + END_TOLERANCE)
    }
}
