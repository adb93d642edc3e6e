use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 軌道生成のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    /// 設定値が不正（step_time <= 0、非有限値など）
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// サンプル数が 2 未満
    #[error("invalid sample count: {0} (at least 2 points are required)")]
    InvalidSampleCount(usize),
    /// サンプル列と時間グリッドの長さが一致しない
    #[error("length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// 遊脚軌道の境界条件と一歩の時間
///
/// 単位は呼び出し側に任せます（通常は m と s）。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TrajectoryConfig {
    pub initial_x: f64,
    pub mid_x: f64,
    pub final_x: f64,
    pub initial_z: f64,
    pub mid_z: f64,
    pub final_z: f64,
    /// 一歩（遊脚相）の時間（秒、> 0）
    pub step_time: f64,
}

impl TrajectoryConfig {
    pub fn new(
        initial_x: f64,
        mid_x: f64,
        final_x: f64,
        initial_z: f64,
        mid_z: f64,
        final_z: f64,
        step_time: f64,
    ) -> Self {
        Self {
            initial_x,
            mid_x,
            final_x,
            initial_z,
            mid_z,
            final_z,
            step_time,
        }
    }

    /// 設定値の検証
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        if !self.step_time.is_finite() || self.step_time <= 0.0 {
            return Err(TrajectoryError::InvalidConfiguration(format!(
                "step_time must be positive and finite (got {})",
                self.step_time
            )));
        }

        let boundaries = [
            ("initial_x", self.initial_x),
            ("mid_x", self.mid_x),
            ("final_x", self.final_x),
            ("initial_z", self.initial_z),
            ("mid_z", self.mid_z),
            ("final_z", self.final_z),
        ];
        for (name, value) in boundaries {
            if !value.is_finite() {
                return Err(TrajectoryError::InvalidConfiguration(format!(
                    "{} must be finite (got {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self::new(0.0, 0.5, 1.0, 0.0, 0.2, 0.0, 1.0)
    }
}

/// プロファイルの整形方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapingMode {
    /// 形状パラメータのみで決まる曲線（mid/final は使用しない）
    #[default]
    Reference,
    /// 境界条件（final_x, mid_z, initial_z, final_z）を満たすよう振幅を調整
    Boundary,
}

impl FromStr for ShapingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" | "ref" => Ok(ShapingMode::Reference),
            "boundary" | "bounded" => Ok(ShapingMode::Boundary),
            _ => Err(format!("無効な整形モード: {}. 利用可能: reference, boundary", s)),
        }
    }
}

impl fmt::Display for ShapingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapingMode::Reference => write!(f, "reference"),
            ShapingMode::Boundary => write!(f, "boundary"),
        }
    }
}

/// 生成された遊脚軌道
///
/// すべての列は同じ長さで、インデックス `i` は同じ時刻 `t_values[i]` を指します。
/// `t_values` は昇順です。フィールドを直接組み立てる場合もこの前提を守ってください
/// （守られていない場合、`sample_at` は `None` を返します）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingTrajectory {
    pub t_values: Vec<f64>,
    pub x_position: Vec<f64>,
    pub x_velocity: Vec<f64>,
    pub z_position: Vec<f64>,
    pub z_velocity: Vec<f64>,
}

/// ある時刻での目標値
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Setpoint {
    pub time: f64,
    pub x: f64,
    pub x_velocity: f64,
    pub z: f64,
    pub z_velocity: f64,
}

/// 軌道の概要（ピーク値と端点）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySummary {
    pub num_points: usize,
    pub step_time: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub peak_x_velocity: f64,
    pub peak_x_velocity_index: usize,
    pub z_start: f64,
    pub z_end: f64,
    pub peak_z: f64,
    pub peak_z_index: usize,
}

impl SwingTrajectory {
    pub fn len(&self) -> usize {
        self.t_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t_values.is_empty()
    }

    /// 4つのプロファイルを (x位置, x速度, z位置, z速度) の順で取り出す
    pub fn into_profiles(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.x_position, self.x_velocity, self.z_position, self.z_velocity)
    }

    /// 指定インデックスのサンプル
    pub fn setpoint(&self, index: usize) -> Option<Setpoint> {
        Some(Setpoint {
            time: *self.t_values.get(index)?,
            x: *self.x_position.get(index)?,
            x_velocity: *self.x_velocity.get(index)?,
            z: *self.z_position.get(index)?,
            z_velocity: *self.z_velocity.get(index)?,
        })
    }

    /// 任意時刻の目標値を線形補間で求める
    ///
    /// グリッド外の時刻は端点に丸めます。
    pub fn sample_at(&self, time: f64) -> Option<Setpoint> {
        let first = *self.t_values.first()?;
        let last = *self.t_values.last()?;
        if !(first <= last) {
            return None;
        }
        let t = time.clamp(first, last);

        let upper = self.t_values.partition_point(|&v| v < t);
        if upper == 0 {
            return self.setpoint(0);
        }
        if upper >= self.len() {
            return self.setpoint(self.len() - 1);
        }

        let lower = upper - 1;
        let span = self.t_values[upper] - self.t_values[lower];
        let ratio = if span > 0.0 {
            (t - self.t_values[lower]) / span
        } else {
            0.0
        };
        let lerp = |values: &[f64]| {
            let (a, b) = (values.get(lower)?, values.get(upper)?);
            Some(a + (b - a) * ratio)
        };

        Some(Setpoint {
            time: t,
            x: lerp(&self.x_position)?,
            x_velocity: lerp(&self.x_velocity)?,
            z: lerp(&self.z_position)?,
            z_velocity: lerp(&self.z_velocity)?,
        })
    }

    /// ピーク値と端点をまとめる
    pub fn summary(&self) -> TrajectorySummary {
        let (peak_x_velocity_index, peak_x_velocity) = argmax(&self.x_velocity);
        let (peak_z_index, peak_z) = argmax(&self.z_position);

        TrajectorySummary {
            num_points: self.len(),
            step_time: self.t_values.last().copied().unwrap_or(0.0),
            x_start: self.x_position.first().copied().unwrap_or(0.0),
            x_end: self.x_position.last().copied().unwrap_or(0.0),
            peak_x_velocity,
            peak_x_velocity_index,
            z_start: self.z_position.first().copied().unwrap_or(0.0),
            z_end: self.z_position.last().copied().unwrap_or(0.0),
            peak_z,
            peak_z_index,
        }
    }
}

impl fmt::Display for TrajectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== 軌道概要 ===")?;
        writeln!(f, "サンプル数: {}", self.num_points)?;
        writeln!(f, "一歩の時間: {:.3}秒", self.step_time)?;
        writeln!(f, "x位置: {:.4} -> {:.4}", self.x_start, self.x_end)?;
        writeln!(
            f,
            "x速度ピーク: {:.4} (サンプル {})",
            self.peak_x_velocity, self.peak_x_velocity_index
        )?;
        writeln!(f, "z位置: {:.4} -> {:.4}", self.z_start, self.z_end)?;
        write!(f, "z位置ピーク: {:.4} (サンプル {})", self.peak_z, self.peak_z_index)
    }
}

/// 最大値とそのインデックス（最初に現れたもの）
fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> SwingTrajectory {
        SwingTrajectory {
            t_values: vec![0.0, 0.5, 1.0],
            x_position: vec![0.0, 1.0, 2.0],
            x_velocity: vec![0.1, 1.0, 0.1],
            z_position: vec![0.0, 0.4, 0.0],
            z_velocity: vec![0.8, 0.0, -0.8],
        }
    }

    #[test]
    fn test_config_validate() {
        assert!(TrajectoryConfig::default().validate().is_ok());

        let mut config = TrajectoryConfig::default();
        config.step_time = 0.0;
        assert!(matches!(config.validate(), Err(TrajectoryError::InvalidConfiguration(_))));

        config.step_time = -0.5;
        assert!(config.validate().is_err());

        let mut config = TrajectoryConfig::default();
        config.mid_z = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shaping_mode_from_str() {
        assert_eq!(ShapingMode::from_str("reference"), Ok(ShapingMode::Reference));
        assert_eq!(ShapingMode::from_str("Boundary"), Ok(ShapingMode::Boundary));
        assert!(ShapingMode::from_str("linear").is_err());
        assert_eq!(ShapingMode::default(), ShapingMode::Reference);
    }

    #[test]
    fn test_sample_at_interpolates_and_clamps() {
        let traj = ramp();

        let mid = traj.sample_at(0.25).unwrap();
        assert_relative_eq!(mid.x, 0.5);
        assert_relative_eq!(mid.x_velocity, 0.55, epsilon = 1e-12);
        assert_relative_eq!(mid.z, 0.2, epsilon = 1e-12);
        assert_relative_eq!(mid.z_velocity, 0.4, epsilon = 1e-12);

        let on_grid = traj.sample_at(0.5).unwrap();
        assert_relative_eq!(on_grid.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(on_grid.x_velocity, 1.0, epsilon = 1e-12);
        assert_relative_eq!(on_grid.z, 0.4, epsilon = 1e-12);

        assert_eq!(traj.sample_at(-1.0).unwrap(), traj.setpoint(0).unwrap());
        assert_eq!(traj.sample_at(5.0).unwrap(), traj.setpoint(2).unwrap());
    }

    #[test]
    fn test_sample_at_empty() {
        let traj = SwingTrajectory {
            t_values: vec![],
            x_position: vec![],
            x_velocity: vec![],
            z_position: vec![],
            z_velocity: vec![],
        };
        assert!(traj.is_empty());
        assert!(traj.sample_at(0.0).is_none());
    }

    #[test]
    fn test_sample_at_rejects_inconsistent_series() {
        let mut short_z = ramp();
        short_z.z_velocity.truncate(1);
        assert!(short_z.sample_at(0.75).is_none());
        assert!(short_z.sample_at(1.0).is_none());

        let mut reversed = ramp();
        reversed.t_values = vec![1.0, 0.5, 0.0];
        assert!(reversed.sample_at(0.5).is_none());
    }

    #[test]
    fn test_into_profiles_order() {
        let traj = ramp();
        let expected = traj.clone();
        let (x_position, x_velocity, z_position, z_velocity) = traj.into_profiles();
        assert_eq!(x_position, expected.x_position);
        assert_eq!(x_velocity, expected.x_velocity);
        assert_eq!(z_position, expected.z_position);
        assert_eq!(z_velocity, expected.z_velocity);
    }

    #[test]
    fn test_summary() {
        let summary = ramp().summary();
        assert_eq!(summary.num_points, 3);
        assert_eq!(summary.peak_x_velocity_index, 1);
        assert_eq!(summary.peak_z_index, 1);
        assert_relative_eq!(summary.peak_z, 0.4);
        assert_relative_eq!(summary.x_end, 2.0);
        assert_relative_eq!(summary.step_time, 1.0);
    }
}
