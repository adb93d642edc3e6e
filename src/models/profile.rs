//! # Profile モジュール
//!
//! 遊脚軌道の形状を決めるガウス曲線と時間グリッドを生成します。
//!
//! ここで生成される曲線は正規化されていない（ピーク値 1）ガウス関数
//! `exp(-(t - mu)^2 / (2 * sigma^2))` です。平均は一歩の中央、標準偏差は
//! 一歩の時間の 1/7 に固定されています。

use crate::models::common::TrajectoryError;

/// 平均位置の分母（mu = step_time / 2）
pub const MEAN_DIVISOR: f64 = 2.0;

/// 標準偏差の分母（sigma = step_time / 7）
pub const SIGMA_DIVISOR: f64 = 7.0;

/// ガウス曲線の形状パラメータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianShape {
    /// 平均（秒）
    pub mu: f64,
    /// 標準偏差（秒）
    pub sigma: f64,
}

impl GaussianShape {
    pub fn new(mu: f64, sigma: f64) -> Result<Self, TrajectoryError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(TrajectoryError::InvalidConfiguration(format!(
                "gaussian shape requires finite mu and positive sigma (mu={}, sigma={})",
                mu, sigma
            )));
        }
        Ok(Self { mu, sigma })
    }

    /// 一歩の時間から形状パラメータを決定
    ///
    /// x 軸の速度プロファイルと z 軸の位置プロファイルは同じ関係
    /// （mu = T/2, sigma = T/7）で独立に生成されます。
    pub fn for_step(step_time: f64) -> Result<Self, TrajectoryError> {
        if !step_time.is_finite() || step_time <= 0.0 {
            return Err(TrajectoryError::InvalidConfiguration(format!(
                "step_time must be positive and finite (got {})",
                step_time
            )));
        }
        Self::new(step_time / MEAN_DIVISOR, step_time / SIGMA_DIVISOR)
    }

    /// 指定時刻での曲線値
    pub fn eval(&self, t: f64) -> f64 {
        gaussian(t, self.mu, self.sigma)
    }

    /// 区間 [0, 2*mu] の両端での曲線値（切り捨てられた裾の高さ）
    pub fn pedestal(&self) -> f64 {
        self.eval(0.0)
    }
}

/// 正規化されていないガウス関数（t = mu で 1）
pub fn gaussian(t: f64, mu: f64, sigma: f64) -> f64 {
    (-(t - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// 時間グリッド上でガウス曲線をサンプリング
pub fn gaussian_profile(t_values: &[f64], shape: &GaussianShape) -> Vec<f64> {
    t_values.iter().map(|&t| shape.eval(t)).collect()
}

/// [start, stop] を両端含めて `num_points` 等分したグリッド
///
/// 最終サンプルは丸め誤差を避けるため `stop` に厳密に一致させます。
pub fn linspace(start: f64, stop: f64, num_points: usize) -> Result<Vec<f64>, TrajectoryError> {
    if num_points < 2 {
        return Err(TrajectoryError::InvalidSampleCount(num_points));
    }

    let step = (stop - start) / (num_points - 1) as f64;
    let mut values: Vec<f64> = (0..num_points).map(|i| start + i as f64 * step).collect();
    values[num_points - 1] = stop;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_gaussian_peak_and_symmetry() {
        assert_relative_eq!(gaussian(0.5, 0.5, 0.1), 1.0);
        assert_relative_eq!(gaussian(0.3, 0.5, 0.1), gaussian(0.7, 0.5, 0.1));
        // 1σ 離れた点では exp(-1/2)
        assert_relative_eq!(gaussian(0.6, 0.5, 0.1), (-0.5f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_shape_for_step() {
        let shape = GaussianShape::for_step(1.4).unwrap();
        assert_relative_eq!(shape.mu, 0.7);
        assert_relative_eq!(shape.sigma, 0.2);
        // 端点の高さは step_time に依存しない
        assert_relative_eq!(shape.pedestal(), (-49.0f64 / 8.0).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_shape_rejects_bad_step_time() {
        assert!(matches!(
            GaussianShape::for_step(0.0),
            Err(TrajectoryError::InvalidConfiguration(_))
        ));
        assert!(GaussianShape::for_step(-1.0).is_err());
        assert!(GaussianShape::for_step(f64::NAN).is_err());
        assert!(GaussianShape::new(0.5, 0.0).is_err());
    }

    #[test]
    fn test_linspace_endpoints_and_spacing() {
        let t = linspace(0.0, 1.0, 11).unwrap();
        assert_eq!(t.len(), 11);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[10], 1.0);
        for w in t.windows(2) {
            assert_abs_diff_eq!(w[1] - w[0], 0.1, epsilon = 1e-12);
        }

        let two = linspace(0.0, 0.3, 2).unwrap();
        assert_eq!(two, vec![0.0, 0.3]);
    }

    #[test]
    fn test_linspace_rejects_short_grid() {
        assert!(matches!(linspace(0.0, 1.0, 1), Err(TrajectoryError::InvalidSampleCount(1))));
        assert!(matches!(linspace(0.0, 1.0, 0), Err(TrajectoryError::InvalidSampleCount(0))));
    }

    #[test]
    fn test_gaussian_profile_alignment() {
        let shape = GaussianShape::for_step(1.0).unwrap();
        let t = linspace(0.0, 1.0, 5).unwrap();
        let profile = gaussian_profile(&t, &shape);
        assert_eq!(profile.len(), t.len());
        assert_relative_eq!(profile[2], 1.0);
        assert_relative_eq!(profile[0], profile[4]);
        assert_relative_eq!(profile[1], profile[3]);
    }
}
