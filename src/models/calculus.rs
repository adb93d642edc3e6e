//! # Calculus モジュール
//!
//! サンプル列に対する数値積分と数値微分を提供します。
//!
//! - **積分**: 左リーマン和による累積和（台形則ではない一次近似）
//! - **微分**: 内部点は中心差分、両端は片側差分の勾配

use crate::models::common::TrajectoryError;

/// 左リーマン和による累積積分
///
/// `result[i] = dt * (values[0] + ... + values[i])`
///
/// 最初の要素は `dt * values[0]` になり 0 ではありません。
/// 呼び出し側で始点を合わせる必要があります。
pub fn cumulative_integral(values: &[f64], dt: f64) -> Vec<f64> {
    let mut sum = 0.0;
    values
        .iter()
        .map(|&v| {
            sum += v;
            sum * dt
        })
        .collect()
}

/// 累積積分を始点が `initial` になるよう平行移動
pub fn anchor_start(integrated: &[f64], initial: f64) -> Vec<f64> {
    match integrated.first() {
        Some(&first) => integrated.iter().map(|&v| v - first + initial).collect(),
        None => Vec::new(),
    }
}

/// 時間グリッドに対する数値勾配
///
/// 内部点は不等間隔にも対応した二次精度の中心差分、
/// 両端は一次精度の片側差分で計算します。
pub fn gradient(values: &[f64], t_values: &[f64]) -> Result<Vec<f64>, TrajectoryError> {
    if values.len() != t_values.len() {
        return Err(TrajectoryError::LengthMismatch {
            expected: t_values.len(),
            actual: values.len(),
        });
    }

    let n = values.len();
    if n < 2 {
        return Err(TrajectoryError::InvalidSampleCount(n));
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / (t_values[1] - t_values[0]));

    for i in 1..n - 1 {
        let hs = t_values[i] - t_values[i - 1];
        let hd = t_values[i + 1] - t_values[i];
        let numerator = hs.powi(2) * values[i + 1] + (hd.powi(2) - hs.powi(2)) * values[i]
            - hd.powi(2) * values[i - 1];
        out.push(numerator / (hs * hd * (hd + hs)));
    }

    out.push((values[n - 1] - values[n - 2]) / (t_values[n - 1] - t_values[n - 2]));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{GaussianShape, gaussian_profile, linspace};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_cumulative_integral_is_left_riemann() {
        let result = cumulative_integral(&[1.0, 2.0, 3.0, 4.0], 0.5);
        assert_eq!(result, vec![0.5, 1.5, 3.0, 5.0]);
    }

    #[test]
    fn test_cumulative_integral_empty() {
        assert!(cumulative_integral(&[], 0.1).is_empty());
        assert!(anchor_start(&[], 1.0).is_empty());
    }

    #[test]
    fn test_anchor_start() {
        let anchored = anchor_start(&[0.5, 1.5, 3.0], -2.0);
        assert_eq!(anchored, vec![-2.0, -1.0, 0.5]);
    }

    #[test]
    fn test_gradient_linear_is_exact() {
        let t = linspace(0.0, 2.0, 9).unwrap();
        let f: Vec<f64> = t.iter().map(|&x| 3.0 * x - 1.0).collect();
        for g in gradient(&f, &t).unwrap() {
            assert_abs_diff_eq!(g, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gradient_quadratic_interior_is_exact() {
        // 中心差分は二次関数の内部点で厳密
        let t = vec![0.0, 0.1, 0.3, 0.6, 1.0];
        let f: Vec<f64> = t.iter().map(|&x| x * x).collect();
        let g = gradient(&f, &t).unwrap();
        for i in 1..t.len() - 1 {
            assert_abs_diff_eq!(g[i], 2.0 * t[i], epsilon = 1e-12);
        }
        // 端点は片側差分
        assert_relative_eq!(g[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(g[4], 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_two_points() {
        let g = gradient(&[1.0, 3.0], &[0.0, 0.5]).unwrap();
        assert_eq!(g, vec![4.0, 4.0]);
    }

    #[test]
    fn test_gradient_errors() {
        assert!(matches!(
            gradient(&[1.0, 2.0], &[0.0, 1.0, 2.0]),
            Err(TrajectoryError::LengthMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            gradient(&[1.0], &[0.0]),
            Err(TrajectoryError::InvalidSampleCount(1))
        ));
    }

    #[test]
    fn test_gradient_matches_gaussian_derivative() {
        let shape = GaussianShape::for_step(1.0).unwrap();
        let t = linspace(0.0, 1.0, 2001).unwrap();
        let f = gaussian_profile(&t, &shape);
        let g = gradient(&f, &t).unwrap();

        let peak_slope = 1.0 / shape.sigma * (-0.5f64).exp();
        for i in 1..t.len() - 1 {
            let exact = -(t[i] - shape.mu) / shape.sigma.powi(2) * f[i];
            assert_abs_diff_eq!(g[i], exact, epsilon = 1e-3 * peak_slope);
        }
    }

    #[test]
    fn test_integral_of_gaussian_approaches_closed_form() {
        // 全区間の積分は sigma * sqrt(2π) に近い（裾の切り捨ては無視できる）
        let shape = GaussianShape::for_step(1.0).unwrap();
        let t = linspace(0.0, 1.0, 4001).unwrap();
        let f = gaussian_profile(&t, &shape);
        let integral = cumulative_integral(&f, t[1] - t[0]);
        let area = integral[integral.len() - 1] - integral[0];
        let expected = shape.sigma * (2.0 * std::f64::consts::PI).sqrt();
        assert_relative_eq!(area, expected, max_relative = 1e-3);
    }
}
