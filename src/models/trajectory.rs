use crate::models::{
    calculus::{anchor_start, cumulative_integral, gradient},
    common::{ShapingMode, SwingTrajectory, TrajectoryConfig, TrajectoryError},
    profile::{GaussianShape, gaussian_profile, linspace},
    traits::ITrajectoryGenerator,
};
use tracing::debug;

/// 遊脚軌道ジェネレータ
///
/// x 軸は速度を先にガウス曲線で与えて積分し、z 軸は位置を先にガウス曲線で
/// 与えて微分します。ジェネレータは不変の設定のみを保持し、`generate` は
/// 毎回新しい配列を返す純粋関数です。
#[derive(Debug, Clone, PartialEq)]
pub struct SwingLegTrajectory {
    config: TrajectoryConfig,
    shaping: ShapingMode,
}

impl SwingLegTrajectory {
    /// 新しいジェネレータを作成します（整形モードは Reference）
    ///
    /// # 引数
    ///
    /// * `config` - 境界条件と一歩の時間
    ///
    /// # 戻り値
    ///
    /// `step_time <= 0` または非有限値を含む場合は `InvalidConfiguration`
    pub fn new(config: TrajectoryConfig) -> Result<Self, TrajectoryError> {
        Self::with_shaping(config, ShapingMode::Reference)
    }

    /// 整形モードを指定してジェネレータを作成
    pub fn with_shaping(config: TrajectoryConfig, shaping: ShapingMode) -> Result<Self, TrajectoryError> {
        config.validate()?;

        if shaping == ShapingMode::Reference {
            debug!(
                mid_x = config.mid_x,
                final_x = config.final_x,
                mid_z = config.mid_z,
                final_z = config.final_z,
                "TRAJECTORY_FIELDS_IGNORED: reference整形では mid_x, final_x, mid_z, final_z は軌道に反映されません"
            );
        }

        Ok(Self { config, shaping })
    }

    pub fn shaping(&self) -> ShapingMode {
        self.shaping
    }

    /// 軌道を生成
    ///
    /// # 引数
    ///
    /// * `num_points` - サンプル数（2 以上）
    ///
    /// # 戻り値
    ///
    /// 時間グリッドに揃った x位置、x速度、z位置、z速度
    pub fn generate(&self, num_points: usize) -> Result<SwingTrajectory, TrajectoryError> {
        if num_points < 2 {
            return Err(TrajectoryError::InvalidSampleCount(num_points));
        }

        let t_values = linspace(0.0, self.config.step_time, num_points)?;
        let dt = t_values[1] - t_values[0];

        let (x_position, x_velocity) = match self.shaping {
            ShapingMode::Reference => self.reference_x(&t_values, dt)?,
            ShapingMode::Boundary => self.boundary_x(&t_values, dt)?,
        };

        let z_position = match self.shaping {
            ShapingMode::Reference => self.reference_z(&t_values)?,
            ShapingMode::Boundary => self.boundary_z(&t_values)?,
        };
        let z_velocity = gradient(&z_position, &t_values)?;

        debug!(
            num_points,
            step_time = self.config.step_time,
            dt,
            shaping = %self.shaping,
            x_start = x_position[0],
            x_end = x_position[num_points - 1],
            "TRAJECTORY_GENERATED: 遊脚軌道を生成しました"
        );

        Ok(SwingTrajectory {
            t_values,
            x_position,
            x_velocity,
            z_position,
            z_velocity,
        })
    }

    /// x 軸: ガウス速度を積分し、始点を initial_x に合わせる
    fn reference_x(&self, t_values: &[f64], dt: f64) -> Result<(Vec<f64>, Vec<f64>), TrajectoryError> {
        let shape = GaussianShape::for_step(self.config.step_time)?;
        let x_velocity = gaussian_profile(t_values, &shape);
        let x_position = anchor_start(&cumulative_integral(&x_velocity, dt), self.config.initial_x);
        Ok((x_position, x_velocity))
    }

    /// x 軸: 速度の振幅を調整し initial_x から final_x へ到達させる
    fn boundary_x(&self, t_values: &[f64], dt: f64) -> Result<(Vec<f64>, Vec<f64>), TrajectoryError> {
        let shape = GaussianShape::for_step(self.config.step_time)?;
        let bell = gaussian_profile(t_values, &shape);
        let integrated = cumulative_integral(&bell, dt);

        let first = integrated[0];
        let area = integrated[integrated.len() - 1] - first;
        let travel = self.config.final_x - self.config.initial_x;
        let gain = travel / area;

        let x_velocity = bell.iter().map(|&v| v * gain).collect();
        let x_position: Vec<f64> = integrated
            .iter()
            .map(|&c| self.config.initial_x + travel * ((c - first) / area))
            .collect();

        if let Some(mid) = x_position.get(x_position.len() / 2) {
            debug!(
                mid_x = self.config.mid_x,
                achieved_mid_x = *mid,
                deviation = *mid - self.config.mid_x,
                "TRAJECTORY_MID_X: mid_x は目安値として扱われます"
            );
        }

        Ok((x_position, x_velocity))
    }

    /// z 軸: ガウス曲線をそのまま位置として使う（ピーク 1）
    fn reference_z(&self, t_values: &[f64]) -> Result<Vec<f64>, TrajectoryError> {
        let shape = GaussianShape::for_step(self.config.step_time)?;
        Ok(gaussian_profile(t_values, &shape))
    }

    /// z 軸: 裾を除いたガウス曲線を initial_z→final_z の基線に載せ、中央で mid_z
    fn boundary_z(&self, t_values: &[f64]) -> Result<Vec<f64>, TrajectoryError> {
        let shape = GaussianShape::for_step(self.config.step_time)?;
        let pedestal = shape.pedestal();
        let step_time = self.config.step_time;
        let initial_z = self.config.initial_z;
        let rise = self.config.final_z - initial_z;

        let baseline = |t: f64| initial_z + rise * (t / step_time);
        let lift = self.config.mid_z - baseline(shape.mu);

        Ok(t_values
            .iter()
            .map(|&t| {
                let bump = (shape.eval(t) - pedestal) / (1.0 - pedestal);
                baseline(t) + lift * bump
            })
            .collect())
    }
}

impl ITrajectoryGenerator for SwingLegTrajectory {
    fn generate(&self, num_points: usize) -> Result<SwingTrajectory, TrajectoryError> {
        SwingLegTrajectory::generate(self, num_points)
    }

    fn get_step_time(&self) -> f64 {
        self.config.step_time
    }
}
