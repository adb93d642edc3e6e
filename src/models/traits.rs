use crate::models::common::{SwingTrajectory, TrajectoryError};

/// 遊脚軌道ジェネレータの基本インターフェース
pub trait ITrajectoryGenerator {
    /// `num_points` 点の軌道を生成
    fn generate(&self, num_points: usize) -> Result<SwingTrajectory, TrajectoryError>;

    /// 一歩の時間の取得
    fn get_step_time(&self) -> f64;
}

/// 制御周期ごとに目標値を出すインターフェース
pub trait ISetpointSource {
    /// 1ティックの処理実行（終了済みなら None）
    fn tick(&mut self) -> Option<crate::models::common::Setpoint>;

    /// 現在時刻の取得
    fn get_time(&self) -> f64;

    /// まだ目標値を出せるかどうか
    fn is_active(&self) -> bool;
}
