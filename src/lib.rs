//! # swingleg
//!
//! 脚ロボット一歩分の遊脚軌道（前後 x・上下 z）をガウス曲線で生成するライブラリです。
//!
//! - x 軸: ガウス速度プロファイルを左リーマン和で積分して位置を得る
//! - z 軸: ガウス位置プロファイルを中心差分で微分して速度を得る
//!
//! ```rust
//! use swingleg::models::{SwingLegTrajectory, TrajectoryConfig};
//!
//! let config = TrajectoryConfig::new(0.0, 0.5, 1.0, 0.0, 0.2, 0.0, 1.0);
//! let generator = SwingLegTrajectory::new(config)?;
//! let trajectory = generator.generate(100)?;
//! assert_eq!(trajectory.x_position[0], 0.0);
//! # Ok::<(), swingleg::models::TrajectoryError>(())
//! ```

pub mod export;
pub mod logging;
pub mod models;
pub mod playback;
pub mod scenario;
