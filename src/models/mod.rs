// 基本的なデータ型とエラー
pub mod common;

// 軌道生成の基本インターフェース（trait）定義
pub mod traits;

// ガウス曲線と時間グリッド
pub mod profile;

// 数値積分・数値微分
pub mod calculus;

// 遊脚軌道ジェネレータ
pub mod trajectory;

// 便利な re-export
pub use common::*;
pub use traits::*;
pub use trajectory::SwingLegTrajectory;
