//! # Export モジュール
//!
//! 生成した軌道をプロットツールで読み込める形式で書き出します。
//! 軌道計算には一切影響しません。

use crate::models::SwingTrajectory;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// CSVのヘッダ行
pub const CSV_HEADER: &str = "index,t,x_position,x_velocity,z_position,z_velocity";

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Yaml,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            _ => Err(format!("無効な出力形式: {}. 利用可能: csv, yaml", s)),
        }
    }
}

impl ExportFormat {
    /// 拡張子から出力形式を推定（不明な場合は CSV）
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.parse().unwrap_or(ExportFormat::Csv),
            None => ExportFormat::Csv,
        }
    }
}

/// 書き出しエラー
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("書き込みエラー: {0}")]
    Io(#[from] io::Error),
    #[error("YAML変換エラー: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// 軌道をCSVで書き出し
pub fn write_csv<W: Write>(trajectory: &SwingTrajectory, mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for i in 0..trajectory.len() {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            i,
            trajectory.t_values[i],
            trajectory.x_position[i],
            trajectory.x_velocity[i],
            trajectory.z_position[i],
            trajectory.z_velocity[i]
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// 軌道をYAMLで書き出し
pub fn write_yaml<W: Write>(trajectory: &SwingTrajectory, mut writer: W) -> Result<(), ExportError> {
    serde_yaml::to_writer(&mut writer, trajectory)?;
    writer.flush()?;
    Ok(())
}

/// 軌道をファイルへ保存
pub fn save<P: AsRef<Path>>(trajectory: &SwingTrajectory, path: P, format: ExportFormat) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    match format {
        ExportFormat::Csv => write_csv(trajectory, writer),
        ExportFormat::Yaml => write_yaml(trajectory, writer),
    }
}
