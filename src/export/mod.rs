pub mod csv;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use medprice_common::Table;
use std::path::{Path, PathBuf};

/// 照合結果のシート名
const SHEET_NAME: &str = "照合結果";

fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    output.with_extension(extension)
}

/// 照合結果を指定形式で書き出し、書き出したファイルを返す
///
/// `output` は CSV の出力先。Excel は同じ場所に拡張子 `.xlsx` で書き出す。
pub fn export_table(table: &Table, format: ExportFormat, output: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let csv_path = output_path_for_format(output, "csv");
        csv::write_csv(table, &csv_path)?;
        log::info!("CSV出力: {}", csv_path.display());
        written.push(csv_path);
    }

    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let excel_path = output_path_for_format(output, "xlsx");
        excel::write_xlsx(table, &excel_path, SHEET_NAME)?;
        log::info!("Excel出力: {}", excel_path.display());
        written.push(excel_path);
    }

    Ok(written)
}

/// 書き出し先と同じフォルダの一時ファイル
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

/// 一時ファイルに書いてから置き換える（途中で失敗しても既存ファイルは残る）
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path_for(path);
    if let Err(e) = write(&temp) {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }
    std::fs::rename(&temp, path)?;
    Ok(())
}
