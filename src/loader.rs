//! 入力表の読み込み
//!
//! 拡張子が Excel/ODS のものは calamine で先頭シートを読み、それ以外は CSV として読む。
//! どちらも先頭行をヘッダーとし、セルは文字列として保持する。

use crate::error::{MedPriceError, Result};
use calamine::{open_workbook_auto, Reader};
use medprice_common::Table;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 表ファイルを読み込む
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(MedPriceError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|source| MedPriceError::FileAccess {
        path: path.display().to_string(),
        source,
    })?;

    let table = if is_spreadsheet(path) {
        drop(file);
        load_spreadsheet(path)?
    } else {
        Table::from_csv_reader(BufReader::new(file))?
    };

    log::debug!(
        "読み込み: {} ({}行, {}列)",
        path.display(),
        table.len(),
        table.headers().len()
    );
    Ok(table)
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| MedPriceError::ExcelRead(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MedPriceError::ExcelRead(format!("シートがありません: {}", path.display())))?
        .map_err(|e| MedPriceError::ExcelRead(format!("{}: {}", path.display(), e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let headers = rows
        .next()
        .filter(|headers| headers.iter().any(|h| !h.is_empty()))
        .ok_or_else(|| MedPriceError::ExcelRead(format!("ヘッダー行がありません: {}", path.display())))?;

    Ok(Table::with_rows(headers, rows.collect()))
}
