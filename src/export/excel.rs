//! Excel出力（rust_xlsxwriter）
//!
//! 見出し行を太字・固定にし、10進数の値は数値セルで書く。
//! 先頭が0の値や指数表記（コード類）は文字列のまま残す。

use super::write_atomically;
use crate::error::{MedPriceError, Result};
use medprice_common::Table;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

pub fn write_xlsx(table: &Table, path: &Path, sheet_name: &str) -> Result<()> {
    write_atomically(path, |temp| {
        build_workbook(table, sheet_name)
            .and_then(|mut workbook| workbook.save(temp))
            .map_err(|e| MedPriceError::ExcelGeneration(e.to_string()))
    })
}

fn build_workbook(table: &Table, sheet_name: &str) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet().set_name(sheet_name)?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            match as_number(value) {
                Some(number) => worksheet.write_number(row_num, col as u16, number)?,
                None => worksheet.write_string(row_num, col as u16, value)?,
            };
        }
    }

    Ok(workbook)
}

/// 数字と小数点1つだけからなる値を数値とみなす（指数表記は文字列のまま）
fn as_number(value: &str) -> Option<f64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut parts = digits.splitn(2, '.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || !fraction.map_or(true, all_digits) {
        return None;
    }
    if integer.len() > 1 && integer.starts_with('0') {
        return None;
    }
    value.parse::<f64>().ok()
}
