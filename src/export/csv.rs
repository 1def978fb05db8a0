//! CSV出力（UTF-8 BOM付き、表計算ソフトでそのまま開ける形式）

use super::write_atomically;
use crate::error::Result;
use medprice_common::Table;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    write_atomically(path, |temp| {
        let mut writer = BufWriter::new(File::create(temp)?);
        table.write_csv(&mut writer, true)?;
        writer.flush()?;
        Ok(())
    })
}
