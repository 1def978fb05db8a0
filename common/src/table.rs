//! 列名付きの表データ
//!
//! CSVの1ファイル分を文字列のまま保持する。欠損セルは空文字。
//! 行はすべてヘッダーと同じ列数にそろえて格納する。

use crate::error::{Error, Result};
use std::io::{Read, Write};

/// UTF-8 BOM
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// 空の表を作成
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// ヘッダーと行から作成（列数が合わない行は空文字で補うか切り詰める）
    pub fn with_rows<S: Into<String>>(
        headers: impl IntoIterator<Item = S>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列の位置（同名の列が複数あれば先頭）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 必須列のうち存在しないものを列挙
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// 列の値を行順に取得
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// セルの値
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// 行を追加（列数をヘッダーに合わせる）
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// 指定した列だけを指定順で取り出す（存在しない列は省略）
    pub fn select(&self, columns: &[&str]) -> Table {
        let picked: Vec<(String, usize)> = columns
            .iter()
            .filter_map(|name| self.column_index(name).map(|idx| (name.to_string(), idx)))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| picked.iter().map(|(_, idx)| row[*idx].clone()).collect())
            .collect();

        Table {
            headers: picked.into_iter().map(|(name, _)| name).collect(),
            rows,
        }
    }

    /// CSVを読み込む（先頭行をヘッダーとして扱い、BOMは除去）
    ///
    /// 列数が足りない行は空文字で補い、多すぎる行はエラーにする。
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(Error::Parse("ヘッダー行がありません".into()));
        }

        let mut table = Table::new(headers);
        for record in reader.records() {
            let record = record?;
            if record.len() > table.headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(Error::Parse(format!(
                    "{}行目の列数がヘッダーより多い: {} > {}",
                    line,
                    record.len(),
                    table.headers.len()
                )));
            }
            table.push_row(record.iter().map(str::to_string).collect());
        }

        Ok(table)
    }

    /// CSV文字列から読み込み
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes())
    }

    /// CSVとして書き出す
    pub fn write_csv<W: Write>(&self, mut writer: W, with_bom: bool) -> Result<()> {
        if with_bom {
            writer.write_all(UTF8_BOM)?;
        }

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = "\u{feff}功能類別(前5碼),名稱,大小類,類別
FBA01,人工水晶體,眼科,單焦
FBA01,\"人工水晶體, 非球面\",眼科,非球面
FBZ02,骨釘,骨科
";

    #[test]
    fn test_from_csv_strips_bom_and_pads() {
        let table = Table::from_csv_str(TEST_CSV).unwrap();
        assert_eq!(table.headers()[0], "功能類別(前5碼)");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1, "名稱"), Some("人工水晶體, 非球面"));
        // 列数不足の行は空文字で補完
        assert_eq!(table.get(2, "類別"), Some(""));
    }

    #[test]
    fn test_missing_columns() {
        let table = Table::from_csv_str(TEST_CSV).unwrap();
        assert!(table.missing_columns(&["名稱", "類別"]).is_empty());
        assert_eq!(
            table.missing_columns(&["名稱", "核價類別", "年份"]),
            vec!["核價類別".to_string(), "年份".to_string()]
        );
    }

    #[test]
    fn test_select_skips_absent_columns() {
        let table = Table::from_csv_str(TEST_CSV).unwrap();
        let selected = table.select(&["年份", "名稱", "功能類別(前5碼)"]);
        assert_eq!(selected.headers(), &["名稱".to_string(), "功能類別(前5碼)".to_string()]);
        assert_eq!(selected.rows()[2], vec!["骨釘".to_string(), "FBZ02".to_string()]);
    }

    #[test]
    fn test_write_csv_with_bom() {
        let table = Table::with_rows(["名稱", "數量"], vec![vec!["a,b".into(), "1".into()]]);
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer, true).unwrap();
        assert!(buffer.starts_with(UTF8_BOM));
        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "名稱,數量\n\"a,b\",1\n");
    }

    #[test]
    fn test_row_longer_than_header_is_error() {
        let err = Table::from_csv_str("特材代碼前五碼,核價類別名稱\nAB123,Foo,extra\n").unwrap_err();
        match err {
            Error::Parse(message) => assert!(message.contains("2行目"), "{}", message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(matches!(Table::from_csv_str(""), Err(Error::Parse(_))));
    }
}
