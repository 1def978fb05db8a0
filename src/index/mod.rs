//! 分類マスタ索引
//!
//! 分類マスタ（IndexCode.csv）を読み込み、製品検索と功能類別による
//! 同類製品の取得に使う。実行ごとに新しく構築し、呼び出し側が所有する。

mod search;

pub use search::{SearchOptions, SearchOutcome, SearchStage};

use crate::error::{MedPriceError, Result};
use medprice_common::{columns, ClassificationRecord, Table};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    /// 全レコード（読み込み順）
    records: Vec<ClassificationRecord>,
    /// 功能類別 → レコード位置
    by_code: HashMap<String, Vec<usize>>,
    /// 名稱 → 最初に現れたレコード位置
    by_name: HashMap<String, usize>,
}

impl ProductIndex {
    /// レコードから索引を構築
    pub fn build(records: Vec<ClassificationRecord>) -> Self {
        let mut by_code: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for (pos, record) in records.iter().enumerate() {
            by_code
                .entry(record.category_code.clone())
                .or_default()
                .push(pos);
            by_name.entry(record.product_name.clone()).or_insert(pos);
        }

        log::debug!(
            "分類マスタ索引を構築: {}件, 功能類別 {}種",
            records.len(),
            by_code.len()
        );

        Self {
            records,
            by_code,
            by_name,
        }
    }

    /// 分類マスタの表から構築（4列すべて必須）
    pub fn from_table(table: &Table) -> Result<Self> {
        let missing = table.missing_columns(&columns::CLASSIFICATION_COLUMNS);
        if !missing.is_empty() {
            return Err(MedPriceError::MissingColumns {
                table: "分類マスタ".into(),
                columns: missing,
            });
        }

        let records = (0..table.len())
            .map(|row| {
                let cell = |name: &str| table.get(row, name).unwrap_or_default().to_string();
                ClassificationRecord {
                    category_code: cell(columns::CATEGORY_CODE),
                    product_name: cell(columns::PRODUCT_NAME),
                    size_class: cell(columns::SIZE_CLASS),
                    type_class: cell(columns::TYPE_CLASS),
                }
            })
            .collect();

        Ok(Self::build(records))
    }

    pub fn records(&self) -> &[ClassificationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 同じ功能類別のレコード（読み込み順、未加工の値で比較）
    pub fn records_by_code(&self, code: &str) -> Vec<&ClassificationRecord> {
        self.by_code
            .get(code)
            .map(|positions| positions.iter().map(|&pos| &self.records[pos]).collect())
            .unwrap_or_default()
    }

    /// 名稱に対応する功能類別（同名が複数あれば最初の行）
    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&pos| self.records[pos].category_code.as_str())
    }
}
