//! 価量調査データの照合
//!
//! 価量調査データ（價量調查品項）を展開品項表・核價類別清單と2段階で結合し、
//! 点数変更記録（點數變更記錄）を付与する。
//!
//! - 1段目: 特材代碼前五碼 = 功能類別(前5碼)（未加工の値で比較、一致しない行は除外）
//! - 2段目: 正規化した核價類別名稱が有効な核價類別に含まれるか（全行を残す）

mod summary;

pub use summary::ReconSummary;

use crate::error::{MedPriceError, Result};
use medprice_common::{columns, Normalizer, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 有効な核價類別の決め方
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidCategoryPolicy {
    /// 核價類別清單の全類別
    #[default]
    FormatOnly,
    /// 核價類別清單のうち、展開品項表の名稱にも現れる類別のみ
    IntersectExpanded,
}

impl std::str::FromStr for ValidCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "format-only" | "format" => Ok(ValidCategoryPolicy::FormatOnly),
            "intersect-expanded" | "intersect" => Ok(ValidCategoryPolicy::IntersectExpanded),
            _ => Err(format!(
                "Unknown policy: {}. Use format-only or intersect-expanded",
                s
            )),
        }
    }
}

impl std::fmt::Display for ValidCategoryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidCategoryPolicy::FormatOnly => write!(f, "format-only"),
            ValidCategoryPolicy::IntersectExpanded => write!(f, "intersect-expanded"),
        }
    }
}

/// 2段目の結合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinIndicator {
    /// 有効な核價類別に一致
    Both,
    /// 一致なし
    LeftOnly,
}

impl JoinIndicator {
    pub fn change_flag(self) -> u8 {
        match self {
            JoinIndicator::Both => 1,
            JoinIndicator::LeftOnly => 0,
        }
    }
}

/// 照合結果
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub table: Table,
    pub summary: ReconSummary,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryReconciler {
    normalizer: Normalizer,
    policy: ValidCategoryPolicy,
}

impl HistoryReconciler {
    pub fn new(normalizer: Normalizer, policy: ValidCategoryPolicy) -> Self {
        Self { normalizer, policy }
    }

    /// 3つの表を照合して出力表と集計を返す
    pub fn reconcile(&self, format: &Table, expanded: &Table, price: &Table) -> Result<Reconciled> {
        require_columns(format, "核價類別清單", &[columns::FORMAT_CATEGORY])?;
        require_columns(
            expanded,
            "展開品項表",
            &[columns::PRODUCT_NAME, columns::CATEGORY_CODE],
        )?;
        require_columns(
            price,
            "價量調查資料",
            &[columns::CODE_PREFIX, columns::CATEGORY_NAME],
        )?;

        let valid = self.valid_categories(format, expanded);
        log::debug!("有効な核價類別: {}種 ({})", valid.len(), self.policy);

        // 1段目: 功能類別コードの集合に含まれる行だけを残す
        let codes: HashSet<&str> = column_values(expanded, columns::CATEGORY_CODE)
            .into_iter()
            .collect();
        let prefixes = column_values(price, columns::CODE_PREFIX);
        let survivors: Vec<usize> = (0..price.len())
            .filter(|&row| codes.contains(prefixes[row]))
            .collect();
        let dropped = price.len() - survivors.len();
        log::debug!("功能類別で一致: {}件, 除外: {}件", survivors.len(), dropped);

        // 2段目: 正規化した核價類別名稱で有効類別と突き合わせる
        let names = column_values(price, columns::CATEGORY_NAME);
        let indicators: Vec<JoinIndicator> = survivors
            .iter()
            .map(|&row| {
                if valid.contains(&self.normalizer.normalize(names[row])) {
                    JoinIndicator::Both
                } else {
                    JoinIndicator::LeftOnly
                }
            })
            .collect();

        let table = project(price, &survivors, &indicators);
        let flagged_rows = indicators
            .iter()
            .filter(|&&i| i == JoinIndicator::Both)
            .count();

        let summary = ReconSummary::new(table.len(), flagged_rows, dropped, valid.len(), self.policy);
        log::info!("{}", summary.message());

        Ok(Reconciled { table, summary })
    }

    /// 有効な核價類別（正規化済み、空文字は含めない）
    pub fn valid_categories(&self, format: &Table, expanded: &Table) -> HashSet<String> {
        let format_set: HashSet<String> = self.normalized_set(format, columns::FORMAT_CATEGORY);

        match self.policy {
            ValidCategoryPolicy::FormatOnly => format_set,
            ValidCategoryPolicy::IntersectExpanded => {
                let expanded_names = self.normalized_set(expanded, columns::PRODUCT_NAME);
                format_set
                    .intersection(&expanded_names)
                    .cloned()
                    .collect()
            }
        }
    }

    fn normalized_set(&self, table: &Table, column: &str) -> HashSet<String> {
        column_values(table, column)
            .into_iter()
            .map(|value| self.normalizer.normalize(value))
            .filter(|value| !value.is_empty())
            .collect()
    }
}

fn require_columns(table: &Table, label: &str, required: &[&str]) -> Result<()> {
    let missing = table.missing_columns(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MedPriceError::MissingColumns {
            table: label.to_string(),
            columns: missing,
        })
    }
}

/// 検証済みの列の値（列がなければ空）
fn column_values<'a>(table: &'a Table, column: &str) -> Vec<&'a str> {
    table.column(column).unwrap_or_default()
}

/// 出力列に射影し、点数変更記録を付ける
///
/// 入力に同名の列があっても計算したフラグで置き換える。
fn project(price: &Table, survivors: &[usize], indicators: &[JoinIndicator]) -> Table {
    let source_columns: Vec<&str> = columns::OUTPUT_COLUMNS
        .iter()
        .copied()
        .filter(|&name| name != columns::CHANGE_FLAG)
        .collect();
    let selected = price.select(&source_columns);

    let mut headers: Vec<String> = selected.headers().to_vec();
    headers.push(columns::CHANGE_FLAG.to_string());

    let mut table = Table::new(headers);
    for (&row, indicator) in survivors.iter().zip(indicators) {
        let mut values = selected.rows()[row].clone();
        values.push(indicator.change_flag().to_string());
        table.push_row(values);
    }
    table
}
