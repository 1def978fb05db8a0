//! 同類製品の展開
//!
//! 検索で得た参考製品ごとに、同じ功能類別(前5碼)の製品をすべて取り出し、
//! 検索キーワードと参考製品名を付けて1つの表に連結する。
//! 複数の参考製品が同じ功能類別でも重複は除去しない。

use crate::index::ProductIndex;
use medprice_common::{columns, ClassificationRecord, MatchResult, Table};
use std::collections::BTreeMap;

/// 大小類ごとのまとまり（表示用、出力表には含めない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeClassGroup {
    pub reference_product: String,
    pub category_code: String,
    pub size_class: String,
    pub products: Vec<ClassificationRecord>,
}

/// 展開結果
#[derive(Debug, Clone, Default)]
pub struct ExpandedProducts {
    /// 展開品項表（IndexSQL_find.csv の内容）
    pub table: Table,
    /// 参考製品ごと・大小類ごとのまとまり
    pub groups: Vec<SizeClassGroup>,
}

impl ExpandedProducts {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// 参考製品と同じ功能類別の製品を展開する
pub fn expand(index: &ProductIndex, keyword: &str, matches: &[MatchResult]) -> ExpandedProducts {
    let mut table = Table::new(columns::EXPANDED_COLUMNS);
    let mut groups = Vec::new();

    for matched in matches {
        let siblings = index.records_by_code(&matched.category_code);
        log::debug!(
            "参考製品: {}, 功能類別: {} → {}件",
            matched.matched_name,
            matched.category_code,
            siblings.len()
        );

        for record in &siblings {
            let mut row = record.to_row();
            row.push(keyword.to_string());
            row.push(matched.matched_name.clone());
            table.push_row(row);
        }

        groups.extend(group_by_size_class(matched, &siblings));
    }

    ExpandedProducts { table, groups }
}

/// 大小類の値でまとめる（大小類の昇順）
fn group_by_size_class(matched: &MatchResult, siblings: &[&ClassificationRecord]) -> Vec<SizeClassGroup> {
    let mut by_size: BTreeMap<&str, Vec<ClassificationRecord>> = BTreeMap::new();
    for record in siblings {
        by_size
            .entry(record.size_class.as_str())
            .or_default()
            .push((*record).clone());
    }

    by_size
        .into_iter()
        .map(|(size_class, products)| SizeClassGroup {
            reference_product: matched.matched_name.clone(),
            category_code: matched.category_code.clone(),
            size_class: size_class.to_string(),
            products,
        })
        .collect()
}
