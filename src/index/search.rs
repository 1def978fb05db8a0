//! 製品検索
//!
//! 1. 完全一致（部分文字列）: 名稱・大小類・類別のいずれかにキーワードを含む行
//! 2. あいまい検索: 1で0件のときのみ、名稱との単語集合類似度で上位候補を評価

use super::ProductIndex;
use medprice_common::{token_set_ratio, ClassificationRecord, MatchResult};

/// 検索設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// 採用する最低スコア（0〜100）
    pub fuzzy_threshold: u8,
    /// スコア上位から評価する候補数
    pub fuzzy_limit: usize,
    /// 英字の大文字小文字を無視して部分一致を判定する
    pub exact_case_insensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 40,
            fuzzy_limit: 30,
            exact_case_insensitive: false,
        }
    }
}

/// 一致が得られた段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Exact,
    Fuzzy,
    NotFound,
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStage::Exact => write!(f, "完全一致"),
            SearchStage::Fuzzy => write!(f, "あいまい一致"),
            SearchStage::NotFound => write!(f, "一致なし"),
        }
    }
}

/// 検索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub stage: SearchStage,
    pub matches: Vec<MatchResult>,
    /// あいまい検索時のスコア（matchesと同順）
    pub scores: Vec<u8>,
}

impl SearchOutcome {
    fn not_found() -> Self {
        Self {
            stage: SearchStage::NotFound,
            matches: Vec::new(),
            scores: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl ProductIndex {
    /// キーワードから参考製品を検索する
    ///
    /// 一致しない場合は空の結果を返す（エラーではない）。
    pub fn search(&self, keyword: &str, options: &SearchOptions) -> SearchOutcome {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return SearchOutcome::not_found();
        }

        let exact = self.search_exact(keyword, options.exact_case_insensitive);
        if !exact.is_empty() {
            log::debug!("完全一致: {}件", exact.len());
            return SearchOutcome {
                stage: SearchStage::Exact,
                matches: exact,
                scores: Vec::new(),
            };
        }

        let (matches, scores) = self.search_fuzzy(keyword, options);
        if matches.is_empty() {
            log::info!("キーワード「{}」に一致する製品がありません", keyword);
            return SearchOutcome::not_found();
        }

        log::debug!("あいまい一致: {}件 (スコア {:?})", matches.len(), scores);
        SearchOutcome {
            stage: SearchStage::Fuzzy,
            matches,
            scores,
        }
    }

    /// 部分文字列一致（読み込み順）
    fn search_exact(&self, keyword: &str, case_insensitive: bool) -> Vec<MatchResult> {
        let needle = if case_insensitive {
            keyword.to_ascii_lowercase()
        } else {
            keyword.to_string()
        };

        let contains = |field: &str| {
            if case_insensitive {
                field.to_ascii_lowercase().contains(&needle)
            } else {
                field.contains(&needle)
            }
        };

        self.records
            .iter()
            .filter(|r| matches_any_field(r, &contains))
            .map(|r| MatchResult::new(r.product_name.clone(), r.category_code.clone()))
            .collect()
    }

    /// 名稱との類似度で上位候補を評価し、閾値以上を残す
    fn search_fuzzy(&self, keyword: &str, options: &SearchOptions) -> (Vec<MatchResult>, Vec<u8>) {
        let mut scored: Vec<(&str, u8)> = self
            .records
            .iter()
            .map(|r| (r.product_name.as_str(), token_set_ratio(keyword, &r.product_name)))
            .collect();

        // 安定ソートなので同点は元の順序を保つ
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(options.fuzzy_limit);

        let mut matches = Vec::new();
        let mut scores = Vec::new();
        for (name, score) in scored {
            if score < options.fuzzy_threshold {
                continue;
            }
            if let Some(code) = self.code_for_name(name) {
                matches.push(MatchResult::new(name, code));
                scores.push(score);
            }
        }

        (matches, scores)
    }
}

fn matches_any_field<F: Fn(&str) -> bool>(record: &ClassificationRecord, contains: &F) -> bool {
    contains(&record.product_name) || contains(&record.size_class) || contains(&record.type_class)
}
