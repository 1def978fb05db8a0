//! 比較用文字列の正規化
//!
//! 1. NFKC正規化（全角→半角、互換文字の統一）
//! 2. 前後の空白を除去
//! 3. 連続する空白を半角スペース1つに圧縮
//! 4. 小文字化（`case_sensitive` で無効化できる）
//!
//! 欠損値（空文字、`NaN`、`NULL` など表計算ソフトが出力する表記）は空文字になる。
//! 元の値は書き換えず、常に新しい文字列を返す。

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 欠損値として扱う表記（小文字で比較）
const MISSING_MARKERS: &[&str] = &[
    "#n/a", "#n/a n/a", "#na", "-1.#ind", "-1.#qnan", "-nan", "1.#ind", "1.#qnan",
    "<na>", "n/a", "na", "nan", "null", "none",
];

/// 正規化設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    /// trueなら小文字化を行わない
    pub case_sensitive: bool,
}

impl Normalizer {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    /// 文字列を比較用の形式に変換する
    pub fn normalize(&self, text: &str) -> String {
        let composed: String = text.nfkc().collect();
        let collapsed = WHITESPACE_RE.replace_all(composed.trim(), " ");

        if is_missing(&collapsed) {
            return String::new();
        }

        if self.case_sensitive {
            collapsed.into_owned()
        } else {
            collapsed.to_lowercase()
        }
    }
}

/// デフォルト設定（小文字化あり）で正規化
pub fn normalize(text: &str) -> String {
    Normalizer::default().normalize(text)
}

fn is_missing(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let lower = value.to_lowercase();
    MISSING_MARKERS.contains(&lower.as_str())
}
