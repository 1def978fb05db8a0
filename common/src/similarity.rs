//! 文字列類似度（0〜100）
//!
//! - `ratio`: 編集距離（strsim）に基づく一致率
//! - `token_set_ratio`: 単語の集合で比較するため語順や余分な語に強い

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;

lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"\W+").unwrap();
}

/// 記号を空白に置き換え、小文字化して前後の空白を除去する
fn preprocess(text: &str) -> String {
    NON_WORD_RE.replace_all(text, " ").trim().to_lowercase()
}

/// 2つの文字列の一致率（0〜100）
///
/// 正規化レーベンシュタイン距離に基づく。どちらかが空なら0。
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// 単語集合ベースの類似度（0〜100）
///
/// 共通語をソートして連結した文字列 `sect` と、
/// それぞれの差分語を `sect` の後ろに付けた文字列を作り、
/// 3通りの組み合わせの `ratio` の最大値を返す。
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(tokens_a.intersection(&tokens_b).copied());
    let diff_ab = join(tokens_a.difference(&tokens_b).copied());
    let diff_ba = join(tokens_b.difference(&tokens_a).copied());

    let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

    ratio(&sect, &combined_ab)
        .max(ratio(&sect, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

fn join<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}
