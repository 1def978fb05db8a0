//! 一括実行
//!
//! キーワード検索 → 同類製品の展開（中間ファイル出力）→ 価量調査データとの照合 → 出力
//! の順に実行する。失敗してもパニックせず `PipelineOutcome::Failure` を返す。

use crate::config::Config;
use crate::error::{MedPriceError, Result};
use crate::expander::{self, ExpandedProducts};
use crate::export;
use crate::index::{ProductIndex, SearchOutcome};
use crate::loader::load_table;
use crate::reconciler::{HistoryReconciler, ReconSummary};
use medprice_common::Table;
use std::path::{Path, PathBuf};

/// 入出力ファイルの場所
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub index: PathBuf,
    pub format: PathBuf,
    pub price: PathBuf,
    pub expanded: PathBuf,
    pub output: PathBuf,
}

impl PipelinePaths {
    /// 設定のファイル名をデータディレクトリに連結する
    pub fn resolve(base_dir: &Path, config: &Config) -> Self {
        let data_dir = config.data_dir(base_dir);
        Self {
            index: data_dir.join(&config.index_file),
            format: data_dir.join(&config.format_file),
            price: data_dir.join(&config.price_file),
            expanded: data_dir.join(&config.expanded_file),
            output: data_dir.join(&config.output_file),
        }
    }
}

/// 実行結果
#[derive(Debug)]
pub enum PipelineOutcome {
    /// 照合結果と集計
    Success { table: Table, summary: ReconSummary },
    /// 該当データなし（エラーではない）
    Empty(String),
    /// 処理失敗
    Failure(MedPriceError),
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }

    /// (結果表, 状態メッセージ, エラーメッセージ) に変換する
    ///
    /// 2つのメッセージはどちらか一方だけが空でない。
    pub fn into_messages(self) -> (Option<Table>, String, String) {
        match self {
            PipelineOutcome::Success { table, summary } => (Some(table), summary.message(), String::new()),
            PipelineOutcome::Empty(message) => (None, message, String::new()),
            PipelineOutcome::Failure(error) => (None, String::new(), error.user_message()),
        }
    }
}

/// 検索と展開（一致なしなら展開結果は空）
pub fn search_and_expand(
    index: &ProductIndex,
    keyword: &str,
    config: &Config,
) -> (SearchOutcome, ExpandedProducts) {
    let outcome = index.search(keyword, &config.search_options());
    let expanded = expander::expand(index, keyword.trim(), &outcome.matches);
    (outcome, expanded)
}

/// 検索から出力まで一括実行する
pub fn run_pipeline(keyword: &str, base_dir: &Path, config: &Config) -> PipelineOutcome {
    let paths = PipelinePaths::resolve(base_dir, config);
    run_with_paths(keyword, &paths, config)
}

/// ファイルの場所を指定して一括実行する
pub fn run_with_paths(keyword: &str, paths: &PipelinePaths, config: &Config) -> PipelineOutcome {
    match try_run(keyword, paths, config) {
        Ok(outcome) => outcome,
        Err(error) => {
            log::error!("{}", error);
            PipelineOutcome::Failure(error)
        }
    }
}

fn try_run(keyword: &str, paths: &PipelinePaths, config: &Config) -> Result<PipelineOutcome> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Ok(PipelineOutcome::Empty("キーワードが入力されていません".into()));
    }

    let index = ProductIndex::from_table(&load_table(&paths.index)?)?;
    let (search, expanded) = search_and_expand(&index, keyword, config);
    log::info!("検索結果: {} ({}件)", search.stage, search.matches.len());

    // 一致なしのときは古い中間ファイルで照合しない
    if expanded.is_empty() {
        return Ok(PipelineOutcome::Empty(format!(
            "「{}」に一致する製品が見つかりません",
            keyword
        )));
    }

    export::csv::write_csv(&expanded.table, &paths.expanded)?;
    log::info!("展開品項表: {} ({}件)", paths.expanded.display(), expanded.table.len());

    let format = load_table(&paths.format)?;
    let price = load_table(&paths.price)?;

    let reconciler = HistoryReconciler::new(config.normalizer(), config.valid_category_policy);
    let reconciled = reconciler.reconcile(&format, &expanded.table, &price)?;

    // 0件でも見出しだけの表を書き出し、前回の結果を残さない
    let written = export::export_table(&reconciled.table, config.output_format, &paths.output)?;

    if reconciled.table.is_empty() {
        return Ok(PipelineOutcome::Empty(
            "照合結果が0件でした（功能類別が一致する価量調査データがありません）".into(),
        ));
    }

    let summary = match written.into_iter().next() {
        Some(path) => reconciled.summary.with_output_path(path),
        None => reconciled.summary,
    };

    Ok(PipelineOutcome::Success {
        table: reconciled.table,
        summary,
    })
}
