use clap::{Parser, Subcommand};
use crate::reconciler::ValidCategoryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medprice")]
#[command(about = "特材價量調查・核價類別変更照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// キーワードで参考製品を検索し、同じ功能類別の製品を展開
    Search {
        /// 製品名またはキーワード（省略時は対話入力）
        keyword: Option<String>,

        /// 分類マスタCSV（IndexCode.csv）
        #[arg(short, long, required = true)]
        index: PathBuf,

        /// 展開品項表の出力先（デフォルト: 分類マスタと同じフォルダ/IndexSQL_find.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// あいまい検索の最低スコア（0-100）
        #[arg(short, long)]
        threshold: Option<u8>,
    },

    /// 価量調査データと展開品項表を照合して点数変更記録を付与
    Reconcile {
        /// 核價類別清單（format_clean.csv）
        #[arg(short, long, required = true)]
        format: PathBuf,

        /// 展開品項表（IndexSQL_find.csv）
        #[arg(short, long, required = true)]
        expanded: PathBuf,

        /// 価量調査データ
        #[arg(short, long, required = true)]
        price: PathBuf,

        /// 出力ファイル（デフォルト: 価量調査データと同じフォルダ/HistoryData.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/both)
        #[arg(long)]
        export: Option<ExportFormat>,

        /// 有効な核價類別の決め方 (format-only/intersect-expanded)
        #[arg(long)]
        policy: Option<ValidCategoryPolicy>,

        /// 集計結果をJSONで表示
        #[arg(long)]
        json: bool,
    },

    /// 検索から照合・出力まで一括実行
    Run {
        /// 製品名またはキーワード（省略時は対話入力）
        keyword: Option<String>,

        /// 基準ディレクトリ（この下の data/ を使用）
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,

        /// 出力形式 (csv/excel/both)
        #[arg(long)]
        export: Option<ExportFormat>,

        /// あいまい検索の最低スコア（0-100）
        #[arg(short, long)]
        threshold: Option<u8>,

        /// 集計結果をJSONで表示
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// あいまい検索の最低スコアを設定
        #[arg(long)]
        set_threshold: Option<u8>,

        /// 有効な核價類別の決め方を設定
        #[arg(long)]
        set_policy: Option<ValidCategoryPolicy>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("both".parse::<ExportFormat>(), Ok(ExportFormat::Both));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from(["medprice", "run", "人工水晶體", "--base-dir", "/tmp/x", "-t", "55"])
            .unwrap();
        match cli.command {
            Commands::Run { keyword, base_dir, threshold, .. } => {
                assert_eq!(keyword.as_deref(), Some("人工水晶體"));
                assert_eq!(base_dir, PathBuf::from("/tmp/x"));
                assert_eq!(threshold, Some(55));
            }
            _ => panic!("run コマンドとして解析されていない"),
        }
    }
}
