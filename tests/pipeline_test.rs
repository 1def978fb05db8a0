//! 一括実行の統合テスト
//!
//! 一時フォルダに分類マスタ・核價類別清單・価量調査データを置き、
//! 検索から出力までを通しで確認する。

use medprice_recon::cli::ExportFormat;
use medprice_recon::common::{columns, table::UTF8_BOM};
use medprice_recon::config::Config;
use medprice_recon::error::ErrorKind;
use medprice_recon::loader::load_table;
use medprice_recon::pipeline::{run_with_paths, PipelineOutcome, PipelinePaths};
use medprice_recon::reconciler::ValidCategoryPolicy;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const INDEX_CSV: &str = "\u{feff}功能類別(前5碼),名稱,大小類,類別
FBA01,人工水晶體,眼科-大,單焦
FBA01,人工水晶體 非球面,眼科-小,非球面
FBB02,骨釘,骨科,螺釘
FBC03,Scalpel Pro,外科,刀片
FBD04,導管,血管,導引
";

const FORMAT_CSV: &str = "核價類別
單焦人工水晶體
ＳＣＡＬＰＥＬ  Blade
";

const PRICE_CSV: &str = "年份,特材代碼,特材代碼前五碼,核價類別名稱,中英文品名,單位,支付點數,備註
108,FBA01001,FBA01,單焦人工水晶體,水晶體A,個,2744,x
109,FBA01002,FBA01, 多焦人工水晶體 ,水晶體B,個,3000,y
110,FBB02001,FBB02,單焦人工水晶體,骨釘A,支,500,z
111,FBC03001,FBC03,scalpel blade,刀片A,支,100,w
";

fn setup() -> (TempDir, PipelinePaths) {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();

    std::fs::write(data.join("IndexCode.csv"), INDEX_CSV).unwrap();
    std::fs::write(data.join("format_clean.csv"), FORMAT_CSV).unwrap();
    std::fs::write(data.join("price.csv"), PRICE_CSV).unwrap();

    let paths = PipelinePaths {
        index: data.join("IndexCode.csv"),
        format: data.join("format_clean.csv"),
        price: data.join("price.csv"),
        expanded: data.join("IndexSQL_find.csv"),
        output: data.join("HistoryData.csv"),
    };
    (dir, paths)
}

fn flags(table: &medprice_recon::common::Table) -> Vec<&str> {
    table.column(columns::CHANGE_FLAG).unwrap()
}

#[test]
fn test_exact_search_end_to_end() {
    let (_dir, paths) = setup();

    let outcome = run_with_paths("水晶體", &paths, &Config::default());
    let PipelineOutcome::Success { table, summary } = outcome else {
        panic!("照合結果が得られていない");
    };

    // FBA01 の2行のみ（FBB02 は展開対象外なので除外）
    assert_eq!(table.len(), 2);
    assert_eq!(flags(&table), vec!["1", "0"]);
    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.flagged_rows, 1);
    assert_eq!(summary.dropped_price_rows, 2);
    assert_eq!(summary.output_path.as_deref(), Some(paths.output.as_path()));

    // 出力列は固定順、ヘルパー列や未定義列は含まない
    let headers: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    assert_eq!(
        headers,
        vec!["年份", "特材代碼", "特材代碼前五碼", "核價類別名稱", "中英文品名", "單位", "支付點數", "點數變更記錄"]
    );

    // 表示用の値は正規化前のまま
    assert_eq!(table.get(1, columns::CATEGORY_NAME), Some(" 多焦人工水晶體 "));
}

#[test]
fn test_intermediate_and_output_files() {
    let (_dir, paths) = setup();

    let outcome = run_with_paths("水晶體", &paths, &Config::default());
    assert!(outcome.is_success());

    let expanded = load_table(&paths.expanded).unwrap();
    assert_eq!(expanded.headers().len(), 6);
    assert_eq!(expanded.len(), 4);
    assert_eq!(expanded.get(0, columns::SEARCH_KEYWORD), Some("水晶體"));
    assert_eq!(expanded.get(2, columns::REFERENCE_PRODUCT), Some("人工水晶體 非球面"));

    let bytes = std::fs::read(&paths.output).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    let output = load_table(&paths.output).unwrap();
    assert_eq!(output.len(), 2);
}

#[test]
fn test_fuzzy_search_end_to_end() {
    let (_dir, paths) = setup();

    let outcome = run_with_paths("scalpel", &paths, &Config::default());
    let PipelineOutcome::Success { table, summary } = outcome else {
        panic!("あいまい検索で照合結果が得られていない");
    };

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, columns::CODE_PREFIX), Some("FBC03"));
    // 全角・連続空白・大文字小文字の違いは正規化で吸収される
    assert_eq!(flags(&table), vec!["1"]);
    assert_eq!(summary.flagged_rows, 1);
}

#[test]
fn test_no_match_returns_empty_and_skips_output() {
    let (_dir, paths) = setup();

    let outcome = run_with_paths("xyz", &paths, &Config::default());
    assert!(matches!(outcome, PipelineOutcome::Empty(_)));
    assert!(!paths.expanded.exists());
    assert!(!paths.output.exists());

    let (table, status, error) = run_with_paths("xyz", &paths, &Config::default()).into_messages();
    assert!(table.is_none());
    assert!(status.contains("xyz"));
    assert!(error.is_empty());
}

#[test]
fn test_stale_intermediate_not_used() {
    let (_dir, paths) = setup();
    std::fs::write(
        &paths.expanded,
        "功能類別(前5碼),名稱,大小類,類別,搜尋關鍵字,參考產品\nFBB02,骨釘,骨科,螺釘,骨,骨釘\n",
    )
    .unwrap();

    let outcome = run_with_paths("xyz", &paths, &Config::default());
    assert!(matches!(outcome, PipelineOutcome::Empty(_)));
    assert!(!paths.output.exists());
}

#[test]
fn test_zero_rows_is_empty() {
    let (_dir, paths) = setup();
    std::fs::write(
        &paths.price,
        "特材代碼前五碼,核價類別名稱\nZZ999,單焦人工水晶體\n",
    )
    .unwrap();

    let outcome = run_with_paths("水晶體", &paths, &Config::default());
    assert!(matches!(outcome, PipelineOutcome::Empty(_)));

    // 見出しだけの出力を書き出す
    let output = load_table(&paths.output).unwrap();
    assert!(output.is_empty());
    assert!(output.has_column(columns::CHANGE_FLAG));
}

#[test]
fn test_zero_row_run_replaces_previous_output() {
    let (_dir, paths) = setup();

    let first = run_with_paths("水晶體", &paths, &Config::default());
    assert!(first.is_success());
    assert_eq!(load_table(&paths.output).unwrap().len(), 2);

    // 導管（FBD04）は価量調査データに該当行がない
    let second = run_with_paths("導管", &paths, &Config::default());
    assert!(matches!(second, PipelineOutcome::Empty(_)));

    let expanded = load_table(&paths.expanded).unwrap();
    assert_eq!(expanded.get(0, columns::SEARCH_KEYWORD), Some("導管"));

    let output = load_table(&paths.output).unwrap();
    assert!(output.is_empty());
    assert!(output.column(columns::CODE_PREFIX).unwrap().is_empty());
}

#[test]
fn test_missing_price_file_is_failure() {
    let (_dir, paths) = setup();
    std::fs::remove_file(&paths.price).unwrap();

    let outcome = run_with_paths("水晶體", &paths, &Config::default());
    let PipelineOutcome::Failure(error) = outcome else {
        panic!("ファイルなしが失敗として扱われていない");
    };
    assert_eq!(error.kind(), ErrorKind::FileAccess);

    let (table, status, message) = PipelineOutcome::Failure(error).into_messages();
    assert!(table.is_none());
    assert!(status.is_empty());
    assert!(message.starts_with("ファイルアクセスエラー："));
}

#[test]
fn test_missing_format_column_is_failure() {
    let (_dir, paths) = setup();
    std::fs::write(&paths.format, "類別\nFoo\n").unwrap();

    let outcome = run_with_paths("水晶體", &paths, &Config::default());
    let PipelineOutcome::Failure(error) = outcome else {
        panic!("列欠落が失敗として扱われていない");
    };
    assert_eq!(error.kind(), ErrorKind::Schema);
    assert!(error.to_string().contains("核價類別"));
    assert!(!paths.output.exists());
}

#[test]
fn test_intersect_policy_changes_counts() {
    let (_dir, paths) = setup();
    let config = Config {
        valid_category_policy: ValidCategoryPolicy::IntersectExpanded,
        ..Default::default()
    };

    // 有効類別が展開品項表の名稱にない → すべて0
    let PipelineOutcome::Success { summary, .. } = run_with_paths("水晶體", &paths, &config) else {
        panic!("照合結果が得られていない");
    };
    assert_eq!(summary.valid_categories, 0);
    assert_eq!(summary.flagged_rows, 0);
}

#[test]
fn test_excel_export_format() {
    let (_dir, paths) = setup();
    let config = Config {
        output_format: ExportFormat::Both,
        ..Default::default()
    };

    let outcome = run_with_paths("水晶體", &paths, &config);
    assert!(outcome.is_success());

    let xlsx = paths.output.with_extension("xlsx");
    assert!(xlsx.exists());
    let table = load_table(&xlsx).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0, columns::CHANGE_FLAG), Some("1"));
}

#[test]
fn test_run_pipeline_resolves_data_dir() {
    if std::env::var(medprice_recon::config::DATA_DIR_ENV).is_ok() {
        return;
    }
    let (dir, _paths) = setup();
    let config = Config {
        price_file: "price.csv".into(),
        ..Default::default()
    };

    let outcome = medprice_recon::pipeline::run_pipeline("骨釘", dir.path(), &config);
    let PipelineOutcome::Success { table, .. } = outcome else {
        panic!("照合結果が得られていない");
    };
    assert_eq!(table.len(), 1);
    assert!(Path::new(&dir.path().join("data").join("HistoryData.csv")).exists());
}
