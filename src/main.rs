use clap::Parser;
use dialoguer::Input;
use medprice_recon::{cli, config, error, expander, export, index, loader, pipeline, reconciler};
use cli::{Cli, Commands};
use config::Config;
use error::{MedPriceError, Result};
use index::ProductIndex;
use pipeline::PipelineOutcome;
use reconciler::{HistoryReconciler, ReconSummary};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = Config::load()?;

    match cli.command {
        Commands::Search { keyword, index, output, threshold } => {
            println!("🔍 medprice - 参考製品検索\n");

            if let Some(threshold) = threshold {
                config.fuzzy_threshold = threshold;
                config.validate()?;
            }
            let keyword = resolve_keyword(keyword)?;

            println!("[1/3] 分類マスタを読み込み中...");
            let product_index = ProductIndex::from_table(&loader::load_table(&index)?)?;
            println!("✔ {}件の製品を読み込み\n", product_index.len());

            println!("[2/3] 検索中...");
            let (outcome, expanded) = pipeline::search_and_expand(&product_index, &keyword, &config);
            if outcome.is_empty() {
                println!("「{}」に一致する製品が見つかりません", keyword);
                return Ok(());
            }
            println!("✔ {}: {}件\n", outcome.stage, outcome.matches.len());
            print_size_class_report(&expanded);

            println!("[3/3] 展開品項表を保存中...");
            let output = output.unwrap_or_else(|| sibling_path(&index, &config.expanded_file));
            export::csv::write_csv(&expanded.table, &output)?;
            println!("✔ {}件を保存: {}", expanded.table.len(), output.display());

            println!("\n✅ 検索完了");
        }

        Commands::Reconcile { format, expanded, price, output, export: export_arg, policy, json } => {
            println!("📊 medprice - 点数変更照合\n");

            if let Some(policy) = policy {
                config.valid_category_policy = policy;
            }
            let export_format = export_arg.unwrap_or(config.output_format);

            println!("[1/3] データを読み込み中...");
            let format_table = loader::load_table(&format)?;
            let expanded_table = loader::load_table(&expanded)?;
            let price_table = loader::load_table(&price)?;
            println!("✔ 價量調查データ {}件\n", price_table.len());

            println!("[2/3] 照合中... (有効類別: {})", config.valid_category_policy);
            let reconciler = HistoryReconciler::new(config.normalizer(), config.valid_category_policy);
            let reconciled = reconciler.reconcile(&format_table, &expanded_table, &price_table)?;
            println!("✔ 照合完了\n");

            println!("[3/3] 出力中...");
            let output = output.unwrap_or_else(|| sibling_path(&price, &config.output_file));
            let written = export::export_table(&reconciled.table, export_format, &output)?;
            for path in &written {
                println!("✔ 出力: {}", path.display());
            }

            let summary = match written.into_iter().next() {
                Some(path) => reconciled.summary.with_output_path(path),
                None => reconciled.summary,
            };
            print_summary(&summary, json)?;
        }

        Commands::Run { keyword, base_dir, export: export_arg, threshold, json } => {
            println!("🚀 medprice - 一括処理\n");

            if let Some(threshold) = threshold {
                config.fuzzy_threshold = threshold;
                config.validate()?;
            }
            if let Some(format) = export_arg {
                config.output_format = format;
            }
            let keyword = resolve_keyword(keyword)?;

            match pipeline::run_pipeline(&keyword, &base_dir, &config) {
                PipelineOutcome::Success { summary, .. } => print_summary(&summary, json)?,
                PipelineOutcome::Empty(message) => println!("{}", message),
                PipelineOutcome::Failure(error) => {
                    eprintln!("{}", error.user_message());
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { set_threshold, set_policy, reset, show } => {
            if reset {
                config = Config::default();
                config.save()?;
                println!("✔ 設定を初期化しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ あいまい検索の最低スコアを {} に設定しました", threshold);
            }

            if let Some(policy) = set_policy {
                config.set_policy(policy)?;
                println!("✔ 有効類別の決め方を {} に設定しました", policy);
            }

            if show {
                println!("設定:");
                println!("  あいまい検索の最低スコア: {}", config.fuzzy_threshold);
                println!("  あいまい検索の候補数: {}", config.fuzzy_limit);
                println!("  大文字小文字を区別: {}", if config.case_sensitive { "する" } else { "しない" });
                println!("  有効類別: {}", config.valid_category_policy);
                println!("  出力形式: {}", config.output_format);
                println!("  データフォルダ: {}", config.data_dir(Path::new(".")).display());
            }
        }
    }

    Ok(())
}

/// キーワード未指定なら対話入力
fn resolve_keyword(keyword: Option<String>) -> Result<String> {
    if let Some(keyword) = keyword {
        return Ok(keyword);
    }

    let input: String = Input::new()
        .with_prompt("製品名またはキーワードを入力してください")
        .interact_text()
        .map_err(|e| MedPriceError::InvalidInput(e.to_string()))?;
    Ok(input.trim().to_string())
}

fn sibling_path(input: &Path, file_name: &str) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(file_name)
}

/// 参考製品ごとの大小類一覧
fn print_size_class_report(expanded: &expander::ExpandedProducts) {
    let mut current: Option<(&str, &str)> = None;
    for group in &expanded.groups {
        let key = (group.reference_product.as_str(), group.category_code.as_str());
        if current != Some(key) {
            println!("■ {} (功能類別: {})", group.reference_product, group.category_code);
            current = Some(key);
        }
        println!("  [{}]", group.size_class);
        for product in &group.products {
            println!("    - {} / {}", product.product_name, product.type_class);
        }
    }
    println!();
}

fn print_summary(summary: &ReconSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("\n✅ {}", summary.message());
        if summary.dropped_price_rows > 0 {
            println!("  (功能類別が一致せず除外: {}件)", summary.dropped_price_rows);
        }
    }
    Ok(())
}
