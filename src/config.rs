use crate::cli::ExportFormat;
use crate::error::{MedPriceError, Result};
use crate::index::SearchOptions;
use crate::reconciler::ValidCategoryPolicy;
use medprice_common::Normalizer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "MEDPRICE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// あいまい検索で採用する最低スコア（0〜100）
    pub fuzzy_threshold: u8,
    /// あいまい検索で評価する上位候補数
    pub fuzzy_limit: usize,
    /// 核價類別の比較で大文字小文字を区別する
    pub case_sensitive: bool,
    /// 完全一致検索で英字の大文字小文字を無視する
    pub exact_case_insensitive: bool,
    /// 有効な核價類別の決め方
    pub valid_category_policy: ValidCategoryPolicy,
    /// 照合結果の出力形式
    pub output_format: ExportFormat,
    /// 基準ディレクトリ直下のデータフォルダ名
    pub data_dir_name: String,
    pub index_file: String,
    pub format_file: String,
    pub price_file: String,
    pub expanded_file: String,
    pub output_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 40,
            fuzzy_limit: 30,
            case_sensitive: false,
            exact_case_insensitive: false,
            valid_category_policy: ValidCategoryPolicy::FormatOnly,
            output_format: ExportFormat::Csv,
            data_dir_name: "data".into(),
            index_file: "IndexCode.csv".into(),
            format_file: "format_clean.csv".into(),
            price_file: "價量調查品項108-112_FINAL.csv".into(),
            expanded_file: "IndexSQL_find.csv".into(),
            output_file: "HistoryData.csv".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MedPriceError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("medprice").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.fuzzy_threshold > 100 {
            return Err(MedPriceError::Config(format!(
                "fuzzy_threshold は0〜100で指定してください: {}",
                self.fuzzy_threshold
            )));
        }
        if self.fuzzy_limit == 0 {
            return Err(MedPriceError::Config("fuzzy_limit は1以上で指定してください".into()));
        }
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: u8) -> Result<()> {
        self.fuzzy_threshold = threshold;
        self.save()
    }

    pub fn set_policy(&mut self, policy: ValidCategoryPolicy) -> Result<()> {
        self.valid_category_policy = policy;
        self.save()
    }

    /// データディレクトリ（環境変数を優先）
    pub fn data_dir(&self, base_dir: &Path) -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }
        base_dir.join(&self.data_dir_name)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            fuzzy_threshold: self.fuzzy_threshold,
            fuzzy_limit: self.fuzzy_limit,
            exact_case_insensitive: self.exact_case_insensitive,
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.case_sensitive)
    }
}
