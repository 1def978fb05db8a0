use super::ValidCategoryPolicy;
use serde::Serialize;
use std::path::PathBuf;

/// 照合の集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    /// 出力行数
    pub total_rows: usize,
    /// 點數變更記錄 = 1 の行数
    pub flagged_rows: usize,
    /// 功能類別が一致せず除外した価量調査の行数
    pub dropped_price_rows: usize,
    /// 有効な核價類別の種類数
    pub valid_categories: usize,
    pub policy: ValidCategoryPolicy,
    /// 出力ファイル（書き出し後に設定）
    pub output_path: Option<PathBuf>,
    /// RFC 3339
    pub generated_at: String,
}

impl ReconSummary {
    pub fn new(
        total_rows: usize,
        flagged_rows: usize,
        dropped_price_rows: usize,
        valid_categories: usize,
        policy: ValidCategoryPolicy,
    ) -> Self {
        Self {
            total_rows,
            flagged_rows,
            dropped_price_rows,
            valid_categories,
            policy,
            output_path: None,
            generated_at: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// 状態表示用のメッセージ
    pub fn message(&self) -> String {
        let mut message = format!(
            "処理完了：全{}件、點數變更記錄=1：{}件",
            self.total_rows, self.flagged_rows
        );
        if let Some(path) = &self.output_path {
            message.push_str(&format!("\n出力先 → {}", path.display()));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_counts() {
        let summary = ReconSummary::new(12, 5, 3, 40, ValidCategoryPolicy::FormatOnly);
        assert_eq!(summary.message(), "処理完了：全12件、點數變更記錄=1：5件");
    }

    #[test]
    fn test_message_with_output_path() {
        let summary = ReconSummary::new(1, 0, 0, 1, ValidCategoryPolicy::FormatOnly)
            .with_output_path("/tmp/HistoryData.csv");
        assert!(summary.message().ends_with("出力先 → /tmp/HistoryData.csv"));
    }

    #[test]
    fn test_serialize_json() {
        let summary = ReconSummary::new(2, 1, 0, 3, ValidCategoryPolicy::IntersectExpanded);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_rows"], 2);
        assert_eq!(json["policy"], "intersect_expanded");
        assert!(json["output_path"].is_null());
        assert!(chrono::DateTime::parse_from_rfc3339(json["generated_at"].as_str().unwrap()).is_ok());
    }
}
