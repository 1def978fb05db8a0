use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedPriceError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ファイルを開けません: {path} ({source})")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} に必要な列がありません: {columns:?}")]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("入力エラー: {0}")]
    InvalidInput(String),

    #[error("CSV解析エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] medprice_common::Error),
}

/// 呼び出し側に見せるエラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力ファイルが存在しない・読めない
    FileAccess,
    /// 必須列の欠落
    Schema,
    /// その他
    Unexpected,
}

impl MedPriceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MedPriceError::FileNotFound(_) | MedPriceError::FileAccess { .. } => ErrorKind::FileAccess,
            MedPriceError::Io(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
                ) =>
            {
                ErrorKind::FileAccess
            }
            MedPriceError::MissingColumns { .. } => ErrorKind::Schema,
            _ => ErrorKind::Unexpected,
        }
    }

    /// 状態表示用のメッセージ（分類ごとの接頭辞付き）
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::FileAccess => format!("ファイルアクセスエラー：{}", self),
            ErrorKind::Schema => format!("データ列エラー：{}", self),
            ErrorKind::Unexpected => format!("予期しないエラー：{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MedPriceError>;
