//! 分類マスタと照合結果の型定義
//!
//! 列名はすべて入力CSV（特材功能分類・核價類別・價量調查）の表記に合わせる。

/// 入出力で使用する列名
pub mod columns {
    /// 功能類別コード（5桁）
    pub const CATEGORY_CODE: &str = "功能類別(前5碼)";
    /// 製品名称
    pub const PRODUCT_NAME: &str = "名稱";
    /// 大小類
    pub const SIZE_CLASS: &str = "大小類";
    /// 類別
    pub const TYPE_CLASS: &str = "類別";

    /// 検索キーワード（展開品項表に付与）
    pub const SEARCH_KEYWORD: &str = "搜尋關鍵字";
    /// 参考製品（展開品項表に付与）
    pub const REFERENCE_PRODUCT: &str = "參考產品";

    /// 核價類別（核價類別清單）
    pub const FORMAT_CATEGORY: &str = "核價類別";

    /// 特材代碼前五碼（價量調查）
    pub const CODE_PREFIX: &str = "特材代碼前五碼";
    /// 核價類別名稱（價量調查）
    pub const CATEGORY_NAME: &str = "核價類別名稱";

    /// 点数変更記録フラグ
    pub const CHANGE_FLAG: &str = "點數變更記錄";

    /// 分類マスタの列順
    pub const CLASSIFICATION_COLUMNS: [&str; 4] =
        [CATEGORY_CODE, PRODUCT_NAME, SIZE_CLASS, TYPE_CLASS];

    /// 展開品項表の列順
    pub const EXPANDED_COLUMNS: [&str; 6] = [
        CATEGORY_CODE,
        PRODUCT_NAME,
        SIZE_CLASS,
        TYPE_CLASS,
        SEARCH_KEYWORD,
        REFERENCE_PRODUCT,
    ];

    /// 照合結果の出力列順（存在しない列は出力時に省略）
    pub const OUTPUT_COLUMNS: [&str; 13] = [
        "年份",
        "特材代碼",
        CODE_PREFIX,
        CATEGORY_NAME,
        "中英文品名",
        "產品型號/規格",
        "單位",
        "支付點數",
        "申請者簡稱",
        "許可證字號",
        "中文品名",
        "英文品名",
        CHANGE_FLAG,
    ];
}

/// 分類マスタの1行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRecord {
    /// 功能類別(前5碼)
    pub category_code: String,
    /// 名稱
    pub product_name: String,
    /// 大小類
    pub size_class: String,
    /// 類別
    pub type_class: String,
}

impl ClassificationRecord {
    /// 分類マスタの列順で値を返す
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.category_code.clone(),
            self.product_name.clone(),
            self.size_class.clone(),
            self.type_class.clone(),
        ]
    }
}

/// 検索で一致した参考製品
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched_name: String,
    pub category_code: String,
}

impl MatchResult {
    pub fn new(matched_name: impl Into<String>, category_code: impl Into<String>) -> Self {
        Self {
            matched_name: matched_name.into(),
            category_code: category_code.into(),
        }
    }
}
