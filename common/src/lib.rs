//! Medprice Common Library
//!
//! 照合パイプラインで共有される型と文字列ユーティリティ
//! （CLIや出力形式には依存しない）

pub mod types;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod table;

pub use types::{columns, ClassificationRecord, MatchResult};
pub use error::{Error, Result};
pub use normalize::{normalize, Normalizer};
pub use similarity::{ratio, token_set_ratio};
pub use table::Table;
