use crate::utils::error::FetchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CSV 欄位順序固定
pub const CSV_HEADER: [&str; 4] = ["name", "capital", "currency", "alt_spellings"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub capital: String,
    pub currency: String,
    pub alt_spellings: String,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub code: String,
    pub result: std::result::Result<serde_json::Value, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedRow {
    Country(CountryRecord),
    /// 抓取失敗的代碼，寫出時四個欄位皆為空
    Placeholder { code: String },
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub rows: Vec<ExtractedRow>,
    pub skipped_codes: Vec<String>,
}

impl TransformResult {
    pub fn placeholder_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, ExtractedRow::Placeholder { .. }))
            .count()
    }
}

/// How the currency column is chosen from the `currencies` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CurrencyPolicy {
    /// First entry in document order.
    #[default]
    FirstPresent,
    /// Exact currency code, empty when the country does not list it.
    FixedKey(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    #[default]
    Placeholder,
    Skip,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub rows_written: usize,
    pub placeholders: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}
