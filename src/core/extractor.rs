//! Turns one raw REST Countries response into a [`CountryRecord`].
//!
//! Every field of [`CountryResponse`] is optional; missing or null values fall back
//! to an empty string so the defaults live in one place.

use crate::domain::model::{CountryRecord, CurrencyPolicy, ExtractedRow, FetchOutcome};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryResponse {
    #[serde(default)]
    pub name: Option<CountryName>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    /// 保留原始鍵順序 (serde_json `preserve_order`)
    #[serde(default)]
    pub currencies: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, rename = "altSpellings")]
    pub alt_spellings: Option<Vec<String>>,
}

impl CountryResponse {
    pub fn currency_name(&self, policy: &CurrencyPolicy) -> String {
        let Some(currencies) = &self.currencies else {
            return String::new();
        };

        let entry = match policy {
            CurrencyPolicy::FirstPresent => currencies.values().next(),
            CurrencyPolicy::FixedKey(key) => currencies.get(key),
        };

        entry
            .and_then(|info| info.get("name"))
            .and_then(|name| name.as_str())
            .unwrap_or_default()
            .to_string()
    }

    pub fn into_record(self, policy: &CurrencyPolicy) -> CountryRecord {
        let currency = self.currency_name(policy);

        CountryRecord {
            name: self.name.and_then(|n| n.common).unwrap_or_default(),
            capital: self.capital.unwrap_or_default().join(", "),
            currency,
            alt_spellings: self.alt_spellings.unwrap_or_default().join(", "),
        }
    }
}

/// 回傳 `None` 表示結構不符，該筆資料會被略過
pub fn extract_record(value: &serde_json::Value, policy: &CurrencyPolicy) -> Option<CountryRecord> {
    let first = value.as_array()?.first()?;
    if !first.is_object() {
        return None;
    }

    match CountryResponse::deserialize(first) {
        Ok(response) => Some(response.into_record(policy)),
        Err(e) => {
            tracing::debug!("Country object did not match the expected shape: {}", e);
            None
        }
    }
}

/// Maps a fetch outcome to a row. `None` means the code is skipped.
pub fn extract_row(outcome: &FetchOutcome, policy: &CurrencyPolicy) -> Option<ExtractedRow> {
    match &outcome.result {
        Ok(value) => match extract_record(value, policy) {
            Some(record) => {
                tracing::debug!(code = %outcome.code, ?record, "Extracted country record");
                Some(ExtractedRow::Country(record))
            }
            None => {
                tracing::warn!(
                    "⚠️ Unexpected data structure for country {}: {}",
                    outcome.code,
                    value
                );
                None
            }
        },
        Err(e) => {
            tracing::warn!("⚠️ Fetch failed for country {}: {}", outcome.code, e);
            Some(ExtractedRow::Placeholder {
                code: outcome.code.clone(),
            })
        }
    }
}
