use crate::core::extractor::extract_row;
use crate::core::fetcher::{fetch_all, HttpCountrySource};
use crate::core::writer::render_csv;
use crate::core::{ConfigProvider, CountrySource, Pipeline, Storage};
use crate::domain::model::{ExtractedRow, FetchErrorPolicy, FetchOutcome, TransformResult};
use crate::utils::error::Result;

pub struct CountryPipeline<S: Storage, C: ConfigProvider, F: CountrySource = HttpCountrySource> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: F,
}

impl<S: Storage, C: ConfigProvider> CountryPipeline<S, C, HttpCountrySource> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let source = HttpCountrySource::new(config.endpoint_template(), config.request_timeout())?;
        Ok(Self {
            storage,
            config,
            source,
        })
    }
}

impl<S: Storage, C: ConfigProvider, F: CountrySource> CountryPipeline<S, C, F> {
    pub fn with_source(storage: S, config: C, source: F) -> Self {
        Self {
            storage,
            config,
            source,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: CountrySource> Pipeline for CountryPipeline<S, C, F> {
    async fn extract(&self) -> Result<Vec<FetchOutcome>> {
        let codes = self.config.country_codes();
        tracing::debug!(
            "Fetching {} countries (concurrency: {}, timeout: {:?})",
            codes.len(),
            self.config.concurrent_requests(),
            self.config.request_timeout()
        );

        Ok(fetch_all(
            &self.source,
            codes,
            self.config.concurrent_requests(),
            self.config.request_timeout(),
        )
        .await)
    }

    async fn transform(&self, data: Vec<FetchOutcome>) -> Result<TransformResult> {
        let policy = self.config.currency_policy();
        let mut result = TransformResult::default();

        for outcome in &data {
            match extract_row(outcome, policy) {
                Some(ExtractedRow::Placeholder { code })
                    if self.config.fetch_error_policy() == FetchErrorPolicy::Skip =>
                {
                    result.skipped_codes.push(code);
                }
                Some(row) => result.rows.push(row),
                None => result.skipped_codes.push(outcome.code.clone()),
            }
        }

        Ok(result)
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let csv_data = render_csv(&result.rows)?;

        // 每次執行都覆寫輸出檔
        tracing::debug!("Writing CSV ({} bytes) to storage", csv_data.len());
        self.storage
            .write_file(self.config.output_file(), &csv_data)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CurrencyPolicy;
    use crate::utils::error::FetchError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("memory://{}", path))
        }
    }

    struct MockConfig {
        country_codes: Vec<String>,
        currency_policy: CurrencyPolicy,
        fetch_error_policy: FetchErrorPolicy,
    }

    impl MockConfig {
        fn new(codes: &[&str]) -> Self {
            Self {
                country_codes: codes.iter().map(|c| c.to_string()).collect(),
                currency_policy: CurrencyPolicy::FirstPresent,
                fetch_error_policy: FetchErrorPolicy::Placeholder,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn endpoint_template(&self) -> &str {
            "http://test.invalid/{code}"
        }

        fn country_codes(&self) -> &[String] {
            &self.country_codes
        }

        fn output_file(&self) -> &str {
            "countries.csv"
        }

        fn concurrent_requests(&self) -> usize {
            5
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn currency_policy(&self) -> &CurrencyPolicy {
            &self.currency_policy
        }

        fn fetch_error_policy(&self) -> FetchErrorPolicy {
            self.fetch_error_policy
        }
    }

    /// Canned responses keyed by country code; unknown codes fail with 404.
    struct StaticSource {
        responses: HashMap<String, serde_json::Value>,
    }

    #[async_trait]
    impl CountrySource for StaticSource {
        async fn fetch(&self, code: &str) -> std::result::Result<serde_json::Value, FetchError> {
            self.responses
                .get(code)
                .cloned()
                .ok_or(FetchError::Status(404))
        }
    }

    fn country(name: &str, capital: &str, currency_key: &str, currency: &str) -> serde_json::Value {
        json!([{
            "name": {"common": name},
            "capital": [capital],
            "currencies": {currency_key: {"name": currency}},
            "altSpellings": [currency_key]
        }])
    }

    fn source() -> StaticSource {
        let mut responses = HashMap::new();
        responses.insert(
            "USA".to_string(),
            country("United States", "Washington D.C.", "USD", "United States dollar"),
        );
        responses.insert(
            "CAN".to_string(),
            country("Canada", "Ottawa", "CAD", "Canadian dollar"),
        );
        responses.insert(
            "DEU".to_string(),
            json!([{
                "name": {"common": "Germany"},
                "capital": ["Berlin"],
                "currencies": {"EUR": {"name": "Euro"}},
                "altSpellings": ["DE", "Federal Republic of Germany"]
            }]),
        );
        responses.insert("ATA".to_string(), json!([]));
        StaticSource { responses }
    }

    #[tokio::test]
    async fn test_extract_returns_outcome_per_code() {
        let pipeline = CountryPipeline::with_source(
            MockStorage::new(),
            MockConfig::new(&["USA", "ZZZ", "DEU"]),
            source(),
        );

        let outcomes = pipeline.extract().await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(FetchError::Status(404))));
        assert_eq!(outcomes[2].code, "DEU");
    }

    #[tokio::test]
    async fn test_transform_keeps_fetch_order() {
        let pipeline = CountryPipeline::with_source(
            MockStorage::new(),
            MockConfig::new(&["DEU", "USA", "CAN"]),
            source(),
        );

        let outcomes = pipeline.extract().await.unwrap();
        let result = pipeline.transform(outcomes).await.unwrap();

        let names: Vec<String> = result
            .rows
            .iter()
            .filter_map(|row| match row {
                ExtractedRow::Country(r) => Some(r.name.clone()),
                ExtractedRow::Placeholder { .. } => None,
            })
            .collect();
        assert_eq!(names, vec!["Germany", "United States", "Canada"]);
        assert!(result.skipped_codes.is_empty());
    }

    #[tokio::test]
    async fn test_transform_skips_empty_response() {
        let pipeline = CountryPipeline::with_source(
            MockStorage::new(),
            MockConfig::new(&["USA", "ATA", "DEU"]),
            source(),
        );

        let outcomes = pipeline.extract().await.unwrap();
        let result = pipeline.transform(outcomes).await.unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.skipped_codes, vec!["ATA".to_string()]);
    }

    #[tokio::test]
    async fn test_transform_fetch_error_policies() {
        let pipeline = CountryPipeline::with_source(
            MockStorage::new(),
            MockConfig::new(&["USA", "ZZZ"]),
            source(),
        );
        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.placeholder_count(), 1);

        let mut config = MockConfig::new(&["USA", "ZZZ"]);
        config.fetch_error_policy = FetchErrorPolicy::Skip;
        let pipeline = CountryPipeline::with_source(MockStorage::new(), config, source());
        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.placeholder_count(), 0);
        assert_eq!(result.skipped_codes, vec!["ZZZ".to_string()]);
    }

    #[tokio::test]
    async fn test_load_writes_csv_to_storage() {
        let storage = MockStorage::new();
        let pipeline = CountryPipeline::with_source(
            storage.clone(),
            MockConfig::new(&["DEU", "ZZZ"]),
            source(),
        );

        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();
        let output_path = pipeline.load(&result).await.unwrap();

        assert_eq!(output_path, "memory://countries.csv");

        let csv_data = storage.get_file("countries.csv").await.unwrap();
        let text = String::from_utf8(csv_data).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "name,capital,currency,alt_spellings",
                r#"Germany,Berlin,Euro,"DE, Federal Republic of Germany""#,
                ",,,",
            ]
        );
    }
}
