use crate::domain::model::FetchOutcome;
use crate::domain::ports::CountrySource;
use crate::utils::error::{EtlError, FetchError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://restcountries.com/v3.1/alpha/{code}";

#[derive(Debug, Clone)]
pub struct HttpCountrySource {
    client: Client,
    endpoint_template: String,
}

impl HttpCountrySource {
    /// 建立共用的 HTTP client，逾時同時套用在連線與讀取
    pub fn new(
        endpoint_template: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EtlError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint_template))
    }

    pub fn with_client(client: Client, endpoint_template: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_template: endpoint_template.into(),
        }
    }

    pub fn endpoint_for(&self, code: &str) -> String {
        self.endpoint_template.replace("{code}", code)
    }
}

#[async_trait]
impl CountrySource for HttpCountrySource {
    async fn fetch(&self, code: &str) -> Result<serde_json::Value, FetchError> {
        let endpoint = self.endpoint_for(code);
        tracing::debug!("📡 Making API request to: {}", endpoint);

        let response = self.client.get(&endpoint).send().await?;
        tracing::debug!("📡 {}: API response status: {}", code, response.status());

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// 併發抓取所有代碼，結果順序與輸入一致
///
/// At most `concurrency` requests are in flight. Each request is bounded by
/// `timeout`; a failure only affects its own outcome.
pub async fn fetch_all<F: CountrySource + ?Sized>(
    source: &F,
    codes: &[String],
    concurrency: usize,
    timeout: Duration,
) -> Vec<FetchOutcome> {
    stream::iter(codes.iter().cloned())
        .map(|code: String| async move {
            let result = match tokio::time::timeout(timeout, source.fetch(&code)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout),
            };
            FetchOutcome { code, result }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
