use crate::domain::model::{CurrencyPolicy, FetchErrorPolicy, FetchOutcome, TransformResult};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// 寫入檔案並回傳實際寫入位置
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint_template(&self) -> &str;
    fn country_codes(&self) -> &[String];
    fn output_file(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn currency_policy(&self) -> &CurrencyPolicy;
    fn fetch_error_policy(&self) -> FetchErrorPolicy;
}

/// 單一國家資料來源，HTTP 實作或測試用替身
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch(&self, code: &str) -> std::result::Result<serde_json::Value, FetchError>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<FetchOutcome>>;
    async fn transform(&self, data: Vec<FetchOutcome>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
