pub mod cli;
pub mod toml_config;

use crate::core::fetcher::DEFAULT_ENDPOINT_TEMPLATE;
use crate::core::ConfigProvider;
use crate::domain::model::{CurrencyPolicy, FetchErrorPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_country_codes, validate_endpoint_template, validate_non_empty, validate_path,
    validate_range, Validate,
};
use std::time::Duration;
use toml_config::FileConfig;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;

/// 固定的國家代碼清單
pub const DEFAULT_COUNTRY_CODES: [&str; 3] = ["USA", "CAN", "DEU"];

pub const DEFAULT_OUTPUT_FILE: &str = "countries.csv";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "country-etl")]
#[command(about = "Fetch country metadata from REST Countries and write it to CSV")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the CSV file is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Name of the CSV file
    #[arg(long)]
    pub output_file: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of requests in flight
    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// Always read this currency code instead of the first listed currency
    #[arg(long)]
    pub currency_key: Option<String>,

    /// What to write for a country whose request failed
    #[arg(long, value_enum)]
    pub on_fetch_error: Option<FetchErrorPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併順序: 命令列 > 設定檔 > 預設值
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            settings.apply_file(FileConfig::from_file(path)?);
        }

        if let Some(output_path) = &self.output_path {
            settings.output_path = output_path.clone();
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = output_file.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_seconds = timeout;
        }
        if let Some(concurrency) = self.concurrent_requests {
            settings.concurrent_requests = concurrency;
        }
        if let Some(key) = &self.currency_key {
            settings.currency_policy = CurrencyPolicy::FixedKey(key.clone());
        }
        if let Some(policy) = self.on_fetch_error {
            settings.fetch_error_policy = policy;
        }

        Ok(settings)
    }
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint_template: String,
    pub country_codes: Vec<String>,
    pub output_path: String,
    pub output_file: String,
    pub concurrent_requests: usize,
    pub timeout_seconds: u64,
    pub currency_policy: CurrencyPolicy,
    pub fetch_error_policy: FetchErrorPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            country_codes: DEFAULT_COUNTRY_CODES.iter().map(|c| c.to_string()).collect(),
            output_path: ".".to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            currency_policy: CurrencyPolicy::FirstPresent,
            fetch_error_policy: FetchErrorPolicy::Placeholder,
        }
    }
}

impl Settings {
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(template) = file.source.endpoint_template {
            self.endpoint_template = template;
        }
        if let Some(timeout) = file.source.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(concurrency) = file.source.concurrent_requests {
            self.concurrent_requests = concurrency;
        }
        if let Some(key) = file.extract.currency_key {
            self.currency_policy = CurrencyPolicy::FixedKey(key);
        }
        if let Some(output_path) = file.load.output_path {
            self.output_path = output_path;
        }
        if let Some(output_file) = file.load.output_file {
            self.output_file = output_file;
        }
        if let Some(policy) = file.load.on_fetch_error {
            self.fetch_error_policy = policy;
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_endpoint_template("endpoint_template", &self.endpoint_template)?;
        validate_country_codes("country_codes", &self.country_codes)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file)?;
        validate_range("concurrent_requests", self.concurrent_requests, 1, usize::MAX)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        if let CurrencyPolicy::FixedKey(key) = &self.currency_policy {
            validate_non_empty("currency_key", key)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn endpoint_template(&self) -> &str {
        &self.endpoint_template
    }

    fn country_codes(&self) -> &[String] {
        &self.country_codes
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn currency_policy(&self) -> &CurrencyPolicy {
        &self.currency_policy
    }

    fn fetch_error_policy(&self) -> FetchErrorPolicy {
        self.fetch_error_policy
    }
}
