pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, Settings};

pub use core::{etl::EtlEngine, fetcher::HttpCountrySource, pipeline::CountryPipeline};
pub use domain::model::{CountryRecord, CurrencyPolicy, FetchErrorPolicy, RunReport};
pub use utils::error::{EtlError, FetchError, Result};
