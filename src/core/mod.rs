pub mod etl;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::{CountryRecord, FetchOutcome, TransformResult};
pub use crate::domain::ports::{ConfigProvider, CountrySource, Pipeline, Storage};
pub use crate::utils::error::Result;
