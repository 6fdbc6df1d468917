use crate::core::Pipeline;
use crate::domain::model::RunReport;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        tracing::info!("🚀 Starting country ETL process");

        // Extract
        let outcomes = self.pipeline.extract().await?;
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(
            "📡 Fetched {} countries ({} failed)",
            outcomes.len(),
            failed
        );

        // Transform
        let result = self.pipeline.transform(outcomes).await?;
        tracing::info!(
            "🔄 Extracted {} rows, skipped {}",
            result.rows.len(),
            result.skipped_codes.len()
        );
        if !result.skipped_codes.is_empty() {
            tracing::warn!("Skipped country codes: {}", result.skipped_codes.join(", "));
        }

        // Load
        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            rows_written: result.rows.len(),
            placeholders: result.placeholder_count(),
            skipped: result.skipped_codes.len(),
            elapsed: start.elapsed(),
        })
    }
}
