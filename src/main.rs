use clap::Parser;
use country_etl::utils::{logger, validation::Validate};
use country_etl::{CliConfig, CountryPipeline, EtlEngine, EtlError, LocalStorage};

fn report_failure(e: &EtlError) -> ! {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_format);
    tracing::info!("Starting country-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => report_failure(&e),
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        report_failure(&e);
    }

    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = match CountryPipeline::new(storage, settings) {
        Ok(pipeline) => pipeline,
        Err(e) => report_failure(&e),
    };
    let engine = EtlEngine::new(pipeline);

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => report_failure(&e),
    };

    tracing::info!(
        "✅ Wrote {} rows ({} placeholders, {} skipped) in {:?}",
        report.rows_written,
        report.placeholders,
        report.skipped,
        report.elapsed
    );
    println!("✅ ETL process completed successfully!");
    println!("📁 Output saved to: {}", report.output_path);

    // 部分國家抓取失敗時以可重試代碼結束
    if report.placeholders > 0 {
        eprintln!(
            "⚠️ {} countries could not be fetched and were written as empty rows",
            report.placeholders
        );
        std::process::exit(2);
    }

    Ok(())
}
