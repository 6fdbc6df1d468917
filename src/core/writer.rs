use crate::domain::model::{CountryRecord, ExtractedRow, CSV_HEADER};
use crate::utils::error::{EtlError, Result};

/// 產生完整 CSV 內容 (含標題列)，換行為 CRLF
pub fn render_csv(rows: &[ExtractedRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    let placeholder = CountryRecord::default();
    for row in rows {
        let record = match row {
            ExtractedRow::Country(record) => record,
            ExtractedRow::Placeholder { .. } => &placeholder,
        };
        writer.serialize(record)?;
    }

    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV writer: {}", e),
    })
}
