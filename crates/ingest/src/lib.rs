pub mod error;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod web;

pub use error::ExtractionError;
pub use pipeline::{IngestConfig, IngestReport, Ingestor, parse_url_list, write_records};
pub use reader::{DocumentFormat, FileReader};
pub use record::ExtractedRecord;
pub use web::WebReader;

use anyhow::Result;

/// Main ingestion pipeline
pub async fn ingest(config: IngestConfig) -> Result<IngestReport> {
    let ingestor = Ingestor::new(config)?;
    Ok(ingestor.run().await)
}
