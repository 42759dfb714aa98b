use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::reader::{DocumentFormat, FileReader, display_name};
use crate::record::ExtractedRecord;
use crate::web::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, WebReader};

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub documents_dir: PathBuf,
    pub urls_file: PathBuf,
    pub output_file: PathBuf,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("documents"),
            urls_file: PathBuf::from("urls.txt"),
            output_file: PathBuf::from("extracted_data.json"),
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct IngestReport {
    pub records: Vec<ExtractedRecord>,
    /// Where the records were written; `None` when nothing was extracted or the write failed
    pub output: Option<PathBuf>,
}

/// Lines that are neither blank nor `#` comments, trimmed.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Write records as indented UTF-8 JSON, non-ASCII kept literal.
pub async fn write_records(path: &Path, records: &[ExtractedRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    tokio::fs::write(path, json)
        .await
        .context(format!("Failed to write output file: {:?}", path))?;
    Ok(())
}

pub struct Ingestor {
    config: IngestConfig,
    web: WebReader,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let web = WebReader::new(&config.user_agent, config.request_timeout)
            .context("Failed to build HTTP client")?;
        Ok(Self { config, web })
    }

    /// Direct children of the documents directory, in file-name order.
    pub async fn collect_documents(&self) -> Vec<ExtractedRecord> {
        let dir = &self.config.documents_dir;
        if !dir.is_dir() {
            info!(
                "Documents directory {:?} not found. Skipping local file processing.",
                dir
            );
            return Vec::new();
        }

        let mut records = Vec::new();
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(format) = DocumentFormat::from_path(path) else {
                continue;
            };

            let content = FileReader::extract_text(path, format).await;
            if let Some(record) = ExtractedRecord::non_empty(display_name(path), content) {
                records.push(record);
            }
        }

        records
    }

    pub async fn collect_urls(&self) -> Vec<ExtractedRecord> {
        let urls_file = &self.config.urls_file;
        if !urls_file.is_file() {
            info!("URL file {:?} not found. Skipping web processing.", urls_file);
            return Vec::new();
        }

        let contents = match tokio::fs::read_to_string(urls_file).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!(file = ?urls_file, error = %e, "Failed to read URL file");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for url in parse_url_list(&contents) {
            let content = self.web.extract_text(&url).await;
            if let Some(record) = ExtractedRecord::non_empty(url, content) {
                records.push(record);
            }
        }

        records
    }

    /// Documents first, then URLs. Output is written only when something was
    /// extracted; a failed write is logged, not returned.
    pub async fn run(&self) -> IngestReport {
        let mut records = self.collect_documents().await;
        records.extend(self.collect_urls().await);

        if records.is_empty() {
            return IngestReport {
                records,
                output: None,
            };
        }

        let output_file = &self.config.output_file;
        let output = match write_records(output_file, &records).await {
            Ok(()) => {
                info!(records = records.len(), path = ?output_file, "Wrote extracted records");
                Some(output_file.clone())
            }
            Err(e) => {
                error!(error = ?e, "Could not write to output file {:?}", output_file);
                None
            }
        };

        IngestReport { records, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_url_list_skips_blank_and_comments() {
        let contents = "\
https://example.com/a

   # a comment
#another
  https://example.com/b  \n\t\n";

        assert_eq!(
            parse_url_list(contents),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_records_roundtrip_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let records = vec![
            ExtractedRecord::new("résumé.txt", "naïve café — 東京"),
            ExtractedRecord::new("https://example.com", "line one\nline two"),
        ];

        write_records(&path, &records).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("naïve café — 東京"), "non-ASCII must not be escaped");
        assert!(raw.contains("\n  {"), "output should be indented");

        let parsed: Vec<ExtractedRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, records);
    }

    #[tokio::test]
    async fn test_write_records_to_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        assert!(
            write_records(&path, &[ExtractedRecord::new("a", "b")])
                .await
                .is_err()
        );
    }
}
