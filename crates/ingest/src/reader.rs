use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::error::ExtractionError;

/// Local document formats we know how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Exact, case-sensitive match on the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("pdf") => Some(Self::Pdf),
            Some("docx") => Some(Self::Docx),
            Some("txt") => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
        }
    }
}

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path, format: DocumentFormat) -> Result<String, ExtractionError> {
        match format {
            DocumentFormat::Txt => Ok(fs::read_to_string(path).await?),
            DocumentFormat::Pdf => Self::read_pdf(path).await,
            DocumentFormat::Docx => Self::read_docx(path).await,
        }
    }

    /// Never fails: errors are logged and turned into an empty string so the
    /// caller can treat "no text" as "skip this source".
    pub async fn extract_text(path: &Path, format: DocumentFormat) -> String {
        let name = display_name(path);
        info!("processing {}: {}", format.label(), name);

        match Self::read_file(path, format).await {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %name, error = %e, "error reading {}", format.label());
                String::new()
            }
        }
    }

    async fn read_pdf(path: &Path) -> Result<String, ExtractionError> {
        let bytes = fs::read(path).await?;

        // pdf-extract can panic on malformed input; a JoinError keeps that contained
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await?
        .map_err(ExtractionError::Pdf)?;

        Ok(text.trim().to_string())
    }

    async fn read_docx(path: &Path) -> Result<String, ExtractionError> {
        let bytes = fs::read(path).await?;
        let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .filter(|text| !text.is_empty())
            .collect();

        Ok(paragraphs.join("\n"))
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut content = String::new();
    for child in &paragraph.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, &mut content),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = inner {
                        push_run_text(run, &mut content);
                    }
                }
            }
            _ => {}
        }
    }
    content
}

fn push_run_text(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => out.push_str(&text.text),
            docx_rs::RunChild::Tab(_) => out.push('\t'),
            _ => {}
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
