use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ingest::IngestConfig;

#[derive(Parser)]
#[command(name = "ingest")]
#[command(about = "Extract plain text from local documents and web pages into a JSON file")]
struct Args {
    /// Directory scanned for .pdf, .docx and .txt files
    #[arg(long, default_value = "documents")]
    documents_dir: PathBuf,

    /// One URL per line; blank lines and lines starting with '#' are ignored
    #[arg(long, default_value = "urls.txt")]
    urls_file: PathBuf,

    #[arg(long, default_value = "extracted_data.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ingest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = IngestConfig {
        documents_dir: args.documents_dir,
        urls_file: args.urls_file,
        output_file: args.output,
        ..IngestConfig::default()
    };

    let report = ingest::ingest(config).await?;

    match &report.output {
        Some(path) => println!(
            "\nIngestion complete. {} documents processed and saved to {:?}.",
            report.records.len(),
            path
        ),
        None if report.records.is_empty() => {
            println!("\nNo data was extracted. No output file created")
        }
        None => println!(
            "\nExtracted {} documents but could not write the output file.",
            report.records.len()
        ),
    }

    Ok(())
}
