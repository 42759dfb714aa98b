use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ingest::{ExtractedRecord, IngestConfig, Ingestor, WebReader};

fn config_in(root: &Path) -> IngestConfig {
    IngestConfig {
        documents_dir: root.join("documents"),
        urls_file: root.join("urls.txt"),
        output_file: root.join("extracted_data.json"),
        request_timeout: Duration::from_secs(2),
        ..IngestConfig::default()
    }
}

fn read_output(path: &Path) -> Vec<ExtractedRecord> {
    let raw = std::fs::read_to_string(path).expect("output file should exist");
    serde_json::from_str(&raw).expect("output should be a JSON array of records")
}

#[tokio::test]
async fn test_only_successful_extractions_are_written() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());

    std::fs::create_dir(&config.documents_dir).unwrap();
    std::fs::write(config.documents_dir.join("a.txt"), "hello").unwrap();
    std::fs::write(config.documents_dir.join("b.pdf"), b"%PDF-garbage\x00\x01").unwrap();
    std::fs::write(config.documents_dir.join("notes.md"), "ignored format").unwrap();
    std::fs::write(
        &config.urls_file,
        "\n# a comment line\nhttp://127.0.0.1:1/unreachable\n",
    )
    .unwrap();

    let report = Ingestor::new(config.clone()).unwrap().run().await;

    let expected = vec![ExtractedRecord::new("a.txt", "hello")];
    assert_eq!(report.records, expected);
    assert_eq!(report.output.as_deref(), Some(config.output_file.as_path()));
    assert_eq!(read_output(&config.output_file), expected);
}

#[tokio::test]
async fn test_no_output_file_when_nothing_extracted() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());

    std::fs::create_dir(&config.documents_dir).unwrap();
    std::fs::write(config.documents_dir.join("empty.txt"), "").unwrap();
    std::fs::write(&config.urls_file, "# nothing to fetch\n\n").unwrap();

    let report = Ingestor::new(config.clone()).unwrap().run().await;

    assert!(report.records.is_empty());
    assert!(report.output.is_none());
    assert!(!config.output_file.exists());
}

#[tokio::test]
async fn test_missing_inputs_are_skipped() {
    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());

    let report = Ingestor::new(config.clone()).unwrap().run().await;

    assert!(report.records.is_empty());
    assert!(!config.output_file.exists());
}

#[tokio::test]
async fn test_documents_come_before_urls_in_name_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>from the web</p></body></html>"),
        )
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let config = config_in(root.path());
    std::fs::create_dir(&config.documents_dir).unwrap();
    std::fs::write(config.documents_dir.join("z.txt"), "last file").unwrap();
    std::fs::write(config.documents_dir.join("m.txt"), "middle file").unwrap();
    std::fs::create_dir(config.documents_dir.join("nested.txt")).unwrap();
    std::fs::write(&config.urls_file, format!("{}/page\n", server.uri())).unwrap();

    let report = Ingestor::new(config).unwrap().run().await;

    let sources: Vec<&str> = report.records.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(
        sources,
        vec!["m.txt", "z.txt", format!("{}/page", server.uri()).as_str()]
    );
    assert_eq!(report.records[2].content, "from the web");
}

#[tokio::test]
async fn test_web_reader_sends_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", ingest::web::DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><script>track()</script><h1>Title</h1><p>Body text</p></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let reader = WebReader::new(ingest::web::DEFAULT_USER_AGENT, Duration::from_secs(2)).unwrap();
    let text = reader.extract_text(&format!("{}/article", server.uri())).await;

    assert_eq!(text, "Title\nBody text");
}

#[tokio::test]
async fn test_web_reader_non_success_status_yields_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<body>not found</body>"))
        .mount(&server)
        .await;

    let reader = WebReader::new("test-agent", Duration::from_secs(2)).unwrap();
    let url = format!("{}/gone", server.uri());

    assert!(reader.fetch_text(&url).await.is_err());
    assert_eq!(reader.extract_text(&url).await, "");
}
