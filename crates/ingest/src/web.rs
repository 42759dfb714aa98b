use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::error::ExtractionError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Elements whose text never counts as visible page content
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

#[derive(Clone)]
pub struct WebReader {
    client: reqwest::Client,
}

impl WebReader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page and return its visible body text. Non-2xx is an error.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ExtractionError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;

        Ok(visible_text(&html))
    }

    /// Same as [`fetch_text`](Self::fetch_text) but logs failures and returns
    /// an empty string instead.
    pub async fn extract_text(&self, url: &str) -> String {
        info!("processing URL: {}", url);

        match self.fetch_text(url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url = %url, error = %e, "error fetching URL");
                String::new()
            }
        }
    }
}

/// Text nodes under `<body>` outside script/style, each trimmed, joined by newlines.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let lines: Vec<&str> = root
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if hidden { None } else { Some(text.trim()) }
        })
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_strips_script_and_style() {
        let html = r#"
            <html>
              <head><title>Ignored title</title><style>body { color: red; }</style></head>
              <body>
                <h1>  Heading </h1>
                <script>var x = "hidden";</script>
                <p>First <b>bold</b> paragraph</p>
                <style>.a {}</style>
                <div>   </div>
              </body>
            </html>"#;

        assert_eq!(visible_text(html), "Heading\nFirst\nbold\nparagraph");
    }

    #[test]
    fn test_visible_text_of_empty_body() {
        assert_eq!(visible_text("<html><body></body></html>"), "");
    }

    #[test]
    fn test_visible_text_keeps_non_ascii() {
        assert_eq!(visible_text("<p>Ça marche — 日本語</p>"), "Ça marche — 日本語");
    }
}
