//! Website fetch tool.
//!
//! Downloads a page and returns its visible text: scripts and styles are
//! dropped and blank lines collapsed.

use async_trait::async_trait;
use rmcp::model::Content;
use schemars::JsonSchema;
use scraper::{Html, Node};
use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Elements whose text is never part of the page content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Parameters for the fetch tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// URL of the website to fetch content from
    pub url: String,
}

/// Fetches a website and returns its text content.
pub struct FetchTool;

#[async_trait]
impl ToolDefinition for FetchTool {
    type Params = FetchParams;

    const NAME: &'static str = "Fetch";
    const DESCRIPTION: &'static str = "Retrieve website content and return it";

    #[instrument(skip_all, fields(url = %params.url))]
    async fn execute(&self, params: FetchParams, ctx: &ToolContext) -> Result<Vec<Content>, ToolError> {
        let url = validate_url(&params.url)?;
        info!("Fetching {}", url);

        let body = ctx
            .http()
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(vec![Content::text(html_to_text(&body))])
    }
}

/// Check that `raw` is an absolute URL with a host.
pub fn validate_url(raw: &str) -> Result<Url, ToolError> {
    let url = Url::parse(raw)
        .map_err(|e| ToolError::invalid_arguments(format!("Invalid URL: {} ({})", raw, e)))?;
    if url.host_str().is_none() {
        return Err(ToolError::invalid_arguments(format!("Invalid URL: {}", raw)));
    }
    Ok(url)
}

/// Extract the visible text of an HTML document, one non-empty line each.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => SKIPPED_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            text.push_str(fragment);
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::test_context;
    use rmcp::model::RawContent;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html>
<head><title>Example</title><style>body { color: red; }</style></head>
<body>
  <h1>Hello</h1>

  <script>var hidden = true;</script>
  <p>  World  </p>
</body>
</html>"#;

    fn text_of(content: &[Content]) -> &str {
        match &content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_html_to_text_strips_scripts_and_blank_lines() {
        assert_eq!(html_to_text(PAGE), "Example\nHello\nWorld");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/path").is_ok());
        assert!(matches!(
            validate_url("example.com"),
            Err(ToolError::InvalidArguments(_))
        ));
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let params = FetchParams {
            url: format!("{}/page", server.uri()),
        };
        let content = FetchTool.execute(params, &test_context()).await.unwrap();
        assert_eq!(text_of(&content), "Example\nHello\nWorld");
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let params = FetchParams {
            url: format!("{}/missing", server.uri()),
        };
        let err = FetchTool.execute(params, &test_context()).await.unwrap_err();
        match err {
            ToolError::Upstream(msg) => assert_eq!(msg, "HTTP error: 404 Not Found"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
