//! Web search tool backed by DuckDuckGo's HTML results page.
//!
//! Scraping is best-effort and sits behind [`SearchBackend`], so the tool's
//! contract (query in, ranked hits out) survives a change of strategy.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use super::{parse_input, Param, ParamKind, Tool};
use crate::constants::{SEARCH_MAX_RESULTS, SEARCH_TIMEOUT_SECS, SEARCH_URL, SEARCH_USER_AGENT};

const PARAMS: &[Param] = &[Param::required("query", ParamKind::String)];

#[derive(Deserialize)]
struct WebSearchInput {
    query: String,
}

/// Result link followed by its snippet, across newlines.
static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]*)"[^>]*>(.+?)</a>.*?<a[^>]*class="result__snippet"[^>]*>(.+?)</a>"#,
    )
    .expect("result pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// One search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Turns a query into ranked hits.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Scrapes `html.duckduckgo.com`.
pub struct DuckDuckGoHtml {
    http: Client,
    timeout: Duration,
}

impl DuckDuckGoHtml {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            timeout: Duration::from_secs(SEARCH_TIMEOUT_SECS),
        }
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoHtml {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        debug!(query, "search: called");
        let html = self
            .http
            .get(SEARCH_URL)
            .query(&[("q", query)])
            .header(USER_AGENT, SEARCH_USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_results(&html, SEARCH_MAX_RESULTS))
    }
}

/// Pulls up to `limit` hits out of a DuckDuckGo HTML results page.
pub fn extract_results(html: &str, limit: usize) -> Vec<SearchHit> {
    RESULT_RE
        .captures_iter(html)
        .take(limit)
        .map(|caps| SearchHit {
            url: resolve_redirect(&caps[1]),
            title: clean_text(&caps[2]),
            snippet: clean_text(&caps[3]),
        })
        .collect()
}

/// Strips markup and decodes the common entities.
fn clean_text(fragment: &str) -> String {
    decode_entities(TAG_RE.replace_all(fragment, "").trim())
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>&...` links to their target.
fn resolve_redirect(href: &str) -> String {
    let href = decode_entities(href);
    if !href.contains("uddg=") {
        return href;
    }
    Url::parse("https://duckduckgo.com/")
        .and_then(|base| base.join(&href))
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(href)
}

/// Renders hits as `**title**`, URL and snippet blocks.
fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("**{}**\n{}\n{}\n", hit.title, hit.url, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct WebSearchTool {
    backend: Box<dyn SearchBackend>,
}

impl WebSearchTool {
    pub fn new(backend: Box<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn duckduckgo() -> Self {
        Self::new(Box::new(DuckDuckGoHtml::new()))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web using DuckDuckGo, returns top results with titles, URLs and snippets"
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    async fn execute(&self, args: &Map<String, Value>) -> Result<String> {
        let input: WebSearchInput = parse_input(args)?;
        // Transport failures are reported to the model, not raised.
        let hits = match self.backend.search(&input.query).await {
            Ok(hits) => hits,
            Err(e) => return Ok(format!("search error: {:#}", e)),
        };
        if hits.is_empty() {
            Ok("no results found".to_string())
        } else {
            Ok(format_hits(&hits))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_html(n: usize) -> String {
        format!(
            r#"<div class="result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage{n}%3Fa%3D1&amp;rut=abc">Result <b>{n}</b> &amp; more</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Snippet <b>number</b> {n}</a>
</div>
"#
        )
    }

    struct FixedBackend(Vec<SearchHit>);

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            Ok(self.0.clone())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl SearchBackend for FailingBackend {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            anyhow::bail!("operation timed out")
        }
    }

    fn args(query: &str) -> Map<String, Value> {
        json!({ "query": query }).as_object().unwrap().clone()
    }

    #[test]
    fn test_extract_cleans_and_resolves() {
        let hits = extract_results(&result_html(1), 5);
        assert_eq!(
            hits,
            vec![SearchHit {
                title: "Result 1 & more".into(),
                url: "https://example.com/page1?a=1".into(),
                snippet: "Snippet number 1".into(),
            }]
        );
    }

    #[test]
    fn test_extract_caps_at_limit() {
        let html: String = (1..=7).map(result_html).collect();
        let hits = extract_results(&html, 5);
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].title, "Result 1 & more");
        assert_eq!(hits[4].title, "Result 5 & more");
    }

    #[test]
    fn test_extract_nothing_from_unrelated_markup() {
        assert!(extract_results("<html><body>No results.</body></html>", 5).is_empty());
    }

    #[test]
    fn test_plain_urls_pass_through() {
        assert_eq!(resolve_redirect("https://example.com/a?b=1&amp;c=2"), "https://example.com/a?b=1&c=2");
    }

    #[tokio::test]
    async fn test_formats_hits() {
        let tool = WebSearchTool::new(Box::new(FixedBackend(vec![
            SearchHit {
                title: "Rust".into(),
                url: "https://rust-lang.org".into(),
                snippet: "A language".into(),
            },
            SearchHit {
                title: "Cargo".into(),
                url: "https://doc.rust-lang.org/cargo".into(),
                snippet: "The package manager".into(),
            },
        ])));
        let output = tool.execute(&args("rust")).await.unwrap();
        assert_eq!(
            output,
            "**Rust**\nhttps://rust-lang.org\nA language\n\n**Cargo**\nhttps://doc.rust-lang.org/cargo\nThe package manager\n"
        );
    }

    #[tokio::test]
    async fn test_no_results() {
        let tool = WebSearchTool::new(Box::new(FixedBackend(Vec::new())));
        assert_eq!(tool.execute(&args("zzz")).await.unwrap(), "no results found");
    }

    #[tokio::test]
    async fn test_transport_failure_is_a_result() {
        let tool = WebSearchTool::new(Box::new(FailingBackend));
        assert_eq!(
            tool.execute(&args("rust")).await.unwrap(),
            "search error: operation timed out"
        );
    }
}
