pub mod types;

use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::{AppConfig, Rating};
use crate::media::ResultItem;
use types::{ErrorBody, Gif, SearchResponse};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("deserialization error: {0}")]
    Deserialize(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The search URL carries the API key, so it is stripped from transport
/// errors before they reach the screen or the logs.
impl From<reqwest::Error> for ApiClientError {
    fn from(e: reqwest::Error) -> Self {
        ApiClientError::Http(e.without_url())
    }
}

// ---------------------------------------------------------------------------
// Search outcome
// ---------------------------------------------------------------------------

/// Settled result of one search, as seen by the search controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// At least one playable result.
    Found(Vec<ResultItem>),
    /// The request succeeded but nothing playable came back.
    Empty,
    /// Transport, status or parse failure, carrying the message to show.
    Failed(String),
}

impl From<Result<Vec<Gif>, ApiClientError>> for SearchOutcome {
    fn from(result: Result<Vec<Gif>, ApiClientError>) -> Self {
        match result {
            Ok(gifs) => {
                let items: Vec<ResultItem> =
                    gifs.iter().filter_map(Gif::to_result_item).collect();
                if items.is_empty() {
                    SearchOutcome::Empty
                } else {
                    SearchOutcome::Found(items)
                }
            }
            Err(e) => SearchOutcome::Failed(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

/// Upper bound GIPHY accepts for `limit` on the search endpoint.
const MAX_LIMIT: u32 = 50;

/// Longest slice of a response body kept in errors and logs.
const BODY_SNIPPET_CHARS: usize = 200;

pub struct GiphyClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: Url,
    limit: u32,
    rating: Rating,
    lang: String,
}

impl GiphyClient {
    pub fn new(api_key: String, config: &AppConfig) -> Result<Self, ApiClientError> {
        Ok(Self {
            http_client: reqwest::Client::new(),
            api_key,
            base_url: Url::parse(&config.api_base_url)?,
            limit: config.limit.clamp(1, MAX_LIMIT),
            rating: config.rating,
            lang: config.lang.clone(),
        })
    }

    /// Build the keyword search URL for `term`.
    pub(crate) fn search_url(&self, term: &str) -> Result<Url, ApiClientError> {
        let endpoint = format!("{}/gifs/search", self.base_url.as_str().trim_end_matches('/'));
        let limit = self.limit.to_string();
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("api_key", self.api_key.as_str()),
                ("q", term),
                ("limit", limit.as_str()),
                ("offset", "0"),
                ("rating", self.rating.as_str()),
                ("lang", self.lang.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Search GIFs matching `term`.
    pub async fn search_gifs(&self, term: &str) -> Result<Vec<Gif>, ApiClientError> {
        let url = self.search_url(term)?;
        tracing::debug!(term, "searching gifs");
        let resp = self.http_client.get(url).send().await?;
        let body: SearchResponse = self.handle_response(resp).await?;
        tracing::debug!(term, count = body.data.len(), "search returned");
        Ok(body.data)
    }

    /// Run a search and fold the result into a [`SearchOutcome`].
    pub async fn search(&self, term: &str) -> SearchOutcome {
        let result = self.search_gifs(term).await;
        if let Err(ref e) = result {
            tracing::warn!(term, "search failed: {e}");
        }
        SearchOutcome::from(result)
    }

    /// Download a media asset and return its size in bytes.
    pub async fn fetch_asset(&self, url: &str) -> Result<u64, ApiClientError> {
        let mut resp = self.http_client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                detail: format!("failed to load {url}"),
            });
        }
        // Count the stream instead of buffering the whole asset.
        let mut size = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            size += chunk.len() as u64;
        }
        Ok(size)
    }

    /// Check status and deserialize the body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, ApiClientError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                detail: error_detail(body),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::debug!(body = %snippet(&body), "unparseable response body");
            ApiClientError::Deserialize(e.to_string())
        })
    }
}

/// Prefer the message GIPHY embeds in an error body over the raw text.
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| snippet(&body))
}

/// First line of `body`, cut to [`BODY_SNIPPET_CHARS`] characters.
fn snippet(body: &str) -> String {
    let line = body.trim().lines().next().unwrap_or_default();
    let mut out: String = line.chars().take(BODY_SNIPPET_CHARS).collect();
    if out.len() < line.len() {
        out.push('\u{2026}');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: &AppConfig) -> GiphyClient {
        GiphyClient::new("test-key".into(), config).unwrap()
    }

    fn param(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn search_url_carries_fixed_parameters() {
        let url = client(&AppConfig::default()).search_url("cats").unwrap();
        assert_eq!(url.host_str(), Some("api.giphy.com"));
        assert_eq!(url.path(), "/v1/gifs/search");
        assert_eq!(param(&url, "api_key").as_deref(), Some("test-key"));
        assert_eq!(param(&url, "q").as_deref(), Some("cats"));
        assert_eq!(param(&url, "limit").as_deref(), Some("25"));
        assert_eq!(param(&url, "offset").as_deref(), Some("0"));
        assert_eq!(param(&url, "rating").as_deref(), Some("pg"));
        assert_eq!(param(&url, "lang").as_deref(), Some("en"));
    }

    #[test]
    fn search_url_encodes_term() {
        let url = client(&AppConfig::default())
            .search_url("cats & dogs?")
            .unwrap();
        assert_eq!(param(&url, "q").as_deref(), Some("cats & dogs?"));
        assert!(!url.as_str().contains("cats & dogs?"));
    }

    #[test]
    fn base_url_trailing_slash_is_tolerated() {
        let config = AppConfig {
            api_base_url: "http://localhost:8080/v1/".into(),
            ..AppConfig::default()
        };
        let url = client(&config).search_url("cats").unwrap();
        assert_eq!(url.path(), "/v1/gifs/search");
    }

    #[test]
    fn limit_is_clamped() {
        let config = AppConfig {
            limit: 500,
            ..AppConfig::default()
        };
        let url = client(&config).search_url("cats").unwrap();
        assert_eq!(param(&url, "limit").as_deref(), Some("50"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = AppConfig {
            api_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert!(matches!(
            GiphyClient::new("k".into(), &config),
            Err(ApiClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn error_detail_prefers_embedded_message() {
        assert_eq!(
            error_detail(r#"{"meta": {"status": 403, "msg": "Forbidden"}}"#.into()),
            "Forbidden"
        );
        assert_eq!(error_detail("<html>bad gateway</html>".into()), "<html>bad gateway</html>");
    }

    #[test]
    fn snippet_keeps_first_line_only() {
        assert_eq!(snippet("  short body  "), "short body");
        assert_eq!(snippet("first\nsecond"), "first");
        let long = "x".repeat(5000);
        assert_eq!(snippet(&long).chars().count(), BODY_SNIPPET_CHARS + 1);
    }

    #[test]
    fn outcome_from_results() {
        let gif: Gif = serde_json::from_str(
            r#"{"id": "1", "images": {"original": {"mp4": "a.mp4"}}}"#,
        )
        .unwrap();
        let bare: Gif = serde_json::from_str(r#"{"id": "2"}"#).unwrap();

        match SearchOutcome::from(Ok(vec![gif, bare.clone()])) {
            SearchOutcome::Found(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].url, "a.mp4");
            }
            other => panic!("expected Found, got {other:?}"),
        }
        assert_eq!(SearchOutcome::from(Ok(vec![])), SearchOutcome::Empty);
        assert_eq!(SearchOutcome::from(Ok(vec![bare])), SearchOutcome::Empty);
        assert_eq!(
            SearchOutcome::from(Err(ApiClientError::Deserialize("eof".into()))),
            SearchOutcome::Failed("deserialization error: eof".into())
        );
    }

    // -- Client against a loopback server -----------------------------------

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SECRET: &str = "SECRET-KEY-123";

    fn loopback_client(port: u16) -> GiphyClient {
        let config = AppConfig {
            api_base_url: format!("http://127.0.0.1:{port}/v1"),
            ..AppConfig::default()
        };
        GiphyClient::new(SECRET.into(), &config).unwrap()
    }

    /// Serve one request with `status` and `body`, then close.
    async fn serve_once(status: &'static str, body: String) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });
        port
    }

    /// A port with nothing listening on it.
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn refused_connection_fails_without_leaking_key() {
        let client = loopback_client(closed_port().await);
        match client.search("cats").await {
            SearchOutcome::Failed(message) => {
                assert!(message.starts_with("HTTP error"), "{message}");
                assert!(!message.contains(SECRET), "{message}");
                assert!(!message.contains("api_key"), "{message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_data_is_empty_outcome() {
        let port = serve_once("200 OK", r#"{"data": []}"#.into()).await;
        assert_eq!(loopback_client(port).search("xyzzy").await, SearchOutcome::Empty);
    }

    #[tokio::test]
    async fn two_records_are_found() {
        let body = r#"{"data": [
            {"id": "1", "images": {"original": {"mp4": "a.mp4"}}},
            {"id": "2", "images": {"original": {"mp4": "b.mp4"}}}
        ]}"#;
        let port = serve_once("200 OK", body.into()).await;
        match loopback_client(port).search("cats").await {
            SearchOutcome::Found(items) => {
                let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
                assert_eq!(ids, ["1", "2"]);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_gives_short_failure() {
        let html = format!("<html><body>{}</body></html>", "portal ".repeat(700));
        let port = serve_once("200 OK", html).await;
        match loopback_client(port).search("cats").await {
            SearchOutcome::Failed(message) => {
                assert!(message.starts_with("deserialization error"), "{message}");
                assert!(!message.contains("<html>"), "{message}");
                assert!(message.len() < 200, "{message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_uses_embedded_message() {
        let body = r#"{"meta": {"status": 401, "msg": "Unauthorized"}}"#;
        let port = serve_once("401 Unauthorized", body.into()).await;
        assert_eq!(
            loopback_client(port).search("cats").await,
            SearchOutcome::Failed("API error (status 401): Unauthorized".into())
        );
    }

    #[tokio::test]
    async fn fetch_asset_counts_streamed_bytes() {
        let port = serve_once("200 OK", "m".repeat(70_000)).await;
        let client = loopback_client(closed_port().await);
        let size = client
            .fetch_asset(&format!("http://127.0.0.1:{port}/media/giphy.mp4"))
            .await
            .unwrap();
        assert_eq!(size, 70_000);
    }
}
