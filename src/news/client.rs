use crate::feed::NewsRequest;
use crate::news::types::{ArticlesPage, WireError};
use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Header carrying the API key. Keeps the key out of request URLs, which
/// reqwest includes in its error messages.
const API_KEY_HEADER: &str = "X-Api-Key";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const MAX_ERROR_BODY_SIZE: usize = 64 * 1024;

/// Coarse classification used at the controller boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Parse,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {status}{}", api_message_suffix(.message))]
    HttpStatus {
        status: u16,
        message: Option<String>,
    },
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NewsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsError::Parse(_) | NewsError::InvalidUtf8 => ErrorKind::Parse,
            NewsError::Timeout(_)
            | NewsError::Network(_)
            | NewsError::HttpStatus { .. }
            | NewsError::ResponseTooLarge(_)
            | NewsError::InvalidUrl(_)
            | NewsError::InsecureBaseUrl => ErrorKind::Transport,
        }
    }
}

fn api_message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({})", m))
        .unwrap_or_default()
}

/// Limit redirects to 3 hops and reject loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Parse and check the API base URL.
///
/// HTTPS is required so the key is never sent in clear text; plain HTTP is
/// accepted for localhost and 127.0.0.1 only.
fn parse_base_url(base: &str) -> Result<Url, NewsError> {
    let mut url = Url::parse(base).map_err(|e| NewsError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            let is_localhost = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if !is_localhost {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS base URL (HTTPS required except for localhost)");
                return Err(NewsError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base, "Using non-HTTPS news API base URL (localhost only)");
        }
        other => return Err(NewsError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }

    // Endpoint paths are joined relative to the base, so it must end in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// HTTP client for the news search and top-headlines endpoints.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Arc<SecretString>,
    timeout: Duration,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NewsClient {
    /// Client against the public API with the default timeout.
    pub fn new(api_key: SecretString) -> Result<Self, NewsError> {
        Self::with_options(api_key, None, DEFAULT_TIMEOUT)
    }

    /// Client with an optional custom base URL (used by tests and proxies).
    pub fn with_options(
        api_key: SecretString,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, NewsError> {
        let base_url = parse_base_url(base_url.unwrap_or(DEFAULT_BASE_URL))?;
        if base_url.as_str().trim_end_matches('/') != DEFAULT_BASE_URL {
            tracing::info!(base_url = %base_url, "Using custom news API base URL");
        }

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .user_agent(concat!("newsflow/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: Arc::new(api_key),
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL without the credential.
    pub fn request_url(&self, request: &NewsRequest) -> Result<Url, NewsError> {
        let mut url = self
            .base_url
            .join(request.endpoint())
            .map_err(|e| NewsError::InvalidUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// Issue one GET for `request` and decode the result page.
    pub async fn fetch(&self, request: &NewsRequest) -> Result<ArticlesPage, NewsError> {
        let url = self.request_url(request)?;
        tracing::debug!(url = %url, mode = ?request.mode(), "Fetching news");

        tokio::time::timeout(self.timeout, self.fetch_url(url))
            .await
            .map_err(|_| NewsError::Timeout(self.timeout.as_secs()))?
    }

    async fn fetch_url(&self, url: Url) -> Result<ArticlesPage, NewsError> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            return Err(NewsError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        if std::str::from_utf8(&bytes).is_err() {
            return Err(NewsError::InvalidUtf8);
        }
        Ok(ArticlesPage::from_json(&bytes)?)
    }
}

/// Pull the `message` out of an API error body, if there is one.
async fn read_error_message(response: reqwest::Response) -> Option<String> {
    let bytes = read_limited_bytes(response, MAX_ERROR_BODY_SIZE).await.ok()?;
    let wire: WireError = serde_json::from_slice(&bytes).ok()?;
    if let Some(code) = &wire.code {
        tracing::debug!(code = %code, "News API returned error code");
    }
    wire.message
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, NewsError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Category, SortOrder};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key() -> SecretString {
        SecretString::from("test-key".to_string())
    }

    async fn client_for(server: &MockServer) -> NewsClient {
        NewsClient::with_options(key(), Some(&server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_search_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "rust lang"))
            .and(query_param("sortBy", "relevancy"))
            .and(query_param("language", "en"))
            .and(query_param("pageSize", "20"))
            .and(header("X-Api-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"ok","totalResults":2,"articles":[{"url":"https://a.example/1"},{"url":"https://a.example/2"}]}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = NewsRequest::Search {
            q: "rust lang".to_string(),
            sort_by: SortOrder::Relevance,
        };
        let page = client.fetch(&request).await.unwrap();
        assert_eq!(page.articles.len(), 2);
        assert_eq!(page.total_results, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_headlines_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .and(query_param("category", "science"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let page = client
            .fetch(&NewsRequest::Headlines {
                category: Category::Science,
            })
            .await
            .unwrap();
        assert!(page.articles.is_empty());
    }

    #[tokio::test]
    async fn test_http_401_carries_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .fetch(&NewsRequest::Headlines {
                category: Category::General,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        match err {
            NewsError::HttpStatus { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Your API key is invalid."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_500_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .fetch(&NewsRequest::Headlines {
                category: Category::General,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NewsError::HttpStatus {
                status: 500,
                message: None
            }
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .fetch(&NewsRequest::Headlines {
                category: Category::General,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"articles":[]}"#)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client =
            NewsClient::with_options(key(), Some(&server.uri()), Duration::from_millis(200))
                .unwrap();
        let err = client
            .fetch(&NewsRequest::Headlines {
                category: Category::General,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_http_base_url_rejected() {
        let result = NewsClient::with_options(key(), Some("http://evil.com"), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(NewsError::InsecureBaseUrl)));
    }

    #[test]
    fn test_localhost_base_url_allowed() {
        let result =
            NewsClient::with_options(key(), Some("http://127.0.0.1:9999"), DEFAULT_TIMEOUT);
        assert!(result.is_ok());
    }

    #[test]
    fn test_garbage_base_url_rejected() {
        let result = NewsClient::with_options(key(), Some("not a url"), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(NewsError::InvalidUrl(_))));
        let result = NewsClient::with_options(key(), Some("ftp://newsapi.org"), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(NewsError::InvalidUrl(_))));
    }

    #[test]
    fn test_request_url_keeps_base_path_prefix() {
        let client =
            NewsClient::with_options(key(), Some("https://proxy.example/news"), DEFAULT_TIMEOUT)
                .unwrap();
        let url = client
            .request_url(&NewsRequest::Headlines {
                category: Category::Health,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example/news/v2/top-headlines?category=health&language=en&pageSize=20"
        );
    }

    #[test]
    fn test_request_url_encodes_term_and_omits_key() {
        let client = NewsClient::new(key()).unwrap();
        let url = client
            .request_url(&NewsRequest::Search {
                q: "c++ & rust".to_string(),
                sort_by: SortOrder::Latest,
            })
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("q".to_string(), "c++ & rust".to_string()));
        assert!(!url.as_str().contains("test-key"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = NewsClient::new(key()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
