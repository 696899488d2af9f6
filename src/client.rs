use reqwest::Client;
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::notice::Notice;
use crate::server::routes::SummarizeRequest;

#[derive(Debug)]
pub enum ClientError {
    InvalidUrl(String),
    EmptyThread,
    Unavailable,
    Unreachable(String),
    Api { status: u16, message: String },
    MissingSummary,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(url) => write!(f, "Invalid summarizer URL: {url}"),
            ClientError::EmptyThread => write!(f, "Please enter an email thread to summarize"),
            ClientError::Unavailable | ClientError::Unreachable(_) => write!(
                f,
                "Could not connect to the server. Please make sure the backend is running."
            ),
            ClientError::Api { message, .. } => write!(f, "{message}"),
            ClientError::MissingSummary => write!(f, "No summary in response"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ClientError> for Notice {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unavailable => Notice::destructive("Backend unavailable", e),
            e => Notice::error(e),
        }
    }
}

/// Talks to the summarization backend over HTTP.
#[derive(Clone, Debug)]
pub struct SummarizerClient {
    client: Client,
    base_url: Url,
}

impl SummarizerClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;

        // Endpoints are joined relative to the base, so keep any path prefix as a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("Threadsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        Ok(SummarizerClient { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|_| ClientError::InvalidUrl(format!("{}{path}", self.base_url)))
    }

    /// True only when the backend answered its health check successfully.
    pub async fn health(&self) -> bool {
        let Ok(url) = self.endpoint("api/health") else {
            return false;
        };

        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                log::debug!("backend is available");
                true
            }
            Ok(response) => {
                log::error!("backend health check failed: {}", response.status());
                false
            }
            Err(e) => {
                log::error!("backend is not available: {e}");
                false
            }
        }
    }

    /// Validates the thread and checks the backend's health before posting it. Nothing
    /// is sent when either check fails.
    pub async fn submit(&self, email_thread: &str) -> Result<String, ClientError> {
        if email_thread.trim().is_empty() {
            return Err(ClientError::EmptyThread);
        }

        if !self.health().await {
            return Err(ClientError::Unavailable);
        }

        self.summarize(email_thread).await
    }

    pub async fn summarize(&self, email_thread: &str) -> Result<String, ClientError> {
        let url = self.endpoint("api/summarize")?;

        let response = self
            .client
            .post(url)
            .json(&SummarizeRequest {
                email_thread: email_thread.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                log::error!("error processing email: {e}");
                ClientError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        // Error bodies are optional; a non-JSON body still yields the status message.
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(format!("API error: {}", status.as_u16()));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        body.as_ref()
            .and_then(|b| b.get("summary"))
            .and_then(Value::as_str)
            .filter(|summary| !summary.is_empty())
            .map(str::to_string)
            .ok_or(ClientError::MissingSummary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::spawn_test_server;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // A backend whose health endpoint answers `health` and that counts summarize posts.
    async fn counting_backend(health: StatusCode) -> (SummarizerClient, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new()
            .route("/api/health", get(move || async move { health }))
            .route(
                "/api/summarize",
                post(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Json(json!({ "summary": "📝 SUMMARY: done" }))
                    }
                }),
            );
        let addr = spawn_test_server(app).await;
        let client = SummarizerClient::new(&format!("http://{addr}")).unwrap();
        (client, hits)
    }

    async fn backend(status: StatusCode, body: &'static str) -> SummarizerClient {
        let app = Router::new()
            .route("/api/health", get(move || async move { status }))
            .route("/api/summarize", post(move || async move { (status, body) }));
        let addr = spawn_test_server(app).await;
        SummarizerClient::new(&format!("http://{addr}")).unwrap()
    }

    #[tokio::test]
    async fn test_summarize_returns_summary() {
        let app = Router::new().route(
            "/api/summarize",
            post(|Json(request): Json<SummarizeRequest>| async move {
                Json(json!({ "summary": format!("echo: {}", request.email_thread) }))
            }),
        );
        let addr = spawn_test_server(app).await;
        let client = SummarizerClient::new(&format!("http://{addr}/")).unwrap();

        assert_eq!(client.summarize("hello").await.unwrap(), "echo: hello");
    }

    #[tokio::test]
    async fn test_summarize_uses_error_body() {
        let client = backend(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "API key not configured"}"#,
        )
        .await;

        let error = client.summarize("hello").await.unwrap_err();
        assert!(matches!(error, ClientError::Api { status: 500, .. }));
        assert_eq!(error.to_string(), "API key not configured");
    }

    #[tokio::test]
    async fn test_summarize_falls_back_to_status() {
        let client = backend(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;

        let error = client.summarize("hello").await.unwrap_err();
        assert_eq!(error.to_string(), "API error: 502");
    }

    #[tokio::test]
    async fn test_summarize_missing_summary_field() {
        let client = backend(StatusCode::OK, r#"{"result": "nope"}"#).await;

        assert!(matches!(
            client.summarize("hello").await,
            Err(ClientError::MissingSummary)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = SummarizerClient::new(&format!("http://{addr}")).unwrap();

        assert!(!client.health().await);
        let error = client.summarize("hello").await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Could not connect to the server. Please make sure the backend is running."
        );
    }

    #[tokio::test]
    async fn test_health() {
        assert!(backend(StatusCode::OK, "{}").await.health().await);
        assert!(
            !backend(StatusCode::SERVICE_UNAVAILABLE, "{}")
                .await
                .health()
                .await
        );
    }

    #[tokio::test]
    async fn test_submit_skips_post_when_backend_unhealthy() {
        let (client, hits) = counting_backend(StatusCode::SERVICE_UNAVAILABLE).await;

        let error = client.submit("From: a@example.com\nhello").await.unwrap_err();
        assert!(matches!(error, ClientError::Unavailable));
        assert_eq!(
            error.to_string(),
            "Could not connect to the server. Please make sure the backend is running."
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_thread_without_contact() {
        let (client, hits) = counting_backend(StatusCode::OK).await;

        assert!(matches!(
            client.submit(" \n\t").await,
            Err(ClientError::EmptyThread)
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_posts_when_healthy() {
        let (client, hits) = counting_backend(StatusCode::OK).await;

        assert_eq!(client.submit("hello").await.unwrap(), "📝 SUMMARY: done");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let app = Router::new()
            .route("/ts/api/health", get(|| async { StatusCode::OK }))
            .route(
                "/ts/api/summarize",
                post(|| async { Json(json!({ "summary": "prefixed" })) }),
            );
        let addr = spawn_test_server(app).await;

        for base in [format!("http://{addr}/ts"), format!("http://{addr}/ts/")] {
            let client = SummarizerClient::new(&base).unwrap();
            assert!(client.health().await, "{base}");
            assert_eq!(client.summarize("hello").await.unwrap(), "prefixed");
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SummarizerClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
