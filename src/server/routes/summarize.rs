use axum::{body::Bytes, extract::State, response::Json};
use serde_json::Value;

use super::{ApiError, SummarizeResponse};
use crate::server::{AppState, Backend};
use crate::summarizer::SummarizeError;

const NO_THREAD: &str = "No email_thread provided";

// Anything but a JSON object with a non-blank string `email_thread` counts as
// "not provided".
fn email_thread(body: &[u8]) -> Option<String> {
    let data: Value = serde_json::from_slice(body).ok()?;
    data.get("email_thread")?
        .as_str()
        .filter(|thread| !thread.trim().is_empty())
        .map(str::to_string)
}

pub async fn summarize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Some(email_thread) = email_thread(&body) else {
        log::error!("no email_thread provided in request");
        return Err(ApiError::bad_request(NO_THREAD));
    };

    let summarizer = match state.backend {
        Backend::Unconfigured => return Err(ApiError::internal("API key not configured")),
        Backend::InvalidKey => return Err(ApiError::internal("Invalid API key format")),
        Backend::Ready(summarizer) => summarizer,
    };

    log::info!(
        "received request to summarize email thread (length: {})",
        email_thread.len()
    );

    match summarizer.summarize(&email_thread).await {
        Ok(summary) => {
            let preview: String = summary.chars().take(100).collect();
            log::info!("generated summary: {preview}...");
            Ok(Json(SummarizeResponse { summary }))
        }
        Err(SummarizeError::EmptyThread) => Err(ApiError::bad_request(NO_THREAD)),
        Err(e) => {
            log::error!("error in summarize: {e}");
            Err(ApiError::internal(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::gemini::{LanguageModel, ModelError};
    use crate::server::routes::{ErrorResponse, HealthStatus, SummarizeResponse};
    use crate::server::{app, AppState, Backend};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    struct Canned(Option<&'static str>);

    #[async_trait]
    impl LanguageModel for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            self.0
                .map(str::to_string)
                .ok_or(ModelError::Authentication("API key not valid".to_string()))
        }
    }

    fn ready(answer: Option<&'static str>) -> AppState {
        AppState {
            backend: Backend::with_model(Box::new(Canned(answer))),
        }
    }

    async fn call<T: DeserializeOwned>(
        state: AppState,
        request: Request<Body>,
    ) -> (StatusCode, T) {
        let response = app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/summarize")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body): (_, HealthStatus) = call(ready(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.message, "API is running");
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let (status, body): (_, SummarizeResponse) = call(
            ready(Some("SUMMARY:\nAll good.")),
            post(r#"{"email_thread": "From: a@example.com\nhello"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.summary.contains("📝 SUMMARY:\nAll good."));
        assert!(body.summary.contains("No action items detected."));
    }

    #[tokio::test]
    async fn test_summarize_missing_thread() {
        for payload in ["{}", "not json", r#"{"email_thread": 42}"#, r#"{"email_thread": "  "}"#] {
            let (status, body): (_, ErrorResponse) = call(ready(None), post(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(body.error, "No email_thread provided");
        }
    }

    #[tokio::test]
    async fn test_blank_thread_is_rejected_before_key_checks() {
        for backend in [Backend::Unconfigured, Backend::InvalidKey] {
            let (status, body): (_, ErrorResponse) =
                call(AppState { backend }, post(r#"{"email_thread": "   "}"#)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.error, "No email_thread provided");
        }
    }

    #[tokio::test]
    async fn test_summarize_without_api_key() {
        let state = AppState {
            backend: Backend::Unconfigured,
        };
        let (status, body): (_, ErrorResponse) =
            call(state, post(r#"{"email_thread": "hello"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "API key not configured");
    }

    #[tokio::test]
    async fn test_summarize_with_short_api_key() {
        let state = AppState {
            backend: Backend::InvalidKey,
        };
        let (status, body): (_, ErrorResponse) =
            call(state, post(r#"{"email_thread": "hello"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Invalid API key format");
    }

    #[tokio::test]
    async fn test_summarize_model_failure() {
        let (status, body): (_, ErrorResponse) =
            call(ready(None), post(r#"{"email_thread": "hello"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.error,
            "Invalid or expired API key. Please check your Google API key configuration."
        );
    }
}
