use crate::gemini::{GeminiModel, LanguageModel};
use crate::summarizer::ThreadSummarizer;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod routes;

const MIN_API_KEY_LENGTH: usize = 10;

pub type SharedSummarizer = Arc<ThreadSummarizer<Box<dyn LanguageModel>>>;

/// What the summarize route can do, decided once at startup from configuration.
#[derive(Clone)]
pub enum Backend {
    Unconfigured,
    InvalidKey,
    Ready(SharedSummarizer),
}

impl Backend {
    pub fn from_config(api_key: Option<&str>, model: &str, base_url: &str) -> anyhow::Result<Self> {
        let Some(api_key) = api_key else {
            log::error!("GOOGLE_API_KEY not found in environment variables");
            return Ok(Backend::Unconfigured);
        };

        let api_key = crate::gemini::clean_api_key(api_key);
        if api_key.chars().count() < MIN_API_KEY_LENGTH {
            log::error!("API key appears to be invalid (too short)");
            return Ok(Backend::InvalidKey);
        }

        let model: Box<dyn LanguageModel> = Box::new(GeminiModel::new(&api_key, model, base_url)?);
        Ok(Backend::with_model(model))
    }

    pub fn with_model(model: Box<dyn LanguageModel>) -> Self {
        Backend::Ready(Arc::new(ThreadSummarizer::new(model)))
    }
}

// This struct will hold all shared state for the HTTP backend.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    log::info!("{method} {path} -> {}", response.status());
    response
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/summarize", post(routes::summarize::summarize))
        .layer(DefaultBodyLimit::max(1024 * 1024 * 10))
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// The entry point for the summarization backend.
pub async fn start() -> anyhow::Result<()> {
    let backend = Backend::from_config(
        crate::GOOGLE_API_KEY.as_deref(),
        crate::GEMINI_MODEL.as_str(),
        crate::GEMINI_BASE_URL.as_str(),
    )?;

    let server: SocketAddr = format!("{}:{}", *crate::SERVER_ADDRESS, *crate::SERVER_PORT)
        .parse()
        .map_err(|e| anyhow::anyhow!("unable to parse socket address: {e}"))?;

    log::info!("summarization backend listening on {server}");

    let listener = tokio::net::TcpListener::bind(server).await?;
    axum::serve(listener, app(AppState { backend }).into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn spawn_test_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    addr
}
