use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that can turn a prompt into text. The summarizer only sees this trait.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[async_trait]
impl LanguageModel for Box<dyn LanguageModel> {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).generate(prompt).await
    }
}

#[derive(Debug)]
pub enum ModelError {
    Authentication(String),
    Quota(String),
    Network(String),
    Api { status: u16, body: String },
    EmptyResponse,
}

impl ModelError {
    pub fn from_status(status: u16, body: String) -> Self {
        let lowered = body.to_lowercase();
        match status {
            401 | 403 => ModelError::Authentication(body),
            400 if body.contains("API key") || body.contains("API_KEY_INVALID") => {
                ModelError::Authentication(body)
            }
            429 => ModelError::Quota(body),
            _ if lowered.contains("quota") => ModelError::Quota(body),
            _ => ModelError::Api { status, body },
        }
    }

    /// Upstream detail kept for the logs; `Display` is what users see.
    pub fn detail(&self) -> String {
        match self {
            ModelError::Authentication(detail)
            | ModelError::Quota(detail)
            | ModelError::Network(detail) => detail.clone(),
            ModelError::Api { status, body } => format!("{status}: {body}"),
            ModelError::EmptyResponse => "no candidates".to_string(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Authentication(_) => write!(
                f,
                "Invalid or expired API key. Please check your Google API key configuration."
            ),
            ModelError::Quota(_) => write!(
                f,
                "API quota exceeded. Please try again later or upgrade your API plan."
            ),
            ModelError::Network(_) => write!(
                f,
                "Network error connecting to Google API. Please check your internet connection."
            ),
            ModelError::Api { status, .. } => write!(f, "Gemini API error ({status})"),
            ModelError::EmptyResponse => write!(f, "Empty response from Gemini model"),
        }
    }
}

impl std::error::Error for ModelError {}

#[derive(Serialize, Debug)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

/// Keys pasted into `.env` often arrive quoted.
pub fn clean_api_key(api_key: &str) -> String {
    api_key
        .trim()
        .trim_matches('\'')
        .trim_matches('"')
        .to_string()
}

pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{head}...{tail}")
    } else {
        let head: String = chars.iter().take(5).collect();
        format!("{head}...")
    }
}

pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> anyhow::Result<Self> {
        let api_key = clean_api_key(api_key);
        log::info!(
            "setting up Gemini model {model} with API key: {}",
            mask_api_key(&api_key)
        );

        let client = Client::builder()
            .user_agent(concat!("Threadsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(anyhow::Error::msg)?;

        Ok(GeminiModel {
            client,
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        log::debug!("sending {} character prompt to Gemini", prompt.len());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::from_status(status.as_u16(), body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Api {
                status: status.as_u16(),
                body: e.to_string(),
            })?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        log::debug!("received {} characters from Gemini", text.len());
        Ok(text)
    }
}
