use std::fmt;

use crate::analysis::{format_results, parse_model_response, ThreadAnalysis};
use crate::gemini::{LanguageModel, ModelError};
use crate::preprocess::{generate_structured_prompt, preprocess_email_thread};

#[derive(Debug)]
pub enum SummarizeError {
    EmptyThread,
    Model(ModelError),
}

impl fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarizeError::EmptyThread => write!(f, "No email_thread provided"),
            SummarizeError::Model(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SummarizeError {}

impl From<ModelError> for SummarizeError {
    fn from(e: ModelError) -> Self {
        SummarizeError::Model(e)
    }
}

pub struct ThreadSummarizer<M: LanguageModel> {
    model: M,
}

impl<M: LanguageModel> ThreadSummarizer<M> {
    pub fn new(model: M) -> Self {
        ThreadSummarizer { model }
    }

    pub async fn analyze(&self, email_thread: &str) -> Result<ThreadAnalysis, SummarizeError> {
        if email_thread.trim().is_empty() {
            return Err(SummarizeError::EmptyThread);
        }

        log::debug!("preprocessing email thread");
        let cleaned = preprocess_email_thread(email_thread);
        log::info!("preprocessed thread length: {} characters", cleaned.len());

        let prompt = generate_structured_prompt(&cleaned);
        log::info!("generated prompt length: {} characters", prompt.len());

        let response = self.model.generate(&prompt).await.map_err(|e| {
            log::error!("model request failed: {}", e.detail());
            SummarizeError::from(e)
        })?;
        log::info!("response text length: {} characters", response.len());

        Ok(parse_model_response(&response))
    }

    /// Runs the whole pipeline and returns the marker-delimited summary text.
    pub async fn summarize(&self, email_thread: &str) -> Result<String, SummarizeError> {
        let analysis = self.analyze(email_thread).await?;
        log::debug!("analysis complete, formatting results");
        Ok(format_results(&analysis))
    }
}
