use crate::client::SummarizerClient;
use crate::input::require_thread;
use crate::mock::MockSummarizer;
use crate::notice::Notice;

/// Where a submitted thread gets its summary text from.
#[derive(Clone, Debug)]
pub enum SummarySource {
    Mock(MockSummarizer),
    Backend(SummarizerClient),
}

impl SummarySource {
    pub fn backend(base_url: &str) -> Result<Self, Notice> {
        Ok(SummarySource::Backend(
            SummarizerClient::new(base_url).map_err(Notice::error)?,
        ))
    }

    /// Produces the summary text for a thread. Blank threads are refused before
    /// anything is contacted, and the backend is only posted to once it reports healthy.
    pub async fn fetch(&self, email_thread: &str) -> Result<String, Notice> {
        require_thread(email_thread).map_err(Notice::error)?;

        match self {
            SummarySource::Mock(mock) => Ok(mock.summarize(email_thread).await),
            SummarySource::Backend(client) => {
                client.submit(email_thread).await.map_err(Notice::from)
            }
        }
    }
}
