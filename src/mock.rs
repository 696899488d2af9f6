use std::time::Duration;

use crate::analysis::{format_results, ThreadAnalysis};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

const SUMMARY_POINTS: [&str; 4] = [
    "Team needs to finalize the Q3 report by Friday",
    "Client meeting presentation needs to be prepared for next week",
    "Jane is working on the presentation slides",
    "Jane will send updated analytics by tomorrow",
];

const ACTION_ITEMS: [&str; 4] = [
    "Jane to send updated analytics by tomorrow",
    "Team to finalize Q3 report by Friday",
    "Prepare presentation for client meeting next week",
    "Schedule team offsite by end of month",
];

/// Produces canned summary text for demos without contacting any service.
#[derive(Clone, Debug)]
pub struct MockSummarizer {
    delay: Duration,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        MockSummarizer::new(DEFAULT_DELAY)
    }
}

impl MockSummarizer {
    pub fn new(delay: Duration) -> Self {
        MockSummarizer { delay }
    }

    pub fn analysis() -> ThreadAnalysis {
        ThreadAnalysis {
            summary: SUMMARY_POINTS.join(". ") + ".",
            action_items: ACTION_ITEMS.iter().map(|x| x.to_string()).collect(),
            decisions: vec![],
            questions: vec![],
        }
    }

    pub async fn summarize(&self, email_thread: &str) -> String {
        log::debug!(
            "simulating summary of {} characters with a {:?} delay",
            email_thread.len(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;
        format_results(&MockSummarizer::analysis())
    }
}
