use serde::Serialize;
use std::fmt;

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A short, non-fatal message for the user. Every failure path ends in one of these
/// and leaves the user free to retry.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notice {
    pub fn info(title: &str, description: &str) -> Self {
        Notice {
            title: title.to_string(),
            description: description.to_string(),
            variant: Variant::Default,
        }
    }

    pub fn error(description: impl ToString) -> Self {
        Notice::destructive("Error", description)
    }

    pub fn destructive(title: &str, description: impl ToString) -> Self {
        Notice {
            title: title.to_string(),
            description: description.to_string(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }

    /// Notice shown when the results view is opened without a summary to display.
    pub fn missing_summary() -> Self {
        Notice::error("No summary data found. Please try again.")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

// Lets handlers return a notice through `anyhow` and have main show it as-is.
impl std::error::Error for Notice {}
