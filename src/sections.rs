use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SUMMARY_MARKER: &str = "📝 SUMMARY:";
pub const ACTION_ITEMS_MARKER: &str = "✅ ACTION ITEMS:";
pub const DECISIONS_MARKER: &str = "🔍 KEY DECISIONS:";
pub const QUESTIONS_MARKER: &str = "❓ OPEN QUESTIONS:";

// Order matters: a section ends where any later marker begins.
const MARKERS: [&str; 4] = [
    SUMMARY_MARKER,
    ACTION_ITEMS_MARKER,
    DECISIONS_MARKER,
    QUESTIONS_MARKER,
];

const ACTION_ITEMS_LABEL: &str = "Action Items";
const DECISIONS_LABEL: &str = "Key Decisions";
const QUESTIONS_LABEL: &str = "Open Questions";

lazy_static! {
    static ref LEADING_TOKEN_RE: Regex = Regex::new(r"^(?:\d+\.\s*-?\s*|-\s*|•\s*)").unwrap();
}

/// The four sections of a summary as shown to the user. A field is empty when the
/// summary text carried nothing recognizable for it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionedSummary {
    pub summary: String,
    pub action_items: String,
    pub decisions: String,
    pub questions: String,
}

impl SectionedSummary {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.action_items.is_empty()
            && self.decisions.is_empty()
            && self.questions.is_empty()
    }

    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Summary => &self.summary,
            SectionKind::ActionItems => &self.action_items,
            SectionKind::Decisions => &self.decisions,
            SectionKind::Questions => &self.questions,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    ActionItems,
    Decisions,
    Questions,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Summary,
        SectionKind::ActionItems,
        SectionKind::Decisions,
        SectionKind::Questions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::ActionItems => "Action Items",
            SectionKind::Decisions => "Key Decisions",
            SectionKind::Questions => "Open Questions",
        }
    }

    /// What the results view shows when a section has nothing to list.
    pub fn empty_message(&self) -> &'static str {
        match self {
            SectionKind::Summary => "No summary available",
            SectionKind::ActionItems => "No action items detected",
            SectionKind::Decisions => "No decisions detected",
            SectionKind::Questions => "No open questions detected",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(SectionKind::Summary),
            "actions" | "action-items" | "action_items" => Ok(SectionKind::ActionItems),
            "decisions" => Ok(SectionKind::Decisions),
            "questions" => Ok(SectionKind::Questions),
            _ => Err(format!(
                "unknown section '{s}' (expected summary, actions, decisions or questions)"
            )),
        }
    }
}

/// Splits summary text into its four sections. Marker headers are tried first; plain
/// labels are only consulted when no marker produced anything.
pub fn parse(raw: &str) -> SectionedSummary {
    let labeled = extract_labeled(raw);
    if !labeled.is_empty() {
        return labeled;
    }

    log::debug!("no section markers found, falling back to plain labels");
    extract_plain(raw)
}

fn extract_labeled(raw: &str) -> SectionedSummary {
    SectionedSummary {
        summary: labeled_section(raw, 0),
        action_items: labeled_section(raw, 1),
        decisions: labeled_section(raw, 2),
        questions: labeled_section(raw, 3),
    }
}

fn labeled_section(raw: &str, index: usize) -> String {
    let marker = MARKERS[index];
    let Some(position) = raw.find(marker) else {
        return String::new();
    };

    let body = &raw[position + marker.len()..];
    let end = MARKERS[index + 1..]
        .iter()
        .filter_map(|next| body.find(next))
        .min()
        .unwrap_or(body.len());

    body[..end].trim().to_string()
}

fn after<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.find(label).map(|position| &text[position + label.len()..])
}

fn before<'a>(text: &'a str, label: &str) -> &'a str {
    text.find(label).map_or(text, |position| &text[..position])
}

// The summary field is never recovered here.
fn extract_plain(raw: &str) -> SectionedSummary {
    let mut sections = SectionedSummary::default();

    if let Some(rest) = after(raw, ACTION_ITEMS_LABEL) {
        sections.action_items = before(rest, DECISIONS_LABEL).trim().to_string();
        if let Some(rest) = after(rest, DECISIONS_LABEL) {
            decisions_onward(rest, &mut sections);
        }
    } else if let Some(rest) = after(raw, DECISIONS_LABEL) {
        decisions_onward(rest, &mut sections);
    } else if let Some(rest) = after(raw, QUESTIONS_LABEL) {
        sections.questions = rest.trim().to_string();
    }

    sections
}

fn decisions_onward(rest: &str, sections: &mut SectionedSummary) {
    sections.decisions = before(rest, QUESTIONS_LABEL).trim().to_string();
    if let Some(rest) = after(rest, QUESTIONS_LABEL) {
        sections.questions = rest.trim().to_string();
    }
}

/// Cleans one line of section text for list display. Returns `None` for lines that
/// should not be shown at all.
pub fn clean_line(line: &str) -> Option<String> {
    let cleaned = line.trim();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("copy") {
        return None;
    }

    let formatted = LEADING_TOKEN_RE.replace(cleaned, "");
    let formatted = formatted.trim();
    if formatted.is_empty() {
        None
    } else {
        Some(formatted.to_string())
    }
}

/// The list entries of a section, in order. An empty result means the view shows the
/// section's empty-state message.
pub fn section_lines(text: &str) -> Vec<String> {
    text.lines().filter_map(clean_line).collect()
}
