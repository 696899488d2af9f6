use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sections::{ACTION_ITEMS_MARKER, DECISIONS_MARKER, QUESTIONS_MARKER, SUMMARY_MARKER};

lazy_static! {
    static ref HEADER_RE: Regex = Regex::new(
        r"(?i)^[#*\s]*(summary|action items|key decisions|decisions|questions raised|open questions|questions)[*\s]*(:)?[*\s]*(.*)$"
    )
    .unwrap();
    static ref ITEM_RE: Regex = Regex::new(r"^(?:[-•*]|\d+\.)\s*(.*)$").unwrap();
    static ref OWNER_RE: Regex = Regex::new(r"\[OWNER:\s*(.*?)\]").unwrap();
    static ref DEADLINE_RE: Regex = Regex::new(r"\[DEADLINE:\s*(.*?)\]").unwrap();
}

/// The model's answer read back into its four parts.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadAnalysis {
    pub summary: String,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    pub questions: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    Preamble,
    Summary,
    ActionItems,
    Decisions,
    Questions,
}

impl From<&str> for Heading {
    fn from(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "summary" => Heading::Summary,
            "action items" => Heading::ActionItems,
            "key decisions" | "decisions" => Heading::Decisions,
            "questions raised" | "open questions" | "questions" => Heading::Questions,
            _ => Heading::Preamble,
        }
    }
}

// A header needs a colon unless it stands alone on its line, so prose such as
// "Summary of the call" stays prose.
fn heading(line: &str) -> Option<(Heading, &str)> {
    let captures = HEADER_RE.captures(line)?;
    let rest = captures.get(3).map_or("", |m| m.as_str()).trim();
    if captures.get(2).is_none() && !rest.is_empty() {
        return None;
    }

    Some((Heading::from(&captures[1]), rest))
}

fn push_item(items: &mut Vec<String>, line: &str) {
    if let Some(captures) = ITEM_RE.captures(line) {
        let item = captures[1].trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    } else if let Some(last) = items.last_mut() {
        last.push(' ');
        last.push_str(line);
    } else {
        items.push(line.to_string());
    }
}

pub fn parse_model_response(response_text: &str) -> ThreadAnalysis {
    let mut analysis = ThreadAnalysis::default();
    let mut summary_lines: Vec<&str> = vec![];
    let mut current = Heading::Preamble;

    for raw_line in response_text.lines() {
        let mut line = raw_line.trim();

        if let Some((next, rest)) = heading(line) {
            current = next;
            line = rest;
        }

        if line.is_empty() {
            continue;
        }

        match current {
            Heading::Preamble => log::debug!("ignoring preamble line: {line}"),
            Heading::Summary => summary_lines.push(line),
            Heading::ActionItems => push_item(&mut analysis.action_items, line),
            Heading::Decisions => push_item(&mut analysis.decisions, line),
            Heading::Questions => push_item(&mut analysis.questions, line),
        }
    }

    analysis.summary = summary_lines.join("\n").trim().to_string();
    analysis
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace('*', "").trim().to_string()
}

fn highlight_action_item(item: &str) -> String {
    let highlighted = OWNER_RE.replace_all(item, "👤 ${1} →");
    DEADLINE_RE
        .replace_all(&highlighted, "⏰ ${1}")
        .to_string()
}

fn push_numbered(output: &mut String, items: &[String], empty: &str, decorate: fn(&str) -> String) {
    if items.is_empty() {
        output.push_str(empty);
        output.push('\n');
        return;
    }

    for (index, item) in items.iter().enumerate() {
        let cleaned = strip_emphasis(item);
        output.push_str(&format!("{}. {}\n", index + 1, decorate(&cleaned)));
    }
}

/// Renders an analysis in the marker-delimited layout the results view parses.
pub fn format_results(analysis: &ThreadAnalysis) -> String {
    let mut output = String::from("📧 EMAIL THREAD SUMMARY\n");
    output.push_str(&"=".repeat(50));
    output.push_str("\n\n");

    output.push_str(SUMMARY_MARKER);
    output.push('\n');
    if analysis.summary.is_empty() {
        output.push_str("No summary available.\n");
    } else {
        output.push_str(&strip_emphasis(&analysis.summary));
        output.push('\n');
    }
    output.push('\n');

    output.push_str(ACTION_ITEMS_MARKER);
    output.push('\n');
    push_numbered(
        &mut output,
        &analysis.action_items,
        "No action items detected.",
        highlight_action_item,
    );
    output.push('\n');

    output.push_str(DECISIONS_MARKER);
    output.push('\n');
    push_numbered(
        &mut output,
        &analysis.decisions,
        "No decisions detected.",
        str::to_string,
    );
    output.push('\n');

    output.push_str(QUESTIONS_MARKER);
    output.push('\n');
    push_numbered(
        &mut output,
        &analysis.questions,
        "No open questions detected.",
        str::to_string,
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{parse, section_lines};

    const MODEL_ANSWER: &str = "Here is the summary you asked for.

**SUMMARY:**
The team is wrapping up Q3 deliverables.
Jane is preparing the slides.

ACTION ITEMS:
- [OWNER: Jane] Send updated analytics [DEADLINE: tomorrow]
- [OWNER: John] Finalize the report
  before the client meeting
* Schedule the team offsite

KEY DECISIONS:
1. Present to the client next week

QUESTIONS RAISED:
- Who books the offsite venue?
";

    #[test]
    fn test_parse_model_response() {
        let analysis = parse_model_response(MODEL_ANSWER);
        assert_eq!(
            analysis.summary,
            "The team is wrapping up Q3 deliverables.\nJane is preparing the slides."
        );
        assert_eq!(
            analysis.action_items,
            vec![
                "[OWNER: Jane] Send updated analytics [DEADLINE: tomorrow]",
                "[OWNER: John] Finalize the report before the client meeting",
                "Schedule the team offsite",
            ]
        );
        assert_eq!(analysis.decisions, vec!["Present to the client next week"]);
        assert_eq!(analysis.questions, vec!["Who books the offsite venue?"]);
    }

    #[test]
    fn test_parse_inline_headers() {
        let analysis = parse_model_response("SUMMARY: Short call.\nDecisions: - Ship it");
        assert_eq!(analysis.summary, "Short call.");
        assert_eq!(analysis.decisions, vec!["Ship it"]);
    }

    #[test]
    fn test_prose_is_not_a_header() {
        let analysis = parse_model_response("SUMMARY:\nSummary of the call was brief.");
        assert_eq!(analysis.summary, "Summary of the call was brief.");
    }

    #[test]
    fn test_format_results_layout() {
        let analysis = ThreadAnalysis {
            summary: "A **short** thread.".to_string(),
            action_items: vec!["[OWNER: Jane] Send analytics [DEADLINE: Friday]".to_string()],
            decisions: vec![],
            questions: vec!["*Budget*?".to_string()],
        };

        let expected = format!(
            "📧 EMAIL THREAD SUMMARY\n{}\n\n\
             📝 SUMMARY:\nA short thread.\n\n\
             ✅ ACTION ITEMS:\n1. 👤 Jane → Send analytics ⏰ Friday\n\n\
             🔍 KEY DECISIONS:\nNo decisions detected.\n\n\
             ❓ OPEN QUESTIONS:\n1. Budget?\n",
            "=".repeat(50)
        );
        assert_eq!(format_results(&analysis), expected);
    }

    #[test]
    fn test_formatted_results_parse_into_sections() {
        let formatted = format_results(&parse_model_response(MODEL_ANSWER));
        let sections = parse(&formatted);

        assert_eq!(
            sections.summary,
            "The team is wrapping up Q3 deliverables.\nJane is preparing the slides."
        );
        assert_eq!(
            section_lines(&sections.action_items),
            vec![
                "👤 Jane → Send updated analytics ⏰ tomorrow",
                "👤 John → Finalize the report before the client meeting",
                "Schedule the team offsite",
            ]
        );
        assert_eq!(
            section_lines(&sections.questions),
            vec!["Who books the offsite venue?"]
        );
    }

    #[test]
    fn test_empty_analysis_formats_placeholders() {
        let formatted = format_results(&ThreadAnalysis::default());
        assert!(formatted.contains("No summary available."));
        assert!(formatted.contains("No action items detected."));
        assert!(formatted.ends_with("No open questions detected.\n"));
    }
}
