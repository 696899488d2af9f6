use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

lazy_static! {
    static ref SIGNATURE_RE: Regex = Regex::new(r"(?ms)^-- ?\n.*?(\n\n|\z)").unwrap();
    static ref FORWARDED_RE: Regex =
        Regex::new(r"(-{3,}|={3,})\s*Forwarded message\s*(-{3,}|={3,})").unwrap();
    static ref QUOTE_RE: Regex = Regex::new(r"(?m)^(>+[ \t]*)+").unwrap();
    static ref ENTITY_RE: Regex = Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap();
    static ref BLANK_LINES_RE: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"[\w.+-]+@[\w-]+\.[\w.-]+").unwrap();
    static ref DATE_RE: Regex = Regex::new(
        r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2},?\s+\d{4}"
    )
    .unwrap();
}

const PROMPT_HEADER: &str = "
Please analyze the following email thread and return a structured summary with the following format exactly:

SUMMARY:
(Write a concise summary of the email thread in 3-5 sentences)

ACTION ITEMS:
- [OWNER: Name] Task description [DEADLINE: Date if available]

KEY DECISIONS:
- Description of decisions made

QUESTIONS RAISED:
- List of unresolved or raised questions

Email Thread:
-------------
";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailMetadata {
    pub participants: Vec<String>,
    pub timestamps: Vec<String>,
}

/// Strips signatures, forwarding banners, quote markers and HTML entities so the
/// model sees the conversation and little else.
pub fn preprocess_email_thread(email_thread: &str) -> String {
    let cleaned = SIGNATURE_RE.replace_all(email_thread, "$1");
    let cleaned = FORWARDED_RE.replace_all(&cleaned, "");
    let cleaned = QUOTE_RE.replace_all(&cleaned, "");
    let cleaned = decode_entities(&cleaned);
    BLANK_LINES_RE.replace_all(&cleaned, "\n\n").to_string()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };

            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .to_string()
}

pub fn extract_email_metadata(email_thread: &str) -> EmailMetadata {
    let participants: BTreeSet<String> = EMAIL_RE
        .find_iter(email_thread)
        .map(|m| m.as_str().to_string())
        .collect();

    EmailMetadata {
        participants: participants.into_iter().collect(),
        timestamps: DATE_RE
            .find_iter(email_thread)
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

pub fn generate_structured_prompt(email_thread: &str) -> String {
    let metadata = extract_email_metadata(email_thread);

    let mut prompt = PROMPT_HEADER.to_string();
    prompt.push_str(email_thread);

    if !metadata.participants.is_empty() {
        prompt.push_str(&format!(
            "\n\nParticipants: {}",
            metadata.participants.join(", ")
        ));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_removes_signature_block() {
        let thread = "Hi all,\nShip it.\n-- \nJohn Smith\nACME Corp\n\nNext message";
        assert_eq!(
            preprocess_email_thread(thread),
            "Hi all,\nShip it.\n\nNext message"
        );
    }

    #[test]
    fn test_preprocess_keeps_separator_lines() {
        let thread = "Thanks,\nJohn\n\n---\n\nFrom: jane@example.com";
        assert_eq!(preprocess_email_thread(thread), thread);
    }

    #[test]
    fn test_preprocess_removes_forward_banner_and_quotes() {
        let thread = "---------- Forwarded message ----------\n> > quoted line\n>reply";
        assert_eq!(preprocess_email_thread(thread), "\nquoted line\nreply");
    }

    #[test]
    fn test_preprocess_decodes_entities_and_collapses_blank_lines() {
        let thread = "A &amp; B &lt;ok&gt; &#39;x&#x27;\n\n\n\nend &bogus;";
        assert_eq!(
            preprocess_email_thread(thread),
            "A & B <ok> 'x'\n\nend &bogus;"
        );
    }

    #[test]
    fn test_extract_metadata() {
        let thread = "From: john@example.com\nTo: team@example.com\nDate: Mar 3, 2024\n\
                      From: john@example.com\nSent Apr 12 2024";
        let metadata = extract_email_metadata(thread);
        assert_eq!(
            metadata.participants,
            vec!["john@example.com", "team@example.com"]
        );
        assert_eq!(metadata.timestamps, vec!["Mar 3, 2024", "Apr 12 2024"]);
    }

    #[test]
    fn test_prompt_lists_participants() {
        let prompt = generate_structured_prompt("From: jane@example.com\nHello");
        assert!(prompt.contains("QUESTIONS RAISED:"));
        assert!(prompt.contains("From: jane@example.com\nHello"));
        assert!(prompt.ends_with("\n\nParticipants: jane@example.com"));
    }

    #[test]
    fn test_prompt_without_participants() {
        let prompt = generate_structured_prompt("no addresses here");
        assert!(prompt.ends_with("no addresses here"));
    }
}
