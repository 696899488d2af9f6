use serde::Serialize;

use crate::notice::Notice;
use crate::sections::{parse, section_lines, SectionKind, SectionedSummary};

/// One block of the results view: the prose of the summary, or the cleaned list
/// entries of the other sections.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SectionView {
    #[serde(skip)]
    pub kind: SectionKind,
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl SectionView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn empty_message(&self) -> &'static str {
        self.kind.empty_message()
    }
}

/// The results screen, built from the summary text handed over by the submit step.
#[derive(Clone, Debug)]
pub struct ResultsView {
    sections: SectionedSummary,
}

impl ResultsView {
    pub fn from_state(summary_text: Option<&str>) -> Result<Self, Notice> {
        match summary_text {
            Some(text) if !text.trim().is_empty() => {
                let sections = parse(text);
                log::debug!("parsed summary: {sections:?}");
                Ok(ResultsView { sections })
            }
            _ => {
                log::warn!("results requested without summary state");
                Err(Notice::missing_summary())
            }
        }
    }

    pub fn sectioned(&self) -> &SectionedSummary {
        &self.sections
    }

    /// The untouched section text, as copied to the clipboard in a browser.
    pub fn raw(&self, kind: SectionKind) -> &str {
        self.sections.get(kind)
    }

    pub fn sections(&self) -> Vec<SectionView> {
        SectionKind::ALL
            .iter()
            .map(|&kind| {
                let text = self.sections.get(kind);
                let lines = match kind {
                    SectionKind::Summary if text.is_empty() => vec![],
                    SectionKind::Summary => vec![text.to_string()],
                    _ => section_lines(text),
                };
                SectionView {
                    kind,
                    title: kind.title(),
                    lines,
                }
            })
            .collect()
    }
}
