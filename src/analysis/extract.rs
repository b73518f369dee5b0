//! Best-effort extraction of numbered lists from the free-text feedback
//! summary. The summary is prose produced by an LLM, so any of the markers
//! may be missing.

use once_cell::sync::Lazy;
use regex::Regex;

pub const STRENGTHS_MARKER: &str = "**Strengths:**";
pub const IMPROVEMENTS_MARKER: &str = "**Areas for Improvement:**";
pub const PATTERNS_MARKER: &str = "**Patterns Observed:**";

const MARKERS: [&str; 3] = [STRENGTHS_MARKER, IMPROVEMENTS_MARKER, PATTERNS_MARKER];

/// `None` means the section marker was not found, which is distinct from a
/// section that was found but held no numbered items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackSections {
    pub strengths: Option<Vec<String>>,
    pub areas_for_improvement: Option<Vec<String>>,
}

impl FeedbackSections {
    pub fn parse(summary: &str) -> Self {
        Self {
            strengths: extract_section(summary, STRENGTHS_MARKER),
            areas_for_improvement: extract_section(summary, IMPROVEMENTS_MARKER),
        }
    }

    /// Neither section marker was present
    pub fn is_unmatched(&self) -> bool {
        self.strengths.is_none() && self.areas_for_improvement.is_none()
    }
}

/// Numbered items between `marker` and the next known marker (or end of text)
pub fn extract_section(text: &str, marker: &str) -> Option<Vec<String>> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];

    let end = MARKERS
        .iter()
        .filter(|m| **m != marker)
        .filter_map(|m| rest.find(m))
        .min()
        .unwrap_or(rest.len());

    let items = rest[..end]
        .lines()
        .filter_map(numbered_item)
        .map(strip_bold)
        .filter(|item| !item.is_empty())
        .collect();

    Some(items)
}

/// `<n>. item`
static NUMBERED_ITEM: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s+(.*?)\s*$").ok());

/// `**Label:** detail`, `**Item**` or an unclosed `**Item`
static BOLD_LEAD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\*\*(.*?)(?:\*\*(.*))?$").ok());

/// Body of a `<n>. item` line
fn numbered_item(line: &str) -> Option<&str> {
    let captures = NUMBERED_ITEM.as_ref()?.captures(line)?;
    captures.get(1).map(|m| m.as_str())
}

/// `**Label:** detail` -> `Label: detail`, `**Item**` -> `Item`
fn strip_bold(item: &str) -> String {
    let Some(captures) = BOLD_LEAD.as_ref().and_then(|re| re.captures(item)) else {
        return item.to_string();
    };

    let label = captures.get(1).map_or("", |m| m.as_str());
    let detail = captures.get(2).map_or("", |m| m.as_str());
    format!("{}{}", label, detail).trim().to_string()
}
