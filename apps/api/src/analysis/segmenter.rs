//! Section Segmenter: splits résumé text into labeled sections by heading detection.
//!
//! The scan is an explicit state machine (`SegmentState`): the state is the
//! currently active section plus every section's accumulated lines, and the only
//! transition is a heading-keyword match on a line.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Heading keywords, lower-case, in the order résumés usually present them.
pub const DEFAULT_HEADINGS: &[&str] = &[
    "summary",
    "objective",
    "experience",
    "work history",
    "skills",
    "education",
    "certifications",
    "projects",
];

pub const DEFAULT_LABEL: &str = "Summary";

/// What happens when a heading is seen again later in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Keep the earlier content and continue accumulating after it.
    #[default]
    Append,
    /// Discard the earlier content and start the section over.
    Reset,
}

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    headings: Vec<String>,
    default_label: String,
    on_repeat: RepeatPolicy,
}

impl SegmenterConfig {
    /// Headings are lower-cased and blanks are dropped so that every keyword
    /// is a non-empty case-insensitive needle.
    pub fn new<I, S>(
        headings: I,
        default_label: impl Into<String>,
        on_repeat: RepeatPolicy,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headings = headings
            .into_iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self {
            headings,
            default_label: default_label.into(),
            on_repeat,
        }
    }

    pub fn english() -> Self {
        Self::new(DEFAULT_HEADINGS.iter(), DEFAULT_LABEL, RepeatPolicy::default())
    }

    pub fn with_repeat_policy(mut self, on_repeat: RepeatPolicy) -> Self {
        self.on_repeat = on_repeat;
        self
    }

}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    pub body: String,
}

/// Finds the heading keyword a line switches to, if any.
///
/// Matching is a case-insensitive substring test. When several keywords occur
/// on one line, the one starting earliest wins; at equal positions the longer
/// keyword wins.
pub fn detect_heading<'a>(line: &str, headings: &'a [String]) -> Option<&'a str> {
    let lowered = line.to_lowercase();
    headings
        .iter()
        .filter_map(|heading| lowered.find(heading.as_str()).map(|pos| (pos, heading)))
        .min_by(|(pos_a, a), (pos_b, b)| pos_a.cmp(pos_b).then(b.len().cmp(&a.len())))
        .map(|(_, heading)| heading.as_str())
}

/// `"work history"` → `"Work History"`.
pub fn title_case(keyword: &str) -> String {
    keyword
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scan state: the active section and each section's lines, in creation order.
#[derive(Debug, Clone)]
pub struct SegmentState {
    sections: Vec<(String, Vec<String>)>,
    current: usize,
}

impl SegmentState {
    pub fn new(default_label: &str) -> Self {
        Self {
            sections: vec![(default_label.to_string(), Vec::new())],
            current: 0,
        }
    }

    /// Advances the machine by one line. Heading lines switch the active
    /// section and contribute no body text.
    pub fn feed_line(&mut self, line: &str, config: &SegmenterConfig) {
        if let Some(heading) = detect_heading(line, &config.headings) {
            self.switch_to(title_case(heading), config.on_repeat);
            return;
        }

        let cleaned = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !cleaned.is_empty() {
            self.sections[self.current].1.push(cleaned);
        }
    }

    fn switch_to(&mut self, label: String, on_repeat: RepeatPolicy) {
        match self.sections.iter().position(|(existing, _)| *existing == label) {
            Some(index) => {
                if on_repeat == RepeatPolicy::Reset {
                    self.sections[index].1.clear();
                }
                self.current = index;
            }
            None => {
                self.sections.push((label, Vec::new()));
                self.current = self.sections.len() - 1;
            }
        }
    }

    pub fn finish(self) -> Vec<Section> {
        self.sections
            .into_iter()
            .map(|(label, lines)| Section {
                label,
                body: lines.join(" "),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn english() -> Self {
        Self::new(SegmenterConfig::english())
    }

    /// Splits résumé text into sections. The leading default section is always
    /// present, even when empty; empty input yields exactly that one section.
    pub fn segment(&self, text: &str) -> Vec<Section> {
        let mut state = SegmentState::new(&self.config.default_label);
        for line in text.lines() {
            state.feed_line(line, &self.config);
        }
        let sections = state.finish();
        debug!(sections = sections.len(), "segmented resume");
        sections
    }
}
