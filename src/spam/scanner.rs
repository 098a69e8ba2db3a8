use super::triggers::TriggerList;
use regex::{Regex, RegexBuilder};
use std::fmt;
use tracing::{debug, warn};

/// Canonical form used for matching: lower-case, hyphens turned into spaces,
/// whitespace runs collapsed to a single space, ends trimmed.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the phrase matcher for `trigger`.
///
/// The trigger's tokens must appear consecutively, separated by whitespace and
/// bounded by word boundaries, so "free" does not match inside "freely".
/// Returns `None` for a trigger with no tokens.
fn phrase_matcher(trigger: &str) -> Option<Regex> {
    let normalized = normalize(trigger);
    if normalized.is_empty() {
        return None;
    }

    let body = normalized
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let pattern = format!(r"\b{}\b", body);

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(trigger, "can't build matcher: {}", err);
            None
        }
    }
}

/// Number of non-overlapping occurrences of `trigger` in `message`.
pub fn count_occurrences(message: &str, trigger: &str) -> usize {
    match phrase_matcher(trigger) {
        Some(re) => re.find_iter(&normalize(message)).count(),
        None => 0,
    }
}

/// Scan `message` against every trigger in `triggers`.
pub fn scan(message: &str, triggers: &TriggerList) -> ScanResult {
    TriggerScanner::new(triggers.clone()).scan(message)
}

/// Map a score to its likelihood rating.
pub fn rate(score: usize) -> Rating {
    match score {
        0..=2 => Rating::Unlikely,
        3..=6 => Rating::Possible,
        7..=11 => Rating::Likely,
        _ => Rating::VeryLikely,
    }
}

/// Qualitative spam likelihood derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Rating {
    /// Human-readable label, e.g. "Likely spam".
    pub fn label(self) -> &'static str {
        match self {
            Rating::Unlikely => "Unlikely spam",
            Rating::Possible => "Possibly spam (suspicious)",
            Rating::Likely => "Likely spam",
            Rating::VeryLikely => "Very likely spam",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one scan.
///
/// `found` holds only triggers that matched, in trigger-list order, and
/// `score` is always the sum of their counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResult {
    score: usize,
    found: Vec<(String, usize)>,
}

impl ScanResult {
    /// Sum of all trigger counts.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Rating for [`ScanResult::score`].
    pub fn rating(&self) -> Rating {
        rate(self.score)
    }

    /// Matched triggers with their counts, in trigger-list order.
    pub fn found(&self) -> &[(String, usize)] {
        &self.found
    }

    /// Count for `phrase`, or `None` when it did not match.
    pub fn count_of(&self, phrase: &str) -> Option<usize> {
        self.found
            .iter()
            .find(|(p, _)| p == phrase)
            .map(|(_, count)| *count)
    }

    /// Matched triggers by descending count, ties broken by phrase
    /// (case-insensitive, ascending).
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .found
            .iter()
            .map(|(p, count)| (p.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
        });
        ranked
    }
}

struct Matcher {
    phrase: String,
    re: Option<Regex>,
}

/// Scanner bound to a fixed trigger list.
///
/// Matchers are compiled once at construction and reused by every call to
/// [`TriggerScanner::scan`].
pub struct TriggerScanner {
    triggers: TriggerList,
    matchers: Vec<Matcher>,
}

impl TriggerScanner {
    /// Compile a matcher for every trigger in `triggers`.
    pub fn new(triggers: TriggerList) -> Self {
        let matchers = triggers
            .iter()
            .map(|phrase| Matcher {
                phrase: phrase.to_string(),
                re: phrase_matcher(phrase),
            })
            .collect();
        Self { triggers, matchers }
    }

    pub fn triggers(&self) -> &TriggerList {
        &self.triggers
    }

    pub fn scan(&self, message: &str) -> ScanResult {
        let text = normalize(message);
        let mut result = ScanResult::default();

        for matcher in &self.matchers {
            let count = matcher
                .re
                .as_ref()
                .map_or(0, |re| re.find_iter(&text).count());
            if count > 0 {
                debug!(trigger = matcher.phrase.as_str(), count, "trigger matched");
                result.found.push((matcher.phrase.clone(), count));
                result.score += count;
            }
        }

        result
    }
}

impl Default for TriggerScanner {
    fn default() -> Self {
        Self::new(TriggerList::default())
    }
}
