use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Phrases commonly found in spam and phishing mail.
pub const DEFAULT_TRIGGERS: [&str; 30] = [
    "free",
    "100% free",
    "risk-free",
    "guaranteed",
    "winner",
    "you're a winner",
    "congratulations",
    "act now",
    "limited time",
    "limited time offer",
    "urgent",
    "urgent action required",
    "click here",
    "call now",
    "earn cash",
    "make money fast",
    "cash bonus",
    "get paid",
    "financial freedom",
    "work from home",
    "no catch",
    "exclusive deal",
    "free trial",
    "verify your account",
    "account will be closed",
    "password reset",
    "wire transfer",
    "gift card",
    "miracle cure",
    "no prescription needed",
];

/// Ordered, immutable list of trigger phrases.
///
/// Duplicate phrases are dropped on construction (first occurrence wins), so a
/// phrase is counted at most once per scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerList {
    phrases: Vec<String>,
}

impl TriggerList {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = phrase.into();
            if !list.contains(&phrase) {
                list.push(phrase);
            }
        }
        Self { phrases: list }
    }

    /// Parse a trigger file: one phrase per line, `#` starts a comment line,
    /// blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a trigger file from disk. A file with no phrases is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("can't read trigger file {}", path.display()))?;
        let list = Self::parse(&text);
        if list.is_empty() {
            bail!("trigger file {} contains no phrases", path.display());
        }
        Ok(list)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl Default for TriggerList {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGERS)
    }
}
