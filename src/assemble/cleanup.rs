//! Ordered cleanup rules for raw question spans.
//!
//! A raw span still carries option lines, answer keys, section headers and
//! embedded newlines. The pipeline removes them in one deterministic
//! left-to-right pass over an explicit rule list.

use regex::Regex;

/// How much text a matched rule removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// Remove only the matched text.
    MatchOnly,

    /// Remove the match and the rest of its line.
    ToLineEnd,
}

/// One cleanup rule: a matcher plus a truncation policy.
#[derive(Debug)]
pub struct CleanupRule {
    name: &'static str,
    regex: Regex,
    truncation: Truncation,
}

impl CleanupRule {
    /// Build a rule.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression.
    pub fn new(name: &'static str, pattern: &str, truncation: Truncation) -> Self {
        let regex = match truncation {
            // `.` stops at line ends, extending the cut to the end of line.
            Truncation::ToLineEnd => Regex::new(&format!("(?:{pattern}).*")).unwrap(),
            Truncation::MatchOnly => Regex::new(pattern).unwrap(),
        };
        Self {
            name,
            regex,
            truncation,
        }
    }

    /// Rule name, for introspection and logs.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The rule's truncation policy.
    pub fn truncation(&self) -> Truncation {
        self.truncation
    }

    /// Next non-empty match of this rule in `text`, as absolute offsets.
    fn find(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        self.regex
            .find(&text[from..])
            .filter(|m| m.end() > m.start())
            .map(|m| (from + m.start(), from + m.end()))
    }
}

/// The scrub applied to each raw question span.
///
/// Scans once, left to right: at the earliest position where any rule
/// matches, the longest match wins and earlier rules break exact ties.
/// The matched text is dropped and scanning resumes after it.
pub struct CleanupPipeline {
    rules: Vec<CleanupRule>,
}

impl CleanupPipeline {
    /// Pipeline with the standard rule list, in removal order.
    pub fn new() -> Self {
        Self::with_rules(vec![
            CleanupRule::new("answer-key", r"Ans\s*\[[A-D]\]", Truncation::MatchOnly),
            CleanupRule::new("option-tail", r"\[[A-D]\]", Truncation::ToLineEnd),
            CleanupRule::new("answer-tail", r"Ans", Truncation::ToLineEnd),
            CleanupRule::new("section-header", r"SECTION", Truncation::ToLineEnd),
            CleanupRule::new("blank-line-tail", r"\n\n", Truncation::ToLineEnd),
            CleanupRule::new("newline", r"\n", Truncation::MatchOnly),
        ])
    }

    /// Pipeline with a custom rule list.
    pub fn with_rules(rules: Vec<CleanupRule>) -> Self {
        Self { rules }
    }

    /// The rules, in application order.
    pub fn rules(&self) -> &[CleanupRule] {
        &self.rules
    }

    /// Clean a raw span and trim the remainder.
    pub fn clean(&self, raw: &str) -> String {
        let mut out = String::new();
        let mut pos = 0;

        while pos < raw.len() {
            match self.next_match(raw, pos) {
                Some((start, end)) => {
                    out.push_str(&raw[pos..start]);
                    pos = end;
                }
                None => {
                    out.push_str(&raw[pos..]);
                    break;
                }
            }
        }

        out.trim().to_string()
    }

    fn next_match(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for rule in &self.rules {
            if let Some(span) = rule.find(text, from) {
                best = match best {
                    None => Some(span),
                    Some(current) if span.0 < current.0 => Some(span),
                    Some(current) if span.0 == current.0 && span.1 > current.1 => Some(span),
                    Some(current) => Some(current),
                };
            }
        }
        best
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new()
    }
}
