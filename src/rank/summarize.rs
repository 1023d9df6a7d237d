//! Extractive summaries built from the most relevant sentences.

use std::sync::OnceLock;

use regex::Regex;

use super::RelevanceRanker;

/// Default summary budget in characters.
pub const DEFAULT_MAX_CHARS: usize = 600;

/// Sentences must be longer than this many characters to be considered.
const MIN_SENTENCE_CHARS: usize = 10;

fn boundary_regex() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").expect("boundary pattern is valid"))
}

/// Split text after `.`, `!` or `?` followed by whitespace.
///
/// The punctuation stays with its sentence; fragments are trimmed and those of
/// `MIN_SENTENCE_CHARS` characters or fewer are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary_regex().find_iter(text) {
        // The punctuation marks are all one byte long
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// Greedy extractive summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summarizer {
    max_chars: usize,
}

impl Summarizer {
    /// Create a summarizer with a character budget.
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// The character budget.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Summarize `body` for `query`.
    ///
    /// Sentences are taken in relevance order and joined with single spaces.
    /// Filling stops at the first sentence that would exceed the budget, even
    /// if a shorter, lower-ranked one would still fit.
    pub fn summarize(&self, body: &str, query: &str) -> String {
        if self.max_chars == 0 {
            return String::new();
        }

        let sentences = split_sentences(body);
        if sentences.is_empty() {
            return String::new();
        }

        let mut summary = String::new();
        let mut length = 0;
        for (index, _) in RelevanceRanker::rank(query, &sentences) {
            let sentence = sentences[index];
            let separator = usize::from(!summary.is_empty());
            let added = separator + sentence.chars().count();
            if length + added > self.max_chars {
                break;
            }
            if separator == 1 {
                summary.push(' ');
            }
            summary.push_str(sentence);
            length += added;
        }

        summary
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let text = "First sentence is here. Second one asks why? Third shouts loudly!  Tail text without stop";
        assert_eq!(
            split_sentences(text),
            vec![
                "First sentence is here.",
                "Second one asks why?",
                "Third shouts loudly!",
                "Tail text without stop"
            ]
        );
    }

    #[test]
    fn test_split_keeps_inner_punctuation() {
        // No whitespace after the dot, so no split
        assert_eq!(
            split_sentences("Version 1.2 shipped on time. Done deal here."),
            vec!["Version 1.2 shipped on time.", "Done deal here."]
        );
    }

    #[test]
    fn test_split_drops_short_fragments() {
        assert_eq!(
            split_sentences("Yes. No. Tiny one. This one is long enough."),
            vec!["This one is long enough."]
        );
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("Short.").is_empty());
    }

    #[test]
    fn test_single_sentence_summarizes_to_itself() {
        let body = "Nice offers beaches and old town walks.";
        assert_eq!(Summarizer::default().summarize(body, "beaches"), body);
    }

    #[test]
    fn test_zero_budget_and_no_sentences() {
        let body = "Nice offers beaches and old town walks.";
        assert_eq!(Summarizer::new(0).summarize(body, "beaches"), "");
        assert_eq!(Summarizer::default().summarize("tiny. bits.", "beaches"), "");
    }

    #[test]
    fn test_most_relevant_sentence_first() {
        let body = "The museum opens at nine every morning. \
                    Beaches in Nice are pebbly but beautiful. \
                    Parking downtown is expensive on weekends.";
        let summary = Summarizer::default().summarize(body, "beaches in nice");
        assert!(summary.starts_with("Beaches in Nice are pebbly but beautiful."));
        assert_eq!(summary.split(". ").count(), 3);
    }

    #[test]
    fn test_budget_is_respected() {
        let body = "Alpha sentence with several words in it. \
                    Beta sentence with several words in it too. \
                    Gamma sentence also with several words here.";
        for budget in [0, 10, 40, 41, 60, 85, 86, 200] {
            let summary = Summarizer::new(budget).summarize(body, "sentence words");
            assert!(summary.chars().count() <= budget, "budget {}", budget);
        }
    }

    #[test]
    fn test_stops_at_first_sentence_that_does_not_fit() {
        // The long top-ranked sentence does not fit, so nothing is emitted
        // even though the short one would.
        let body = "Hiking trails hiking trails hiking trails hiking trails everywhere. \
                    Some cafes nearby.";
        let summary = Summarizer::new(30).summarize(body, "hiking trails");
        assert_eq!(summary, "");
    }
}
