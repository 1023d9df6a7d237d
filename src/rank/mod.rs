//! Relevance ranking and extractive summarization.
//!
//! Everything here is a pure function of its inputs. The TF-IDF model is fit
//! fresh on every call over the query and the items being ranked.

mod summarize;
mod tfidf;

pub use summarize::{split_sentences, Summarizer, DEFAULT_MAX_CHARS};
pub use tfidf::{dot, fit_and_score, tokenize, SparseVector, TfidfModel};

/// Ranks texts by TF-IDF similarity to a query.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker;

impl RelevanceRanker {
    /// Rank `items` against `query`.
    ///
    /// Returns `(index, score)` pairs, best first. Equal scores keep their
    /// original order.
    pub fn rank<S: AsRef<str>>(query: &str, items: &[S]) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> =
            fit_and_score(query, items).into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Indices of the `k` best items, best first.
    pub fn top_k<S: AsRef<str>>(query: &str, items: &[S], k: usize) -> Vec<usize> {
        Self::rank(query, items)
            .into_iter()
            .take(k)
            .map(|(index, _)| index)
            .collect()
    }
}
