//! TF-IDF vector space.
//!
//! Vectors use raw term counts weighted by smoothed inverse document
//! frequency, `ln((1 + n) / (1 + df)) + 1`, and are L2-normalized, so the dot
//! product of two vectors is their cosine similarity.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

/// Sparse vector: vocabulary index to weight, sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Lowercase `text` and split it into tokens of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_regex()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A vocabulary with document frequencies, fit over a set of texts.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Fit vocabulary and IDF weights over `texts`.
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let mut seen: Vec<String> = tokenize(text.as_ref());
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = texts.len() as f64;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (term, df)) in document_frequency.into_iter().enumerate() {
            vocabulary.insert(term, index);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    /// Number of distinct terms.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// IDF weight of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }

    /// Vectorize `text`. Terms outside the vocabulary are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

/// Dot product of two index-sorted sparse vectors.
pub fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Score every corpus item against `query`.
///
/// The model is fit over the query followed by the corpus, so query terms
/// count towards document frequencies. Returns one score per corpus item, in
/// corpus order; an empty vocabulary scores everything zero.
pub fn fit_and_score<S: AsRef<str>>(query: &str, corpus: &[S]) -> Vec<f64> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let mut texts: Vec<&str> = Vec::with_capacity(corpus.len() + 1);
    texts.push(query);
    texts.extend(corpus.iter().map(|s| s.as_ref()));

    let model = TfidfModel::fit(&texts);
    let query_vector = model.transform(query);

    corpus
        .iter()
        .map(|item| dot(&model.transform(item.as_ref()), &query_vector))
        .collect()
}
