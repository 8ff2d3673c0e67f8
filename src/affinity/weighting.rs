//! Term weighting over a joint corpus.
//!
//! # Algorithm
//!
//! 1. Extract terms: every unigram plus every n-gram up to `ngram_max`,
//!    n-gram tokens joined by a single space.
//! 2. Count document frequency over the whole corpus (left + right).
//! 3. Keep terms with `min_doc_freq ≤ df ≤ max_doc_freq_fraction · n`.
//! 4. Weight each kept term:
//!    - `Tfidf`: `(1 + ln tf) · (ln((1 + n) / (1 + df)) + 1)`
//!    - `Count`: `tf`
//! 5. L2-normalize every document row.
//!
//! # Reference
//! Salton & Buckley (1988), "Term-weighting approaches in automatic text
//! retrieval"

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{InsufficientData, MatchResult};
use crate::profile::TokenSequence;

/// Term-importance weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Sublinear term frequency × smoothed inverse document frequency.
    Tfidf,
    /// Raw term counts.
    Count,
}

/// Weighted document-term matrix.
#[derive(Debug, Clone)]
pub(crate) struct WeightedCorpus {
    /// Kept terms, sorted.
    pub vocabulary: Vec<String>,
    /// One L2-normalized row per document, `vocabulary.len()` wide.
    pub rows: Vec<Vec<f64>>,
}

/// Frequency cutoffs and weighting options.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeightingOptions {
    pub weighting: Weighting,
    pub min_doc_freq: usize,
    pub max_doc_freq_fraction: f64,
    pub ngram_max: usize,
}

pub(crate) fn weigh_corpus(
    docs: &[&TokenSequence],
    opts: WeightingOptions,
) -> MatchResult<WeightedCorpus> {
    let n_docs = docs.len();
    let term_counts: Vec<BTreeMap<String, usize>> =
        docs.iter().map(|d| count_terms(d, opts.ngram_max)).collect();

    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for counts in &term_counts {
        for term in counts.keys() {
            *doc_freq.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let max_df = opts.max_doc_freq_fraction * n_docs as f64;
    let vocabulary: Vec<String> = doc_freq
        .iter()
        .filter(|(_, &df)| df >= opts.min_doc_freq && df as f64 <= max_df)
        .map(|(term, _)| term.to_string())
        .collect();

    tracing::debug!(
        documents = n_docs,
        candidate_terms = doc_freq.len(),
        kept_terms = vocabulary.len(),
        "term vocabulary filtered"
    );

    if vocabulary.is_empty() {
        return Err(InsufficientData::EmptyVocabulary { documents: n_docs }.into());
    }

    let idf: Vec<f64> = vocabulary
        .iter()
        .map(|term| {
            let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
            ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let rows = term_counts
        .iter()
        .map(|counts| {
            let mut row: Vec<f64> = vocabulary
                .iter()
                .zip(&idf)
                .map(|(term, &idf)| {
                    let tf = counts.get(term).copied().unwrap_or(0) as f64;
                    if tf == 0.0 {
                        return 0.0;
                    }
                    match opts.weighting {
                        Weighting::Tfidf => (1.0 + tf.ln()) * idf,
                        Weighting::Count => tf,
                    }
                })
                .collect();
            l2_normalize(&mut row);
            row
        })
        .collect();

    Ok(WeightedCorpus { vocabulary, rows })
}

fn count_terms(tokens: &TokenSequence, ngram_max: usize) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for n in 1..=ngram_max.max(1) {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

/// Scales `row` to unit length. Zero rows are left untouched.
pub(crate) fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    fn toks(s: &str) -> TokenSequence {
        s.split_whitespace().map(String::from).collect()
    }

    fn opts(min_df: usize, max_frac: f64) -> WeightingOptions {
        WeightingOptions {
            weighting: Weighting::Tfidf,
            min_doc_freq: min_df,
            max_doc_freq_fraction: max_frac,
            ngram_max: 1,
        }
    }

    #[test]
    fn test_frequency_cutoffs() {
        let docs = [
            toks("common rare1 shared"),
            toks("common shared"),
            toks("common other"),
        ];
        let refs: Vec<_> = docs.iter().collect();
        let corpus = weigh_corpus(&refs, opts(2, 0.8)).unwrap();
        // "common" appears in 3/3 > 0.8, rare1/other appear once.
        assert_eq!(corpus.vocabulary, vec!["shared".to_string()]);
    }

    #[test]
    fn test_rows_are_unit_or_zero() {
        let docs = [toks("alpha beta"), toks("alpha gamma"), toks("beta gamma")];
        let refs: Vec<_> = docs.iter().collect();
        let corpus = weigh_corpus(&refs, opts(1, 1.0)).unwrap();
        for row in &corpus.rows {
            let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_vocabulary_is_signalled() {
        let docs = [toks("one"), toks("two"), toks("three")];
        let refs: Vec<_> = docs.iter().collect();
        let err = weigh_corpus(&refs, opts(2, 0.8)).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InsufficientData(InsufficientData::EmptyVocabulary { documents: 3 })
        ));
    }

    #[test]
    fn test_bigrams_counted() {
        let counts = count_terms(&toks("machine learning models"), 2);
        assert_eq!(counts.get("machine learning"), Some(&1));
        assert_eq!(counts.get("learning models"), Some(&1));
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_sublinear_tf() {
        let docs = [toks("brain brain brain memory"), toks("brain memory")];
        let refs: Vec<_> = docs.iter().collect();
        let corpus = weigh_corpus(&refs, opts(1, 1.0)).unwrap();
        // Both terms share df, so the ratio is (1 + ln 3) : 1.
        let row = &corpus.rows[0];
        let ratio = row[0] / row[1];
        assert!((ratio - (1.0 + 3f64.ln())).abs() < 1e-9);
    }
}
