//! Affinity computation.
//!
//! Converts two collections of token sequences into a dense pairwise
//! similarity matrix, and composes several such matrices (topic,
//! location, attendance mode) into one score per pair.
//!
//! # Pipeline
//!
//! ```text
//! left ⊕ right tokens → term weighting → joint projection → L2 rows → dot products
//! ```
//!
//! The weighting and the projection are fit on the union of both sides so
//! that left and right profiles land in one shared space.
//!
//! # References
//! - Salton & Buckley (1988), "Term-weighting approaches in automatic text retrieval"
//! - Deerwester et al. (1990), "Indexing by latent semantic analysis"

mod projection;
mod weighting;

pub use projection::Projection;
pub use weighting::Weighting;

use serde::{Deserialize, Serialize};

use crate::error::{InsufficientData, MatchResult};
use crate::models::{AffinityMatrix, Attendance};
use crate::profile::TokenSequence;
use projection::{dot, project};
use weighting::{l2_normalize, weigh_corpus, WeightingOptions};

/// Parameters of one affinity computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityParams {
    /// Number of projected dimensions (upper bound; fewer are used when
    /// the corpus has lower rank).
    pub target_dims: usize,
    /// Terms in fewer documents than this are dropped.
    pub min_doc_freq: usize,
    /// Terms in more than this fraction of documents are dropped.
    pub max_doc_freq_fraction: f64,
    /// Term weighting scheme.
    pub weighting: Weighting,
    /// Dimensionality reduction.
    pub projection: Projection,
    /// Longest n-gram counted as a term.
    pub ngram_max: usize,
}

impl AffinityParams {
    /// Topic defaults: 10 principal components, df in [2, 0.8·n], uni+bigrams.
    pub fn topic() -> Self {
        Self {
            target_dims: 10,
            min_doc_freq: 2,
            max_doc_freq_fraction: 0.8,
            weighting: Weighting::Tfidf,
            projection: Projection::Pca,
            ngram_max: 2,
        }
    }

    /// Short categorical text (locations, attendance answers): 2 components.
    pub fn categorical() -> Self {
        Self {
            target_dims: 2,
            ngram_max: 1,
            ..Self::topic()
        }
    }

    /// Sets the target dimensionality.
    pub fn with_target_dims(mut self, dims: usize) -> Self {
        self.target_dims = dims;
        self
    }

    /// Sets the document-frequency cutoffs.
    pub fn with_doc_freq(mut self, min_doc_freq: usize, max_doc_freq_fraction: f64) -> Self {
        self.min_doc_freq = min_doc_freq;
        self.max_doc_freq_fraction = max_doc_freq_fraction;
        self
    }

    /// Sets the weighting scheme.
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Sets the projection.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the longest n-gram.
    pub fn with_ngram_max(mut self, n: usize) -> Self {
        self.ngram_max = n;
        self
    }
}

impl Default for AffinityParams {
    fn default() -> Self {
        Self::topic()
    }
}

/// Pairwise similarity between two profile collections.
///
/// # Example
///
/// ```
/// use u_match::affinity::{AffinityEngine, AffinityParams, Projection};
/// use u_match::profile::ProfileVectorizer;
///
/// let v = ProfileVectorizer::new();
/// let left = vec![v.vectorize_text("vision cortex"), v.vectorize_text("language syntax")];
/// let right = vec![
///     v.vectorize_text("cortex vision"),
///     v.vectorize_text("syntax language"),
///     v.vectorize_text("vision syntax"),
/// ];
/// let engine = AffinityEngine::new(
///     AffinityParams::topic().with_ngram_max(1).with_projection(Projection::None),
/// );
/// let a = engine.compute(&left, &right).unwrap();
/// assert_eq!(a.shape(), (2, 3));
/// assert!(a.get(0, 0) > a.get(0, 1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AffinityEngine {
    params: AffinityParams,
}

impl AffinityEngine {
    /// Creates an engine.
    pub fn new(params: AffinityParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &AffinityParams {
        &self.params
    }

    /// Computes the (|left|, |right|) cosine-similarity matrix.
    ///
    /// # Errors
    /// - `InsufficientData::TooFewEntities` when a side has fewer than two
    ///   profiles.
    /// - `InsufficientData::EmptyVocabulary` when frequency filtering
    ///   removes every term.
    ///
    /// A profile left with no terms scores 0 against everyone.
    pub fn compute(
        &self,
        left: &[TokenSequence],
        right: &[TokenSequence],
    ) -> MatchResult<AffinityMatrix> {
        check_side("left", left.len())?;
        check_side("right", right.len())?;

        let docs: Vec<&TokenSequence> = left.iter().chain(right.iter()).collect();
        let corpus = weigh_corpus(
            &docs,
            WeightingOptions {
                weighting: self.params.weighting,
                min_doc_freq: self.params.min_doc_freq,
                max_doc_freq_fraction: self.params.max_doc_freq_fraction,
                ngram_max: self.params.ngram_max,
            },
        )?;

        // Documents without a surviving term carry no topic signal; centering
        // would otherwise give them the negated corpus mean.
        let blank: Vec<bool> = corpus
            .rows
            .iter()
            .map(|row| row.iter().all(|&w| w == 0.0))
            .collect();

        let mut vectors = match self.params.projection {
            Projection::None => corpus.rows,
            Projection::Pca | Projection::Svd => {
                let center = self.params.projection == Projection::Pca;
                let projected = project(&corpus.rows, self.params.target_dims, center);
                if projected.first().is_some_and(|z| z.is_empty()) {
                    tracing::warn!(
                        projection = ?self.params.projection,
                        "corpus has no usable axes; comparing weighted terms directly"
                    );
                    corpus.rows
                } else {
                    projected
                }
            }
        };
        for (v, &empty) in vectors.iter_mut().zip(&blank) {
            if empty {
                v.iter_mut().for_each(|x| *x = 0.0);
            } else {
                l2_normalize(v);
            }
        }

        let (left_vecs, right_vecs) = vectors.split_at(left.len());
        let rows: Vec<Vec<f64>> = left_vecs
            .iter()
            .map(|l| right_vecs.iter().map(|r| dot(l, r)).collect())
            .collect();
        let matrix = AffinityMatrix::from_rows(rows)?;

        tracing::debug!(
            rows = left.len(),
            cols = right.len(),
            vocabulary = corpus.vocabulary.len(),
            "affinity matrix computed"
        );
        Ok(matrix)
    }
}

fn check_side(side: &'static str, count: usize) -> MatchResult<()> {
    if count < 2 {
        return Err(InsufficientData::TooFewEntities { side, count }.into());
    }
    Ok(())
}

/// Weighted sum `base + Σ wᵢ · Aᵢ`.
///
/// Every part must share the base's shape.
///
/// # Example
///
/// ```
/// use u_match::affinity::compose;
/// use u_match::models::AffinityMatrix;
///
/// let topic = AffinityMatrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
/// let location = AffinityMatrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
/// let total = compose(topic, &[(0.5, &location)]).unwrap();
/// assert_eq!(total.row(0), &[1.0, 0.5]);
/// ```
pub fn compose(
    base: AffinityMatrix,
    parts: &[(f64, &AffinityMatrix)],
) -> MatchResult<AffinityMatrix> {
    let mut total = base;
    for &(weight, part) in parts {
        total.add_weighted(part, weight)?;
    }
    Ok(total)
}

/// Attendance compatibility: 1.0 when both sides attend the same way,
/// 0.0 otherwise or when either side is unknown.
pub fn modality_affinity(
    left: &[Option<Attendance>],
    right: &[Option<Attendance>],
) -> AffinityMatrix {
    let mut m = AffinityMatrix::zeros(left.len(), right.len());
    for (i, l) in left.iter().enumerate() {
        for (j, r) in right.iter().enumerate() {
            if let (Some(a), Some(b)) = (l, r) {
                if a == b {
                    m.set(i, j, 1.0);
                }
            }
        }
    }
    m
}
