//! Profile vectorization.
//!
//! Turns an entity's raw text fields into a normalized token sequence
//! ready for term weighting.
//!
//! # Normalization
//!
//! 1. Concatenate fields in caller order. A missing field contributes
//!    nothing. A field passed twice is tokenized twice, so it counts double
//!    in term frequency.
//! 2. Lowercase.
//! 3. Treat every non-alphanumeric character as a separator (this also
//!    splits the `;`- and `,`-joined multi-select answers of survey forms).
//! 4. Drop single-character tokens and, optionally, English stop words.
//!
//! # Reference
//! Manning, Raghavan & Schütze (2008), "Introduction to Information
//! Retrieval", Ch. 2.2 (Determining the vocabulary of terms)

mod attributes;
mod stopwords;

pub use attributes::{parse_utc_offset, SeniorityLevels};

use serde::{Deserialize, Serialize};

/// Normalized tokens of one profile.
pub type TokenSequence = Vec<String>;

/// Text-to-token normalizer.
///
/// # Example
///
/// ```
/// use u_match::profile::ProfileVectorizer;
///
/// let v = ProfileVectorizer::new();
/// let tokens = v.vectorize(&[Some("Deep Learning; Vision"), None, Some("the Brain")]);
/// assert_eq!(tokens, vec!["deep", "learning", "vision", "brain"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileVectorizer {
    /// Drop English stop words.
    pub remove_stop_words: bool,
    /// Minimum token length in characters.
    pub min_token_len: usize,
}

impl ProfileVectorizer {
    /// Creates a vectorizer with stop-word removal and a two-character minimum.
    pub fn new() -> Self {
        Self {
            remove_stop_words: true,
            min_token_len: 2,
        }
    }

    /// Keeps stop words.
    pub fn keep_stop_words(mut self) -> Self {
        self.remove_stop_words = false;
        self
    }

    /// Normalizes ordered fields into one token sequence.
    pub fn vectorize(&self, fields: &[Option<&str>]) -> TokenSequence {
        let mut tokens = Vec::new();
        for field in fields.iter().flatten() {
            self.tokenize_into(field, &mut tokens);
        }
        tokens
    }

    /// Normalizes a single string.
    pub fn vectorize_text(&self, text: &str) -> TokenSequence {
        let mut tokens = Vec::new();
        self.tokenize_into(text, &mut tokens);
        tokens
    }

    fn tokenize_into(&self, text: &str, out: &mut TokenSequence) {
        let lowered = text.to_lowercase();
        for raw in lowered.split(|c: char| !c.is_alphanumeric()) {
            if raw.chars().count() < self.min_token_len {
                continue;
            }
            if self.remove_stop_words && stopwords::is_stop_word(raw) {
                continue;
            }
            out.push(raw.to_string());
        }
    }
}

impl Default for ProfileVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_contribute_nothing() {
        let v = ProfileVectorizer::new();
        assert!(v.vectorize(&[None, None]).is_empty());
        assert!(v.vectorize(&[]).is_empty());
    }

    #[test]
    fn test_repeated_field_counts_twice() {
        let v = ProfileVectorizer::new();
        let tokens = v.vectorize(&[Some("memory"), Some("memory"), Some("attention")]);
        assert_eq!(tokens.iter().filter(|t| *t == "memory").count(), 2);
    }

    #[test]
    fn test_punctuation_and_case() {
        let v = ProfileVectorizer::new();
        let tokens = v.vectorize(&[Some("Health:Sleep;Mental-Health,CAREER")]);
        assert_eq!(tokens, vec!["health", "sleep", "mental", "health", "career"]);
    }

    #[test]
    fn test_stop_words_optional() {
        let text = "learning of the brain";
        assert_eq!(
            ProfileVectorizer::new().vectorize_text(text),
            vec!["learning", "brain"]
        );
        assert_eq!(
            ProfileVectorizer::new().keep_stop_words().vectorize_text(text),
            vec!["learning", "of", "the", "brain"]
        );
    }

    #[test]
    fn test_field_order_is_preserved() {
        let v = ProfileVectorizer::new();
        let a = v.vectorize(&[Some("vision"), Some("language")]);
        let b = v.vectorize(&[Some("language"), Some("vision")]);
        assert_ne!(a, b);
        assert_eq!(a, vec!["vision", "language"]);
    }
}
