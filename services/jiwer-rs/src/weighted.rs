//! Word measures where reference tokens carry individual weights.
//!
//! The alignment is still computed with unit costs; only the summation of
//! hits, substitutions and deletions uses the weight of the reference token at
//! each position. Inserted tokens have no reference counterpart and count with
//! a fixed insertion weight.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::ProcessConfig;
use crate::error::JiwerError;
use crate::measures::Measures;
use crate::process::{align_sentences, AlignedCorpus, IntoSentences};
use crate::types::{AlignmentChunk, EditOp};

/// Per-token weights; unlisted tokens use the default weight
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWeights {
    weights: FxHashMap<String, f64>,
    default_weight: f64,
    insertion_weight: f64,
}

impl TokenWeights {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            weights: FxHashMap::default(),
            default_weight: Self::DEFAULT_WEIGHT,
            insertion_weight: Self::DEFAULT_WEIGHT,
        }
    }

    pub fn with_weight(mut self, token: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(token.into(), weight);
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn with_insertion_weight(mut self, weight: f64) -> Self {
        self.insertion_weight = weight;
        self
    }

    pub fn weight(&self, token: &str) -> f64 {
        self.weights
            .get(token)
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn insertion_weight(&self) -> f64 {
        self.insertion_weight
    }

    /// Every weight must be finite and non-negative
    pub fn validate(&self) -> Result<(), JiwerError> {
        let check = |token: &str, weight: f64| {
            if weight.is_finite() && weight >= 0.0 {
                Ok(())
            } else {
                Err(JiwerError::InvalidWeight {
                    token: token.to_string(),
                    weight,
                })
            }
        };

        check("<default>", self.default_weight)?;
        check("<insertion>", self.insertion_weight)?;
        self.weights
            .iter()
            .try_for_each(|(token, &weight)| check(token, weight))
    }

    fn span(&self, tokens: &[String]) -> f64 {
        tokens.iter().map(|t| self.weight(t)).sum()
    }
}

impl Default for TokenWeights {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for TokenWeights {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |weights, (token, weight)| {
                weights.with_weight(token, weight)
            })
    }
}

/// Weighted hits, substitutions, deletions and insertions with the side totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedCounts {
    pub hits: f64,
    pub substitutions: f64,
    pub deletions: f64,
    pub insertions: f64,
    pub reference_total: f64,
    pub hypothesis_total: f64,
}

impl WeightedCounts {
    fn from_corpus(corpus: &AlignedCorpus, weights: &TokenWeights) -> Self {
        let mut counts = Self::default();

        let sentences = corpus
            .references
            .iter()
            .zip(&corpus.alignments)
            .flat_map(|(reference, chunks)| chunks.iter().map(move |c| (reference, c)));

        for (reference, chunk) in sentences {
            let span = || weights.span(&reference[chunk.reference_range()]);
            match chunk.kind {
                EditOp::Equal => counts.hits += span(),
                EditOp::Substitute => counts.substitutions += span(),
                EditOp::Delete => counts.deletions += span(),
                EditOp::Insert => {
                    counts.insertions += weights.insertion_weight() * chunk.hypothesis_len() as f64
                }
            }
        }

        counts.reference_total = counts.hits + counts.substitutions + counts.deletions;
        counts.hypothesis_total = counts.hits + counts.substitutions + counts.insertions;
        counts
    }
}

/// Word alignment with weighted counts and the measures derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedWordOutput {
    pub references: Vec<Vec<String>>,
    pub hypotheses: Vec<Vec<String>>,
    pub alignments: Vec<Vec<AlignmentChunk>>,

    pub wer: f64,
    pub mer: f64,
    pub wil: f64,
    pub wip: f64,

    pub counts: WeightedCounts,
}

pub fn process_words_weighted(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
    weights: &TokenWeights,
    config: &ProcessConfig,
) -> Result<WeightedWordOutput, JiwerError> {
    weights.validate()?;

    let corpus = align_sentences(
        reference.into_sentences(),
        hypothesis.into_sentences(),
        config,
    )?;
    let counts = WeightedCounts::from_corpus(&corpus, weights);
    let measures = Measures::from_totals(
        counts.hits,
        counts.substitutions,
        counts.deletions,
        counts.insertions,
        counts.reference_total,
        counts.hypothesis_total,
    )?;

    tracing::debug!(
        reference_total = counts.reference_total,
        hypothesis_total = counts.hypothesis_total,
        "weighted counts"
    );

    Ok(WeightedWordOutput {
        references: corpus.references,
        hypotheses: corpus.hypotheses,
        alignments: corpus.alignments,
        wer: measures.wer,
        mer: measures.mer,
        wil: measures.wil,
        wip: measures.wip,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::process_words;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_unit_weights_match_plain_counts() {
        let reference = ["the quick brown fox", "jumps over"];
        let hypothesis = ["a quick fox", "jumps over the dog"];

        let plain = process_words(reference, hypothesis).unwrap();
        let weighted = process_words_weighted(
            reference,
            hypothesis,
            &TokenWeights::default(),
            &ProcessConfig::default(),
        )
        .unwrap();

        assert_eq!(weighted.alignments, plain.alignments);
        assert_close(weighted.wer, plain.wer);
        assert_close(weighted.mer, plain.mer);
        assert_close(weighted.wip, plain.wip);
        assert_close(weighted.counts.hits, plain.hits as f64);
        assert_close(weighted.counts.insertions, plain.insertions as f64);
    }

    #[test]
    fn test_reference_weights_scale_errors() {
        let weights: TokenWeights = [("the", 0.5)].into_iter().collect();
        let output = process_words_weighted(
            "the cat sat",
            "a cat sat",
            &weights,
            &ProcessConfig::default(),
        )
        .unwrap();

        assert_close(output.counts.substitutions, 0.5);
        assert_close(output.counts.hits, 2.0);
        assert_close(output.counts.reference_total, 2.5);
        assert_close(output.wer, 0.2);
        assert_close(output.wip, (2.0 / 2.5) * (2.0 / 2.5));
    }

    #[test]
    fn test_light_weights_keep_perfect_match() {
        let weights = TokenWeights::new().with_default_weight(0.5);
        let output =
            process_words_weighted("hello", "hello", &weights, &ProcessConfig::default()).unwrap();

        assert_close(output.counts.hypothesis_total, 0.5);
        assert_close(output.wer, 0.0);
        assert_close(output.wip, 1.0);
        assert_close(output.wil, 0.0);
    }

    #[test]
    fn test_insertion_weight() {
        let weights = TokenWeights::new().with_insertion_weight(0.25);
        let output =
            process_words_weighted("hello", "hello there you", &weights, &ProcessConfig::default())
                .unwrap();

        assert_close(output.counts.insertions, 0.5);
        assert_close(output.wer, 0.5);
        assert_close(output.mer, 0.5 / 1.5);
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let negative = TokenWeights::new().with_weight("bad", -1.0);
        let err = process_words_weighted("bad", "bad", &negative, &ProcessConfig::default())
            .unwrap_err();
        assert!(matches!(err, JiwerError::InvalidWeight { ref token, .. } if token == "bad"));

        let nan = TokenWeights::new().with_default_weight(f64::NAN);
        assert!(nan.validate().is_err());
    }
}
