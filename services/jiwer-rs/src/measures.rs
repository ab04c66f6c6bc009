//! Error counts and the rates derived from them.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::JiwerError;
use crate::process::{process_characters, process_words, IntoSentences};
use crate::types::{AlignmentChunk, EditOp};

/// Hits, substitutions, deletions and insertions of one or more alignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCounts {
    pub hits: usize,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
}

impl ErrorCounts {
    pub fn from_chunks(chunks: &[AlignmentChunk]) -> Self {
        let mut counts = Self::default();
        for chunk in chunks {
            match chunk.kind {
                EditOp::Equal => counts.hits += chunk.reference_len(),
                EditOp::Substitute => counts.substitutions += chunk.reference_len(),
                EditOp::Delete => counts.deletions += chunk.reference_len(),
                EditOp::Insert => counts.insertions += chunk.hypothesis_len(),
            }
        }
        counts
    }

    /// Number of reference tokens covered: `H + S + D`
    pub fn reference_len(&self) -> usize {
        self.hits + self.substitutions + self.deletions
    }

    /// Number of hypothesis tokens covered: `H + S + I`
    pub fn hypothesis_len(&self) -> usize {
        self.hits + self.substitutions + self.insertions
    }

    pub fn errors(&self) -> usize {
        self.substitutions + self.deletions + self.insertions
    }
}

impl Add for ErrorCounts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for ErrorCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.substitutions += rhs.substitutions;
        self.deletions += rhs.deletions;
        self.insertions += rhs.insertions;
    }
}

impl Sum for ErrorCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// WER, MER, WIL and WIP of one corpus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measures {
    pub wer: f64,
    pub mer: f64,
    pub wil: f64,
    pub wip: f64,
}

impl Measures {
    /// Rates from (possibly weighted) counts.
    ///
    /// `reference_total` and `hypothesis_total` are the token totals of each
    /// side; they only feed WIP. WIP is zero when the hypothesis is empty.
    pub fn from_totals(
        hits: f64,
        substitutions: f64,
        deletions: f64,
        insertions: f64,
        reference_total: f64,
        hypothesis_total: f64,
    ) -> Result<Self, JiwerError> {
        let reference_len = hits + substitutions + deletions;
        if reference_len <= 0.0 || reference_total <= 0.0 {
            return Err(JiwerError::empty_reference(
                "the reference corpus contains no tokens",
            ));
        }

        let errors = substitutions + deletions + insertions;
        let wer = errors / reference_len;
        let mer = errors / (reference_len + insertions);
        let wip = if hypothesis_total > 0.0 {
            (hits / reference_total) * (hits / hypothesis_total)
        } else {
            0.0
        };

        Ok(Self {
            wer,
            mer,
            wil: 1.0 - wip,
            wip,
        })
    }

    pub fn from_counts(counts: &ErrorCounts) -> Result<Self, JiwerError> {
        Self::from_totals(
            counts.hits as f64,
            counts.substitutions as f64,
            counts.deletions as f64,
            counts.insertions as f64,
            counts.reference_len() as f64,
            counts.hypothesis_len() as f64,
        )
    }
}

/// Word error rate with the default word pipeline
pub fn wer(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<f64, JiwerError> {
    Ok(process_words(reference, hypothesis)?.wer)
}

/// Match error rate with the default word pipeline
pub fn mer(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<f64, JiwerError> {
    Ok(process_words(reference, hypothesis)?.mer)
}

/// Word information preserved with the default word pipeline
pub fn wip(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<f64, JiwerError> {
    Ok(process_words(reference, hypothesis)?.wip)
}

/// Word information lost with the default word pipeline
pub fn wil(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<f64, JiwerError> {
    Ok(process_words(reference, hypothesis)?.wil)
}

/// Character error rate with the default character pipeline
pub fn cer(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<f64, JiwerError> {
    Ok(process_characters(reference, hypothesis)?.cer)
}
