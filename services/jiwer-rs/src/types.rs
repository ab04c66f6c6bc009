//! Shared data structures for alignments and their measures.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JiwerError;

/// Edit operation in sequence alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    Equal,
    Substitute,
    Insert,
    Delete,
}

impl EditOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditOp::Equal => "equal",
            EditOp::Substitute => "substitute",
            EditOp::Insert => "insert",
            EditOp::Delete => "delete",
        }
    }

    /// Whether the operation consumes a reference token
    pub fn advances_reference(&self) -> bool {
        !matches!(self, EditOp::Insert)
    }

    /// Whether the operation consumes a hypothesis token
    pub fn advances_hypothesis(&self) -> bool {
        !matches!(self, EditOp::Delete)
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditOp {
    type Err = JiwerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(EditOp::Equal),
            // Levenshtein libraries commonly call a substitution "replace".
            "substitute" | "replace" => Ok(EditOp::Substitute),
            "insert" => Ok(EditOp::Insert),
            "delete" => Ok(EditOp::Delete),
            other => Err(JiwerError::invalid_opcode(format!(
                "unknown operation `{other}`"
            ))),
        }
    }
}

/// A run of one edit operation linking a reference span to a hypothesis span.
///
/// Both spans are half-open ranges into the token sequences of one sentence pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentChunk {
    #[serde(rename = "type")]
    pub kind: EditOp,
    pub ref_start_idx: usize,
    pub ref_end_idx: usize,
    pub hyp_start_idx: usize,
    pub hyp_end_idx: usize,
}

impl AlignmentChunk {
    pub fn new(
        kind: EditOp,
        reference: Range<usize>,
        hypothesis: Range<usize>,
    ) -> Result<Self, JiwerError> {
        let chunk = Self {
            kind,
            ref_start_idx: reference.start,
            ref_end_idx: reference.end,
            hyp_start_idx: hypothesis.start,
            hyp_end_idx: hypothesis.end,
        };
        chunk.validate()?;
        Ok(chunk)
    }

    pub fn reference_range(&self) -> Range<usize> {
        self.ref_start_idx..self.ref_end_idx
    }

    pub fn hypothesis_range(&self) -> Range<usize> {
        self.hyp_start_idx..self.hyp_end_idx
    }

    pub fn reference_len(&self) -> usize {
        self.ref_end_idx.saturating_sub(self.ref_start_idx)
    }

    pub fn hypothesis_len(&self) -> usize {
        self.hyp_end_idx.saturating_sub(self.hyp_start_idx)
    }

    /// Check the span invariants for the chunk's operation
    pub fn validate(&self) -> Result<(), JiwerError> {
        if self.ref_start_idx > self.ref_end_idx {
            return Err(JiwerError::invalid_opcode(format!(
                "ref_start_idx={} is larger than ref_end_idx={}",
                self.ref_start_idx, self.ref_end_idx
            )));
        }
        if self.hyp_start_idx > self.hyp_end_idx {
            return Err(JiwerError::invalid_opcode(format!(
                "hyp_start_idx={} is larger than hyp_end_idx={}",
                self.hyp_start_idx, self.hyp_end_idx
            )));
        }

        let (ref_len, hyp_len) = (self.reference_len(), self.hypothesis_len());
        let consistent = match self.kind {
            EditOp::Equal | EditOp::Substitute => ref_len == hyp_len && ref_len > 0,
            EditOp::Insert => ref_len == 0 && hyp_len > 0,
            EditOp::Delete => hyp_len == 0 && ref_len > 0,
        };
        if !consistent {
            return Err(JiwerError::invalid_opcode(format!(
                "{} chunk spans {} reference and {} hypothesis tokens",
                self.kind, ref_len, hyp_len
            )));
        }

        Ok(())
    }
}

/// Word-level alignment of one or more sentence pairs with its measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordOutput {
    pub references: Vec<Vec<String>>,
    pub hypotheses: Vec<Vec<String>>,
    pub alignments: Vec<Vec<AlignmentChunk>>,

    pub wer: f64,
    pub mer: f64,
    pub wil: f64,
    pub wip: f64,

    pub hits: usize,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// Character-level alignment of one or more sentence pairs with its error rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterOutput {
    pub references: Vec<Vec<String>>,
    pub hypotheses: Vec<Vec<String>>,
    pub alignments: Vec<Vec<AlignmentChunk>>,

    pub cer: f64,

    pub hits: usize,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl From<WordOutput> for CharacterOutput {
    fn from(output: WordOutput) -> Self {
        Self {
            references: output.references,
            hypotheses: output.hypotheses,
            alignments: output.alignments,
            cer: output.wer,
            hits: output.hits,
            substitutions: output.substitutions,
            insertions: output.insertions,
            deletions: output.deletions,
        }
    }
}
